use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: PgConnectOptions,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. `DATABASE_URL` wins
    /// over the individual `DB_*` parts.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let host = var("HOST", "127.0.0.1");
        let port = var("PORT", "3000")
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database = match lookup("DATABASE_URL") {
            Some(url) if !url.is_empty() => url
                .parse::<PgConnectOptions>()
                .map_err(|e| anyhow::anyhow!("invalid DATABASE_URL: {}", e))?,
            _ => {
                let db_port: u16 = var("DB_PORT", "5432")
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid DB_PORT: {}", e))?;
                PgConnectOptions::new()
                    .host(&var("DB_HOST", "127.0.0.1"))
                    .port(db_port)
                    .username(&var("DB_USER", "postgres"))
                    .password(&var("DB_PASSWORD", "password"))
                    .database(&var("DB_NAME", "mydb"))
            }
        };
        let cors_origins = var("CORS_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            database,
            cors_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_local_postgres() {
        let config = config(&[]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.database.get_host(), "127.0.0.1");
        assert_eq!(config.database.get_port(), 5432);
        assert_eq!(config.database.get_username(), "postgres");
        assert_eq!(config.database.get_database(), Some("mydb"));
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
    }

    #[test]
    fn connection_string_overrides_parts() {
        let config = config(&[
            ("DATABASE_URL", "postgres://prod-host/users"),
            ("DB_HOST", "ignored"),
        ])
        .unwrap();
        assert_eq!(config.database.get_host(), "prod-host");
        assert_eq!(config.database.get_database(), Some("users"));
    }

    #[test]
    fn parts_are_assembled_into_a_url() {
        let config = config(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "s3cret"),
            ("DB_NAME", "roster"),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
        ])
        .unwrap();
        assert_eq!(config.database.get_host(), "db");
        assert_eq!(config.database.get_port(), 6543);
        assert_eq!(config.database.get_username(), "app");
        assert_eq!(config.database.get_database(), Some("roster"));
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn reserved_characters_in_credentials_stay_in_their_fields() {
        let config = config(&[
            ("DB_USER", "ops@team"),
            ("DB_PASSWORD", "p@ss/w#rd"),
            ("DB_HOST", "10.0.0.5"),
            ("DB_NAME", "roster"),
        ])
        .unwrap();
        assert_eq!(config.database.get_host(), "10.0.0.5");
        assert_eq!(config.database.get_port(), 5432);
        assert_eq!(config.database.get_username(), "ops@team");
        assert_eq!(config.database.get_database(), Some("roster"));
    }

    #[test]
    fn malformed_connection_string_is_rejected() {
        assert!(config(&[("DATABASE_URL", "postgres://u@h:notaport/db")]).is_err());
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("DB_PORT", "-1")]).is_err());
    }
}
