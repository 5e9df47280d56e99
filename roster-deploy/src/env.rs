use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::Component;
use crate::error::DeployError;
use crate::stage::Stage;

pub const DEFAULT_REGION: &str = "us-east-1";

/// Source of configuration variables. Empty values count as unset.
pub trait Env: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;

    fn var_or(&self, key: &str, default: &str) -> String {
        self.var(key).unwrap_or_else(|| default.to_string())
    }

    fn region(&self) -> String {
        self.var_or("AWS_REGION", DEFAULT_REGION)
    }

    /// Resolves every key, reporting all of the missing ones at once.
    fn require(&self, keys: &[&str]) -> Result<Vec<String>, DeployError> {
        let mut values = Vec::with_capacity(keys.len());
        let mut missing = Vec::new();
        for key in keys {
            match self.var(key) {
                Some(value) => values.push(value),
                None => missing.push(key.to_string()),
            }
        }
        if missing.is_empty() {
            Ok(values)
        } else {
            Err(DeployError::MissingEnv(missing))
        }
    }
}

pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

impl Env for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

pub fn env_file(component: Component, stage: Stage) -> PathBuf {
    let dir = PathBuf::from(component.env_dir());
    if stage.is_local() {
        dir.join(".env")
    } else {
        dir.join(format!(".env.{}", stage))
    }
}

/// Loads the component's env file into the process environment. A missing
/// file is not an error; variables already set win.
pub fn load_env_file(component: Component, stage: Stage) {
    let path = env_file(component, stage);
    match dotenvy::from_path(&path) {
        Ok(()) => info!(path = %path.display(), "loaded environment file"),
        Err(err) => debug!(path = %path.display(), error = %err, "environment file not loaded"),
    }
}
