use tracing::{error, info};

use crate::Outcome;
use crate::docker::{self, container_running};
use crate::env::Env;
use crate::error::DeployError;
use crate::pipeline::{Context, Pipeline};
use crate::runner::CommandSpec;
use crate::stage::Stage;
use crate::target::{RemoteTarget, TargetKeys};

pub const LOCAL_CONTAINER: &str = "postgres-local";
pub const DOCKERFILE: &str = "roster-server/database/Dockerfile";

pub const KEYS: TargetKeys = TargetKeys {
    repository: "AWS_ECR_DB_REPOSITORY",
    service: "AWS_ECS_DB_SERVICE",
    task_family: "AWS_ECS_DB_TASK_FAMILY",
    container_name: "DB_CONTAINER_NAME",
};

/// Connection settings baked into the PostgreSQL image or container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub port: String,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DbSettings {
    pub fn from_env(env: &dyn Env) -> Self {
        Self {
            port: env.var_or("DB_PORT", "5432"),
            user: env.var_or("DB_USER", "postgres"),
            password: env.var_or("DB_PASSWORD", "password"),
            name: env.var_or("DB_NAME", "mydb"),
        }
    }
}

pub async fn deploy(stage: Stage, env: &dyn Env, ctx: &Context<'_>) -> Result<Outcome, DeployError> {
    let settings = DbSettings::from_env(env);

    if stage.is_local() {
        info!("deploying PostgreSQL locally");
        if container_running(ctx.runner, LOCAL_CONTAINER).await {
            info!("PostgreSQL is already running locally");
            return Ok(Outcome::AlreadyRunning);
        }
        local_pipeline(&settings).execute(ctx).await?;
        return Ok(Outcome::Deployed);
    }

    let target = RemoteTarget::from_env(env, &KEYS)?;
    if service_running(ctx, &target).await {
        info!(service = %target.service, "PostgreSQL is already running in ECS, skipping deployment");
        return Ok(Outcome::AlreadyRunning);
    }

    info!(service = %target.service, "PostgreSQL is not running in ECS, starting deployment");
    remote_pipeline(stage, &target, &settings).execute(ctx).await?;
    Ok(Outcome::Deployed)
}

/// A failed lookup is reported and treated as "not running".
async fn service_running(ctx: &Context<'_>, target: &RemoteTarget) -> bool {
    match ctx
        .cloud
        .describe_service(&target.cluster, &target.service)
        .await
    {
        Ok(Some(status)) => status.is_fully_up(),
        Ok(None) => false,
        Err(err) => {
            error!(error = %err, "error checking PostgreSQL service");
            false
        }
    }
}

pub fn local_pipeline(settings: &DbSettings) -> Pipeline {
    Pipeline::new("database:local")
        .command(
            "build image",
            docker::build(
                "postgres:local",
                DOCKERFILE,
                &[("STAGE", "local".into()), ("DB_PORT", settings.port.clone())],
            ),
        )
        .command(
            "start container",
            CommandSpec::new("docker")
                .args(["run", "-d", "--name", LOCAL_CONTAINER, "-p"])
                .arg(format!("{}:5432", settings.port))
                .arg("-e")
                .arg(format!("POSTGRES_USER={}", settings.user))
                .arg("-e")
                .arg(format!("POSTGRES_PASSWORD={}", settings.password))
                .arg("-e")
                .arg(format!("POSTGRES_DB={}", settings.name))
                .args([
                    "--restart",
                    "unless-stopped",
                    "-v",
                    "postgres-data:/var/lib/postgresql/data",
                    "postgres:local",
                ]),
        )
}

pub fn remote_pipeline(stage: Stage, target: &RemoteTarget, settings: &DbSettings) -> Pipeline {
    let image = format!("postgres:{}", stage);
    let pipeline = Pipeline::new(format!("database:{}", stage)).command(
        "build image",
        docker::build(
            &image,
            DOCKERFILE,
            &[
                ("STAGE", stage.to_string()),
                ("POSTGRES_USER", settings.user.clone()),
                ("POSTGRES_PASSWORD", settings.password.clone()),
                ("POSTGRES_DB", settings.name.clone()),
            ],
        ),
    );
    target.release(pipeline, &image, stage)
}
