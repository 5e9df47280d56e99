use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;

use crate::cloud::CloudClient;
use crate::docker;
use crate::error::DeployError;
use crate::runner::{CommandRunner, CommandSpec};

/// The side-effecting seams a pipeline runs against.
pub struct Context<'a> {
    pub runner: &'a dyn CommandRunner,
    pub cloud: &'a dyn CloudClient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Command(CommandSpec),
    RegistryLogin { registry: String },
    ForceDeployment { cluster: String, service: String },
    UploadDirectory { bucket: String, dir: PathBuf },
    InvalidateCache { distribution_id: String, paths: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub name: String,
    pub action: Action,
}

/// Named steps run strictly in order; the first failure stops the run and
/// nothing already done is undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    name: String,
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    pub fn step(mut self, name: impl Into<String>, action: Action) -> Self {
        self.steps.push(Step {
            name: name.into(),
            action,
        });
        self
    }

    pub fn command(self, name: impl Into<String>, cmd: CommandSpec) -> Self {
        self.step(name, Action::Command(cmd))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    pub async fn execute(&self, ctx: &Context<'_>) -> Result<(), DeployError> {
        let total = self.steps.len();
        for (index, step) in self.steps.iter().enumerate() {
            info!(
                pipeline = %self.name,
                step = %step.name,
                "[{}/{}] {}",
                index + 1,
                total,
                step.name
            );
            perform(&step.action, ctx)
                .await
                .map_err(|source| DeployError::Step {
                    step: step.name.clone(),
                    source: Box::new(source),
                })?;
        }
        info!(pipeline = %self.name, "completed successfully");
        Ok(())
    }
}

async fn perform(action: &Action, ctx: &Context<'_>) -> Result<(), DeployError> {
    match action {
        Action::Command(cmd) => ctx.runner.run(cmd).await,
        Action::RegistryLogin { registry } => {
            let password = ctx.cloud.registry_password().await?;
            ctx.runner.run(&docker::login(registry, &password)).await
        }
        Action::ForceDeployment { cluster, service } => {
            ctx.cloud.force_new_deployment(cluster, service).await
        }
        Action::UploadDirectory { bucket, dir } => upload_directory(ctx.cloud, bucket, dir).await,
        Action::InvalidateCache {
            distribution_id,
            paths,
        } => {
            let caller_reference = chrono::Utc::now().timestamp_millis().to_string();
            ctx.cloud
                .create_invalidation(distribution_id, paths, &caller_reference)
                .await
        }
    }
}

/// Object key for `file` under `root`, always `/`-separated.
pub fn object_key(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

pub fn content_type(file: &Path) -> String {
    mime_guess::from_path(file)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

async fn upload_directory(
    cloud: &dyn CloudClient,
    bucket: &str,
    dir: &Path,
) -> Result<(), DeployError> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(key) = object_key(dir, path) else {
            continue;
        };
        let content_type = content_type(path);
        cloud.put_object(bucket, &key, path, &content_type).await?;
        info!(key = %key, content_type = %content_type, "uploaded");
    }
    Ok(())
}
