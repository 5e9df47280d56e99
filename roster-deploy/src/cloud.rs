use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::DeployError;
use crate::runner::{CommandRunner, CommandSpec};

/// Replica counts reported by the orchestrator for one service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceStatus {
    pub status: String,
    pub desired_count: i64,
    pub running_count: i64,
}

impl ServiceStatus {
    pub fn is_fully_up(&self) -> bool {
        self.status == "ACTIVE" && self.desired_count > 0 && self.running_count == self.desired_count
    }
}

#[derive(Debug, Deserialize)]
struct DescribeServicesOutput {
    #[serde(default)]
    services: Vec<ServiceStatus>,
}

/// AWS control-plane calls made by the deploy pipelines.
#[async_trait]
pub trait CloudClient: Send + Sync {
    async fn registry_password(&self) -> Result<String, DeployError>;
    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<Option<ServiceStatus>, DeployError>;
    async fn force_new_deployment(&self, cluster: &str, service: &str) -> Result<(), DeployError>;
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        file: &Path,
        content_type: &str,
    ) -> Result<(), DeployError>;
    async fn create_invalidation(
        &self,
        distribution_id: &str,
        paths: &[String],
        caller_reference: &str,
    ) -> Result<(), DeployError>;
}

/// `CloudClient` backed by the `aws` command line tool.
pub struct AwsCli {
    runner: Arc<dyn CommandRunner>,
    region: String,
}

impl AwsCli {
    pub fn new(runner: Arc<dyn CommandRunner>, region: impl Into<String>) -> Self {
        Self {
            runner,
            region: region.into(),
        }
    }

    fn aws<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec::new("aws")
            .args(args)
            .args(["--region", self.region.as_str()])
    }

    async fn call(&self, cmd: CommandSpec) -> Result<String, DeployError> {
        self.runner.output(&cmd).await.map_err(cloud_error)
    }
}

/// A non-zero `aws` exit is an AWS-side failure; spawn and I/O errors are not.
fn cloud_error(err: DeployError) -> DeployError {
    match err {
        DeployError::CommandFailed { command, status } => {
            DeployError::Cloud(format!("`{}` failed: {}", command, status))
        }
        other => other,
    }
}

#[async_trait]
impl CloudClient for AwsCli {
    async fn registry_password(&self) -> Result<String, DeployError> {
        let password = self.call(self.aws(["ecr", "get-login-password"])).await?;
        Ok(password.trim().to_string())
    }

    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<Option<ServiceStatus>, DeployError> {
        let raw = self
            .call(self.aws([
                "ecs",
                "describe-services",
                "--cluster",
                cluster,
                "--services",
                service,
                "--output",
                "json",
            ]))
            .await?;
        let parsed: DescribeServicesOutput = serde_json::from_str(&raw)
            .map_err(|e| DeployError::Cloud(format!("unexpected describe-services output: {}", e)))?;
        Ok(parsed.services.into_iter().next())
    }

    async fn force_new_deployment(&self, cluster: &str, service: &str) -> Result<(), DeployError> {
        self.call(self.aws([
            "ecs",
            "update-service",
            "--cluster",
            cluster,
            "--service",
            service,
            "--force-new-deployment",
        ]))
        .await
        .map(|_| ())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        file: &Path,
        content_type: &str,
    ) -> Result<(), DeployError> {
        let body = file.to_string_lossy();
        self.call(self.aws([
            "s3api",
            "put-object",
            "--bucket",
            bucket,
            "--key",
            key,
            "--body",
            &*body,
            "--content-type",
            content_type,
        ]))
        .await
        .map(|_| ())
    }

    async fn create_invalidation(
        &self,
        distribution_id: &str,
        paths: &[String],
        caller_reference: &str,
    ) -> Result<(), DeployError> {
        let batch = json!({
            "CallerReference": caller_reference,
            "Paths": { "Quantity": paths.len(), "Items": paths },
        });
        self.call(self.aws([
            "cloudfront",
            "create-invalidation",
            "--distribution-id",
            distribution_id,
            "--invalidation-batch",
            batch.to_string().as_str(),
        ]))
        .await
        .map(|_| ())
    }
}
