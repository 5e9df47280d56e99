//! Recording doubles for the runner and cloud seams.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::cloud::{CloudClient, ServiceStatus};
use crate::error::DeployError;
use crate::runner::{CommandRunner, CommandSpec};

#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<String>>,
    outputs: Vec<(String, String)>,
    fail_on: Option<String>,
}

impl RecordingRunner {
    /// Canned stdout for commands whose display starts with `prefix`.
    pub fn with_output(mut self, prefix: &str, stdout: &str) -> Self {
        self.outputs.push((prefix.to_string(), stdout.to_string()));
        self
    }

    pub fn failing_on(mut self, prefix: &str) -> Self {
        self.fail_on = Some(prefix.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, cmd: &CommandSpec) -> Result<String, DeployError> {
        let line = cmd.to_string();
        self.calls.lock().unwrap().push(line.clone());
        if self.fail_on.as_deref().is_some_and(|p| line.starts_with(p)) {
            return Err(DeployError::CommandFailed {
                command: line,
                status: "exit status: 1".into(),
            });
        }
        Ok(self
            .outputs
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, cmd: &CommandSpec) -> Result<(), DeployError> {
        self.record(cmd).map(|_| ())
    }

    async fn output(&self, cmd: &CommandSpec) -> Result<String, DeployError> {
        self.record(cmd)
    }
}

#[derive(Default)]
pub struct RecordingCloud {
    calls: Mutex<Vec<String>>,
    service: Option<ServiceStatus>,
    describe_fails: bool,
}

impl RecordingCloud {
    pub fn with_service(mut self, status: &str, desired: i64, running: i64) -> Self {
        self.service = Some(ServiceStatus {
            status: status.to_string(),
            desired_count: desired,
            running_count: running,
        });
        self
    }

    pub fn describe_failing(mut self) -> Self {
        self.describe_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CloudClient for RecordingCloud {
    async fn registry_password(&self) -> Result<String, DeployError> {
        self.record("registry_password".into());
        Ok("secret".into())
    }

    async fn describe_service(
        &self,
        cluster: &str,
        service: &str,
    ) -> Result<Option<ServiceStatus>, DeployError> {
        self.record(format!("describe_service {} {}", cluster, service));
        if self.describe_fails {
            return Err(DeployError::Cloud("AccessDenied".into()));
        }
        Ok(self.service.clone())
    }

    async fn force_new_deployment(&self, cluster: &str, service: &str) -> Result<(), DeployError> {
        self.record(format!("force_new_deployment {} {}", cluster, service));
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        _file: &Path,
        content_type: &str,
    ) -> Result<(), DeployError> {
        self.record(format!("put_object {} {} {}", bucket, key, content_type));
        Ok(())
    }

    async fn create_invalidation(
        &self,
        distribution_id: &str,
        paths: &[String],
        _caller_reference: &str,
    ) -> Result<(), DeployError> {
        self.record(format!(
            "create_invalidation {} {}",
            distribution_id,
            paths.join(",")
        ));
        Ok(())
    }
}
