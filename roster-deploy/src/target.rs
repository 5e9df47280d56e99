use crate::docker;
use crate::env::Env;
use crate::error::DeployError;
use crate::pipeline::{Action, Pipeline};
use crate::stage::Stage;

/// Names of the variables that locate one deployable in AWS.
pub struct TargetKeys {
    pub repository: &'static str,
    pub service: &'static str,
    pub task_family: &'static str,
    pub container_name: &'static str,
}

pub const CLUSTER_KEY: &str = "AWS_ECS_CLUSTER";
pub const ACCOUNT_KEY: &str = "AWS_ACCOUNT_ID";

/// Where an image goes and which ECS service runs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub region: String,
    pub account_id: String,
    pub repository: String,
    pub cluster: String,
    pub service: String,
    pub task_family: String,
    pub container_name: String,
}

impl RemoteTarget {
    pub fn from_env(env: &dyn Env, keys: &TargetKeys) -> Result<Self, DeployError> {
        env.require(&[
            keys.repository,
            CLUSTER_KEY,
            keys.service,
            keys.task_family,
            keys.container_name,
            ACCOUNT_KEY,
        ])?;
        let var = |key: &str| env.var(key).unwrap_or_default();

        Ok(Self {
            region: env.region(),
            account_id: var(ACCOUNT_KEY),
            repository: var(keys.repository),
            cluster: var(CLUSTER_KEY),
            service: var(keys.service),
            task_family: var(keys.task_family),
            container_name: var(keys.container_name),
        })
    }

    pub fn registry(&self) -> String {
        format!("{}.dkr.ecr.{}.amazonaws.com", self.account_id, self.region)
    }

    pub fn image(&self, stage: Stage) -> String {
        format!("{}/{}:{}", self.registry(), self.repository, stage)
    }

    /// Login, tag, push and force a rollout of `local_image`.
    pub fn release(&self, pipeline: Pipeline, local_image: &str, stage: Stage) -> Pipeline {
        let remote_image = self.image(stage);
        pipeline
            .step(
                "log in to registry",
                Action::RegistryLogin {
                    registry: self.registry(),
                },
            )
            .command("tag image", docker::tag(local_image, &remote_image))
            .command("push image", docker::push(&remote_image))
            .step(
                "update service",
                Action::ForceDeployment {
                    cluster: self.cluster.clone(),
                    service: self.service.clone(),
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const KEYS: TargetKeys = TargetKeys {
        repository: "REPO",
        service: "SERVICE",
        task_family: "FAMILY",
        container_name: "CONTAINER",
    };

    fn full_env() -> HashMap<String, String> {
        [
            ("REPO", "roster/api"),
            ("AWS_ECS_CLUSTER", "main"),
            ("SERVICE", "api"),
            ("FAMILY", "api-task"),
            ("CONTAINER", "api"),
            ("AWS_ACCOUNT_ID", "123456789012"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn image_uri_is_built_from_account_region_and_stage() {
        let target = RemoteTarget::from_env(&full_env(), &KEYS).unwrap();
        assert_eq!(target.region, "us-east-1");
        assert_eq!(
            target.image(Stage::Staging),
            "123456789012.dkr.ecr.us-east-1.amazonaws.com/roster/api:staging"
        );
    }

    #[test]
    fn every_missing_key_is_reported() {
        let mut env = full_env();
        env.remove("SERVICE");
        env.insert("AWS_ACCOUNT_ID".into(), String::new());

        match RemoteTarget::from_env(&env, &KEYS) {
            Err(DeployError::MissingEnv(missing)) => {
                assert_eq!(missing, vec!["SERVICE", "AWS_ACCOUNT_ID"])
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn release_steps_run_in_order() {
        let target = RemoteTarget::from_env(&full_env(), &KEYS).unwrap();
        let pipeline = target.release(Pipeline::new("p"), "api:dev", Stage::Dev);
        assert_eq!(
            pipeline.step_names(),
            vec!["log in to registry", "tag image", "push image", "update service"]
        );
    }
}
