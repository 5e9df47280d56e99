use tracing::info;

use crate::Outcome;
use crate::docker::{self, container_running};
use crate::env::Env;
use crate::error::DeployError;
use crate::pipeline::{Context, Pipeline};
use crate::runner::CommandSpec;
use crate::stage::Stage;
use crate::target::{RemoteTarget, TargetKeys};

pub const LOCAL_CONTAINER: &str = "backend-local";
pub const DOCKERFILE: &str = "roster-server/Dockerfile";
pub const DEFAULT_PORT: &str = "3000";

pub const KEYS: TargetKeys = TargetKeys {
    repository: "AWS_ECR_BACKEND_REPOSITORY",
    service: "AWS_ECS_BACKEND_SERVICE",
    task_family: "AWS_ECS_BACKEND_TASK_FAMILY",
    container_name: "BACKEND_CONTAINER_NAME",
};

pub async fn deploy(stage: Stage, env: &dyn Env, ctx: &Context<'_>) -> Result<Outcome, DeployError> {
    if stage.is_local() {
        info!("deploying backend locally");
        let running = container_running(ctx.runner, LOCAL_CONTAINER).await;
        local_pipeline(running).execute(ctx).await?;
        return Ok(Outcome::Deployed);
    }

    let target = RemoteTarget::from_env(env, &KEYS)?;
    let port = env.var_or("PORT", DEFAULT_PORT);
    info!(stage = %stage, service = %target.service, "deploying backend to ECS");
    remote_pipeline(stage, &target, &port).execute(ctx).await?;
    Ok(Outcome::Deployed)
}

pub fn local_pipeline(already_running: bool) -> Pipeline {
    let mut pipeline = Pipeline::new("backend:local");
    if already_running {
        pipeline = pipeline
            .command("stop existing container", docker::stop(LOCAL_CONTAINER))
            .command("remove existing container", docker::remove(LOCAL_CONTAINER));
    }
    pipeline
        .command(
            "build image",
            docker::build("backend:local", DOCKERFILE, &[("STAGE", "local".into())]),
        )
        .command(
            "start container",
            CommandSpec::new("docker").args([
                "run",
                "-d",
                "--name",
                LOCAL_CONTAINER,
                "-p",
                "3000:3000",
                "--network=host",
                "--restart",
                "unless-stopped",
                "backend:local",
            ]),
        )
}

pub fn remote_pipeline(stage: Stage, target: &RemoteTarget, port: &str) -> Pipeline {
    let image = format!("backend:{}", stage);
    let pipeline = Pipeline::new(format!("backend:{}", stage)).command(
        "build image",
        docker::build(
            &image,
            DOCKERFILE,
            &[("STAGE", stage.to_string()), ("PORT", port.to_string())],
        ),
    );
    target.release(pipeline, &image, stage)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::testing::{RecordingCloud, RecordingRunner};

    fn remote_env() -> HashMap<String, String> {
        [
            ("AWS_REGION", "eu-central-1"),
            ("AWS_ACCOUNT_ID", "111122223333"),
            ("AWS_ECR_BACKEND_REPOSITORY", "roster-backend"),
            ("AWS_ECS_CLUSTER", "roster"),
            ("AWS_ECS_BACKEND_SERVICE", "backend"),
            ("AWS_ECS_BACKEND_TASK_FAMILY", "backend-task"),
            ("BACKEND_CONTAINER_NAME", "backend"),
            ("PORT", "8080"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[tokio::test]
    async fn local_replaces_a_running_container() {
        let runner = RecordingRunner::default().with_output("docker ps", "Up 5 minutes");
        let cloud = RecordingCloud::default();
        let ctx = Context {
            runner: &runner,
            cloud: &cloud,
        };

        let outcome = deploy(Stage::Local, &HashMap::<String, String>::new(), &ctx).await.unwrap();

        assert_eq!(outcome, Outcome::Deployed);
        assert_eq!(
            runner.calls(),
            vec![
                "docker ps --filter name=backend-local --format {{.Status}}",
                "docker stop backend-local",
                "docker rm backend-local",
                "docker build -t backend:local --build-arg STAGE=local -f roster-server/Dockerfile .",
                "docker run -d --name backend-local -p 3000:3000 --network=host --restart unless-stopped backend:local",
            ]
        );
        assert!(cloud.calls().is_empty());
    }

    #[test]
    fn local_without_a_running_container_skips_the_stop() {
        assert_eq!(
            local_pipeline(false).step_names(),
            vec!["build image", "start container"]
        );
    }

    #[tokio::test]
    async fn remote_builds_pushes_and_redeploys() {
        let runner = RecordingRunner::default();
        let cloud = RecordingCloud::default();
        let ctx = Context {
            runner: &runner,
            cloud: &cloud,
        };

        deploy(Stage::Prod, &remote_env(), &ctx).await.unwrap();

        let registry = "111122223333.dkr.ecr.eu-central-1.amazonaws.com";
        assert_eq!(
            runner.calls(),
            vec![
                "docker build -t backend:prod --build-arg STAGE=prod --build-arg PORT=8080 -f roster-server/Dockerfile .".to_string(),
                format!("docker login --username AWS --password-stdin {}", registry),
                format!("docker tag backend:prod {}/roster-backend:prod", registry),
                format!("docker push {}/roster-backend:prod", registry),
            ]
        );
        assert_eq!(
            cloud.calls(),
            vec!["registry_password", "force_new_deployment roster backend"]
        );
    }

    #[tokio::test]
    async fn missing_variable_stops_before_any_call() {
        let mut env = remote_env();
        env.remove("AWS_ECS_BACKEND_TASK_FAMILY");
        let runner = RecordingRunner::default();
        let cloud = RecordingCloud::default();
        let ctx = Context {
            runner: &runner,
            cloud: &cloud,
        };

        let err = deploy(Stage::Dev, &env, &ctx).await.unwrap_err();

        assert!(matches!(err, DeployError::MissingEnv(_)));
        assert!(runner.calls().is_empty());
        assert!(cloud.calls().is_empty());
    }
}
