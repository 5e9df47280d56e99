use tracing::warn;

use crate::runner::{CommandRunner, CommandSpec};

pub fn build(tag: &str, dockerfile: &str, build_args: &[(&str, String)]) -> CommandSpec {
    let mut cmd = CommandSpec::new("docker").args(["build", "-t", tag]);
    for (name, value) in build_args {
        cmd = cmd.arg("--build-arg").arg(format!("{}={}", name, value));
    }
    cmd.args(["-f", dockerfile, "."])
}

pub fn status(container: &str) -> CommandSpec {
    CommandSpec::new("docker").args([
        "ps",
        "--filter",
        format!("name={}", container).as_str(),
        "--format",
        "{{.Status}}",
    ])
}

pub fn stop(container: &str) -> CommandSpec {
    CommandSpec::new("docker").args(["stop", container])
}

pub fn remove(container: &str) -> CommandSpec {
    CommandSpec::new("docker").args(["rm", container])
}

pub fn tag(source: &str, target: &str) -> CommandSpec {
    CommandSpec::new("docker").args(["tag", source, target])
}

pub fn push(image: &str) -> CommandSpec {
    CommandSpec::new("docker").args(["push", image])
}

pub fn login(registry: &str, password: &str) -> CommandSpec {
    CommandSpec::new("docker")
        .args(["login", "--username", "AWS", "--password-stdin", registry])
        .stdin(password)
}

/// True when `docker ps` reports a status for the container. A failing
/// `docker ps` is logged and treated as "not running".
pub async fn container_running(runner: &dyn CommandRunner, container: &str) -> bool {
    match runner.output(&status(container)).await {
        Ok(out) => !out.trim().is_empty(),
        Err(err) => {
            warn!(container, error = %err, "could not inspect container, assuming it is not running");
            false
        }
    }
}
