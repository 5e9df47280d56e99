use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use crate::cloud::AwsCli;
use crate::env::{Env, ProcessEnv, load_env_file};
use crate::error::DeployError;
use crate::logging::init_logging;
use crate::pipeline::Context;
use crate::runner::{CommandRunner, SystemRunner};
use crate::stage::Stage;
use crate::{Component, Outcome, deploy};

#[derive(Parser, Debug)]
pub struct Args {
    /// One of: local, dev, staging, prod
    #[clap(default_value = "local")]
    pub stage: String,
}

/// Parses the stage before anything touches Docker or AWS.
pub async fn run(component: Component, args: &Args) -> Result<Outcome, DeployError> {
    let stage: Stage = args.stage.parse()?;
    load_env_file(component, stage);

    let env = ProcessEnv;
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
    let cloud = AwsCli::new(runner.clone(), env.region());
    let ctx = Context {
        runner: runner.as_ref(),
        cloud: &cloud,
    };

    info!(component = component.name(), stage = %stage, "starting deployment");
    deploy(component, stage, &env, &ctx).await
}

pub async fn main_for(component: Component) -> ExitCode {
    init_logging();
    let args = Args::parse();

    match run(component, &args).await {
        Ok(Outcome::Deployed) => {
            info!(component = component.name(), "deployment finished");
            ExitCode::SUCCESS
        }
        Ok(Outcome::AlreadyRunning) => {
            info!(component = component.name(), "already running, nothing to do");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(component = component.name(), error = %err, "deployment failed");
            ExitCode::FAILURE
        }
    }
}
