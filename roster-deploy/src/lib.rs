//! Stage-aware deployment of the roster backend, its database and the
//! static frontend. Every run is a [`pipeline::Pipeline`] executed against
//! an injected [`runner::CommandRunner`] and [`cloud::CloudClient`].

pub mod backend;
pub mod cli;
pub mod cloud;
pub mod database;
pub mod docker;
pub mod env;
pub mod error;
pub mod frontend;
pub mod logging;
pub mod pipeline;
pub mod runner;
pub mod stage;
pub mod target;

#[cfg(test)]
mod testing;

use env::Env;
use error::DeployError;
use pipeline::Context;
use stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Backend,
    Database,
    Frontend,
}

impl Component {
    pub fn name(&self) -> &'static str {
        match self {
            Component::Backend => "backend",
            Component::Database => "database",
            Component::Frontend => "frontend",
        }
    }

    /// Directory holding the component's `.env` files.
    pub fn env_dir(&self) -> &'static str {
        match self {
            Component::Backend | Component::Database => "roster-server",
            Component::Frontend => "roster-wasm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Deployed,
    /// The target was already healthy and nothing was changed.
    AlreadyRunning,
}

pub async fn deploy(
    component: Component,
    stage: Stage,
    env: &dyn Env,
    ctx: &Context<'_>,
) -> Result<Outcome, DeployError> {
    match component {
        Component::Backend => backend::deploy(stage, env, ctx).await,
        Component::Database => database::deploy(stage, env, ctx).await,
        Component::Frontend => frontend::deploy(stage, env, ctx).await,
    }
}
