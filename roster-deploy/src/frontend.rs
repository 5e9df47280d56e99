use std::path::{Path, PathBuf};

use tracing::info;

use crate::Outcome;
use crate::env::Env;
use crate::error::DeployError;
use crate::pipeline::{Action, Context, Pipeline};
use crate::runner::CommandSpec;
use crate::stage::Stage;

pub const DIST_DIR_KEY: &str = "FRONTEND_DIST_DIR";
pub const DEFAULT_DIST_DIR: &str = "roster-wasm/dist";
pub const LOCAL_PORT: &str = "4000";

const BUCKET_KEY: &str = "AWS_S3_BUCKET_NAME";
const DISTRIBUTION_KEY: &str = "AWS_CLOUDFRONT_DISTRIBUTION_ID";

pub async fn deploy(stage: Stage, env: &dyn Env, ctx: &Context<'_>) -> Result<Outcome, DeployError> {
    let dist = PathBuf::from(env.var_or(DIST_DIR_KEY, DEFAULT_DIST_DIR));

    if stage.is_local() {
        info!(dist = %dist.display(), port = LOCAL_PORT, "serving frontend locally");
        local_pipeline(&dist).execute(ctx).await?;
        return Ok(Outcome::Deployed);
    }

    env.require(&[BUCKET_KEY, DISTRIBUTION_KEY])?;
    let bucket = env.var(BUCKET_KEY).unwrap_or_default();
    let distribution_id = env.var(DISTRIBUTION_KEY).unwrap_or_default();

    info!(stage = %stage, bucket = %bucket, "deploying frontend to S3");
    remote_pipeline(stage, &dist, bucket, distribution_id)
        .execute(ctx)
        .await?;
    Ok(Outcome::Deployed)
}

pub fn local_pipeline(dist: &Path) -> Pipeline {
    Pipeline::new("frontend:local").command(
        "serve static files",
        CommandSpec::new("npx")
            .args(["serve", "-s"])
            .arg(dist.to_string_lossy())
            .args(["-l", LOCAL_PORT]),
    )
}

pub fn remote_pipeline(
    stage: Stage,
    dist: &Path,
    bucket: String,
    distribution_id: String,
) -> Pipeline {
    Pipeline::new(format!("frontend:{}", stage))
        .step(
            "upload static files",
            Action::UploadDirectory {
                bucket,
                dir: dist.to_path_buf(),
            },
        )
        .step(
            "invalidate cache",
            Action::InvalidateCache {
                distribution_id,
                paths: vec!["/*".to_string()],
            },
        )
}
