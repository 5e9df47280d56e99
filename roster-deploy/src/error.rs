use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("invalid stage `{0}`, must be one of: prod, staging, dev, local")]
    InvalidStage(String),
    #[error("missing required environment variables for AWS deployment: {}", .0.join(", "))]
    MissingEnv(Vec<String>),
    #[error("`{command}` failed: {status}")]
    CommandFailed { command: String, status: String },
    #[error("cloud request failed: {0}")]
    Cloud(String),
    #[error("step `{step}` failed: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<DeployError>,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}
