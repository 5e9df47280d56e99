use std::process::ExitCode;

use roster_deploy::Component;
use roster_deploy::cli::main_for;

#[tokio::main]
async fn main() -> ExitCode {
    main_for(Component::Backend).await
}
