//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod build;
pub mod completions;
pub mod list;
pub mod render;
pub mod version;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands};
use crate::error::AppError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// `cancel` is triggered on the first SIGINT/SIGTERM; long-running commands
/// stop at the next safe point.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), AppError> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Build(ref args) => build::run(args, config, cli.quiet, &cancel).await,
        Commands::Render(ref args) => render::run(args, config),
        Commands::List(ref args) => list::run(args, config).await,
        Commands::Completions(ref args) => {
            completions::run(args);
            Ok(())
        }
        Commands::Version(ref args) => {
            version::run(args);
            Ok(())
        }
    }
}
