use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use lintcheck::{config::HarnessConfig, registry, report, runner};

#[derive(Parser)]
#[command(name = "lintcheck")]
#[command(about = "Runs the shared ESLint config against real-world packages")]
struct Args {
    /// Registry names to run; all targets when omitted
    targets: Vec<String>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // The subscriber must be live before config load, or the loader's
    // missing-file warning vanishes into the no-op default dispatcher.
    init_logging(verbose_requested(args.verbose));

    let result = run(&args).await;
    report::print(&result);
    exit(report::exit_code(&result));
}

/// INTEGRATION selects verbose rendering, same as the CI entry point.
fn verbose_requested(flag: bool) -> bool {
    flag || std::env::var_os("INTEGRATION").is_some()
}

async fn run(args: &Args) -> lintcheck::HarnessResult<lintcheck::RunOutcome> {
    let config = HarnessConfig::load(args.config.as_deref())?;

    let targets = registry::select(&args.targets)?;
    info!("Testing {} packages", targets.len());

    runner::run(Arc::new(config), targets).await
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_requests_verbose() {
        assert!(verbose_requested(true));
    }

    #[test]
    fn test_integration_env_requests_verbose() {
        std::env::set_var("INTEGRATION", "1");
        assert!(verbose_requested(false));
        std::env::remove_var("INTEGRATION");
    }
}
