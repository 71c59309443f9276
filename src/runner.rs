use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{error, info};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult, TaskFailure};
use crate::exec;
use crate::pipeline;
use crate::registry::Target;

/// Outcome of one target pipeline.
#[derive(Debug)]
pub enum TargetOutcome {
    Passed { target: String },
    Failed(TaskFailure),
}

/// Aggregate result of one run: one outcome per launched target, in
/// completion order. The run failed iff any outcome failed, but every
/// pipeline runs to completion regardless.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub outcomes: Vec<TargetOutcome>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TaskFailure> {
        self.outcomes.iter().filter_map(|o| match o {
            TargetOutcome::Failed(failure) => Some(failure),
            TargetOutcome::Passed { .. } => None,
        })
    }
}

/// Run the whole harness: install shared dependencies once, then execute one
/// pipeline per target concurrently.
pub async fn run(config: Arc<HarnessConfig>, targets: Vec<Target>) -> HarnessResult<RunOutcome> {
    let setup_config = Arc::clone(&config);
    let pipeline_config = Arc::clone(&config);

    run_with(
        &targets,
        config.max_concurrent,
        || async move { setup(&setup_config).await },
        move |target| {
            let config = Arc::clone(&pipeline_config);
            async move { pipeline::run(target, &config).await }
        },
    )
    .await
}

/// `run` with the setup step and pipelines supplied by the caller. A setup
/// failure aborts before any pipeline starts.
pub async fn run_with<S, SFut, F, Fut>(
    targets: &[Target],
    max_concurrent: usize,
    setup: S,
    make_pipeline: F,
) -> HarnessResult<RunOutcome>
where
    S: FnOnce() -> SFut,
    SFut: Future<Output = HarnessResult<()>>,
    F: Fn(Target) -> Fut,
    Fut: Future<Output = Result<(), TaskFailure>> + Send + 'static,
{
    setup().await?;
    Ok(run_all(targets, max_concurrent, make_pipeline).await)
}

/// Install the shared lint toolchain into the fixture directory. Runs once,
/// strictly before the concurrent phase; the fixture directory is only read
/// afterwards.
async fn setup(config: &HarnessConfig) -> HarnessResult<()> {
    info!("Installing shared lint dependencies into {}", config.fixture_dir.display());

    let mut args = vec!["install".to_string()];
    args.extend(config.setup_packages.iter().cloned());

    let output = exec::run("npm", &args, &config.fixture_dir)
        .await
        .map_err(|e| HarnessError::Setup { message: e.to_string() })?;

    if !output.success {
        return Err(HarnessError::Setup {
            message: if output.stderr.trim().is_empty() {
                format!("npm install exited with {:?}", output.exit_code)
            } else {
                output.stderr.trim().to_string()
            },
        });
    }

    Ok(())
}

/// Execute one pipeline per target, all concurrently, and collect every
/// outcome. One pipeline's failure never cancels or blocks its siblings.
/// `max_concurrent` of 0 means no bound.
pub async fn run_all<F, Fut>(targets: &[Target], max_concurrent: usize, make_pipeline: F) -> RunOutcome
where
    F: Fn(Target) -> Fut,
    Fut: Future<Output = Result<(), TaskFailure>> + Send + 'static,
{
    if targets.is_empty() {
        info!("No targets to run");
        return RunOutcome::default();
    }

    info!("Running {} target pipelines concurrently", targets.len());

    let semaphore = if max_concurrent > 0 {
        Some(Arc::new(Semaphore::new(max_concurrent)))
    } else {
        None
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut handles = Vec::new();

    for &target in targets {
        let fut = make_pipeline(target);
        let tx = tx.clone();
        let semaphore = semaphore.clone();

        let handle = tokio::spawn(async move {
            let _permit = match &semaphore {
                Some(s) => Some(s.acquire().await.expect("Semaphore closed")),
                None => None,
            };

            // The pipeline runs on its own task so a panic surfaces here as
            // a JoinError and this task still sends, keeping the aggregate in
            // true completion order with one outcome per target.
            let outcome = match tokio::spawn(fut).await {
                Ok(Ok(())) => TargetOutcome::Passed {
                    target: target.name.to_string(),
                },
                Ok(Err(failure)) => TargetOutcome::Failed(failure),
                Err(e) => {
                    error!("{}: pipeline task panicked: {}", target.name, e);
                    TargetOutcome::Failed(TaskFailure::new(
                        target.name,
                        &[],
                        HarnessError::Unexpected(format!("pipeline task panicked: {}", e)),
                    ))
                }
            };

            // Receiver outlives every sender; a send cannot fail here.
            let _ = tx.send(outcome);
        });

        handles.push(handle);
    }
    drop(tx);

    // The wrapper tasks never panic, so joining them just waits for every
    // send to land before the drain.
    for handle in handles {
        let _ = handle.await;
    }

    let mut outcome = RunOutcome::default();
    while let Ok(completed) = rx.try_recv() {
        outcome.outcomes.push(completed);
    }

    let failed = outcome.failures().count();
    if failed == 0 {
        info!("All {} targets passed", outcome.outcomes.len());
    } else {
        error!("{} of {} targets failed", failed, outcome.outcomes.len());
    }

    outcome
}
