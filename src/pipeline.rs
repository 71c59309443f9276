use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, TaskFailure};
use crate::exec;
use crate::lint;
use crate::registry::Target;

/// Run the full pipeline for one target: clone into a fresh ephemeral
/// directory, lint in check mode, lint in fix-dry-run mode, then remove the
/// directory. The directory is released on every exit path; a step failure
/// skips the remaining lint steps but never the release.
pub async fn run(target: Target, config: &HarnessConfig) -> Result<(), TaskFailure> {
    let dest = match allocate(target.name) {
        Ok(dest) => dest,
        Err(e) => return Err(TaskFailure::new(target.name, &[], e)),
    };

    let result = run_steps(target, config, &dest).await;
    release(&dest).await;

    if result.is_ok() {
        info!("{}: all steps passed", target.name);
    }
    result
}

/// Arguments for the clone step, exposed for failure reports.
pub fn git_args(target: Target, dest: &Path) -> Vec<String> {
    vec![
        "clone".to_string(),
        target.url.to_string(),
        "--single-branch".to_string(),
        dest.display().to_string(),
    ]
}

fn allocate(name: &str) -> Result<PathBuf, HarnessError> {
    let dir = tempfile::Builder::new()
        .prefix(&format!("lintcheck-{}-", name))
        .tempdir()
        .map_err(|e| HarnessError::Unexpected(format!("Failed to allocate temp dir: {}", e)))?;

    // Deletion is owned by the explicit release step, not the guard.
    Ok(dir.into_path())
}

async fn run_steps(target: Target, config: &HarnessConfig, dest: &Path) -> Result<(), TaskFailure> {
    // Acquire: clone the source into the ephemeral directory.
    let clone_args = git_args(target, dest);
    debug!("{}: cloning {}", target.name, target.url);
    let clone = exec::run("git", &clone_args, Path::new("."))
        .await
        .map_err(|e| TaskFailure::new(target.name, &clone_args, e.into()))?;

    if !clone.success {
        return Err(TaskFailure::new(
            target.name,
            &clone_args,
            HarnessError::Acquisition {
                target: target.name.to_string(),
                message: format!("git clone exited with {:?}", clone.exit_code),
            },
        )
        .with_stderr(clone.stderr_if_any()));
    }

    // Validate: check mode, then fix-dry-run, same fatal-entry policy.
    lint_step(target, config, dest, false).await?;
    lint_step(target, config, dest, true).await?;

    Ok(())
}

async fn lint_step(
    target: Target,
    config: &HarnessConfig,
    dest: &Path,
    fix_dry_run: bool,
) -> Result<(), TaskFailure> {
    let args = lint::eslint_args(config, dest, fix_dry_run);
    debug!(
        "{}: running eslint{}",
        target.name,
        if fix_dry_run { " --fix-dry-run" } else { "" }
    );

    let output = exec::run("npx", &args, &config.fixture_dir)
        .await
        .map_err(|e| TaskFailure::new(target.name, &args, e.into()))?;

    lint::evaluate(&output)
        .map(|_| ())
        .map_err(|e| TaskFailure::new(target.name, &args, e).with_stderr(output.stderr_if_any()))
}

/// Best-effort removal of the ephemeral directory. A missing path is fine;
/// any other failure is logged and swallowed so it cannot mask the step
/// result.
async fn release(dest: &Path) {
    match tokio::fs::remove_dir_all(dest).await {
        Ok(()) => debug!("Removed {}", dest.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove {}: {}", dest.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_args_shape() {
        let target = Target {
            name: "chalk",
            url: "https://github.com/chalk/chalk",
        };
        let args = git_args(target, Path::new("/tmp/work"));

        assert_eq!(
            args,
            vec!["clone", "https://github.com/chalk/chalk", "--single-branch", "/tmp/work"]
        );
    }

    #[tokio::test]
    async fn test_release_removes_directory() {
        let dir = tempfile::tempdir().unwrap().into_path();
        tokio::fs::write(dir.join("file.js"), "x").await.unwrap();

        release(&dir).await;

        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_release_ignores_missing_directory() {
        // Must not panic or log an error for an already-gone path.
        release(Path::new("/tmp/lintcheck-definitely-missing")).await;
    }

    #[test]
    fn test_allocated_directories_are_distinct() {
        let a = allocate("chalk").unwrap();
        let b = allocate("chalk").unwrap();

        assert_ne!(a, b);
        std::fs::remove_dir_all(&a).unwrap();
        std::fs::remove_dir_all(&b).unwrap();
    }
}
