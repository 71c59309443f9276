use std::path::Path;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, trace, warn};

/// Captured result of one external process invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn stderr_if_any(&self) -> Option<String> {
        if self.stderr.trim().is_empty() {
            None
        } else {
            Some(self.stderr.clone())
        }
    }
}

/// Run an external process to completion and capture its output.
///
/// A non-zero exit is NOT an error here: the lint policy needs the output of
/// failed runs, so callers decide what an exit status means. Only failing to
/// spawn or wait on the process is an `Err`.
pub async fn run(program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput> {
    debug!("Executing: {} {} (cwd: {})", program, args.join(" "), cwd.display());

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .await
        .context(format!("Failed to execute {}", program))?;

    let result = CommandOutput {
        success: output.status.success(),
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if result.success {
        trace!("{} succeeded", program);
    } else {
        warn!(
            "{} exited with {:?}: {}",
            program,
            result.exit_code,
            result.stderr.trim()
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout_of_successful_process() {
        let output = run("echo", &["hello".to_string()], Path::new(".")).await.unwrap();

        assert!(output.success);
        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_err() {
        let output = run("false", &[], Path::new(".")).await.unwrap();

        assert!(!output.success);
        assert_ne!(output.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_missing_program_is_an_err() {
        let result = run("definitely-not-a-real-binary", &[], Path::new(".")).await;

        assert!(result.is_err());
    }

    #[test]
    fn test_blank_stderr_is_none() {
        let output = CommandOutput {
            success: true,
            exit_code: Some(0),
            stdout: String::new(),
            stderr: "  \n".to_string(),
        };

        assert!(output.stderr_if_any().is_none());
    }
}
