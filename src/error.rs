use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Setup failed: {message}")]
    Setup {
        message: String,
    },

    #[error("Clone failed for {target}: {message}")]
    Acquisition {
        target: String,
        message: String,
    },

    #[error("Lint produced no usable output: {message}")]
    LintInvocation {
        message: String,
    },

    #[error("Fatal lint diagnostic in {file_path}: {message}")]
    LintFatalDiagnostic {
        file_path: String,
        message: String,
        diagnostic: serde_json::Value,
    },

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl From<anyhow::Error> for HarnessError {
    fn from(error: anyhow::Error) -> Self {
        HarnessError::Unexpected(error.to_string())
    }
}

pub type HarnessResult<T> = std::result::Result<T, HarnessError>;

/// A pipeline failure annotated with the target it came from and the
/// arguments that were used to invoke the external process. The underlying
/// error is carried as-is; enrichment never alters its kind or message.
#[derive(Debug)]
pub struct TaskFailure {
    pub target: String,
    pub args: Vec<String>,
    pub error: HarnessError,
    pub stderr: Option<String>,
}

impl TaskFailure {
    pub fn new(target: &str, args: &[String], error: HarnessError) -> Self {
        Self {
            target: target.to_string(),
            args: args.to_vec(),
            error,
            stderr: None,
        }
    }

    pub fn with_stderr(mut self, stderr: Option<String>) -> Self {
        self.stderr = stderr.filter(|s| !s.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrichment_preserves_error() {
        let args = vec!["eslint".to_string(), "--format".to_string(), "json".to_string()];
        let error = HarnessError::LintInvocation {
            message: "no stdout".to_string(),
        };
        let message = error.to_string();

        let failure = TaskFailure::new("chalk", &args, error);

        assert_eq!(failure.target, "chalk");
        assert_eq!(failure.args, args);
        assert_eq!(failure.error.to_string(), message);
        assert!(matches!(failure.error, HarnessError::LintInvocation { .. }));
    }

    #[test]
    fn test_blank_stderr_is_dropped() {
        let failure = TaskFailure::new("ora", &[], HarnessError::Unexpected("boom".to_string()))
            .with_stderr(Some("   \n".to_string()));

        assert!(failure.stderr.is_none());
    }

    #[test]
    fn test_anyhow_maps_to_unexpected() {
        let error: HarnessError = anyhow::anyhow!("something odd").into();

        assert!(matches!(error, HarnessError::Unexpected(_)));
        assert!(error.to_string().contains("something odd"));
    }
}
