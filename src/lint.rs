use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::exec::CommandOutput;

/// One entry of ESLint's `--format json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintFile {
    pub file_path: String,
    #[serde(default)]
    pub messages: Vec<LintMessage>,
}

/// A single diagnostic. `fatal` marks parse/config-level errors as opposed
/// to ordinary rule violations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintMessage {
    #[serde(default)]
    pub rule_id: Option<String>,
    #[serde(default)]
    pub severity: Option<u8>,
    pub message: String,
    #[serde(default)]
    pub fatal: bool,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
}

/// Build the eslint invocation for one cloned target. Run through `npx` from
/// the fixture directory so the locally installed toolchain is used.
pub fn eslint_args(config: &HarnessConfig, dest: &Path, fix_dry_run: bool) -> Vec<String> {
    let mut args = vec![
        "eslint".to_string(),
        "--config".to_string(),
        config.eslint_config_path().display().to_string(),
        "--no-eslintrc".to_string(),
        "--ext".to_string(),
        config.extensions.clone(),
        dest.display().to_string(),
        "--format".to_string(),
        "json".to_string(),
    ];

    if fix_dry_run {
        args.push("--fix-dry-run".to_string());
    }

    args
}

/// Decide what a finished lint run means.
///
/// Style violations are expected, so a non-zero exit with valid output is a
/// success. The run only fails when no usable output came back at all, or
/// when the output contains a diagnostic explicitly flagged fatal.
pub fn evaluate(output: &CommandOutput) -> HarnessResult<Vec<LintFile>> {
    if output.stdout.trim().is_empty() {
        return Err(HarnessError::LintInvocation {
            message: if output.stderr.trim().is_empty() {
                format!("linter exited with {:?} and produced no output", output.exit_code)
            } else {
                output.stderr.trim().to_string()
            },
        });
    }

    let files: Vec<LintFile> = serde_json::from_str(&output.stdout).map_err(|e| {
        HarnessError::LintInvocation {
            message: if output.success {
                format!("failed to parse linter output: {}", e)
            } else {
                format!(
                    "linter exited with {:?} and its output was unparseable: {}",
                    output.exit_code, e
                )
            },
        }
    })?;

    for file in &files {
        for message in &file.messages {
            if message.fatal {
                return Err(HarnessError::LintFatalDiagnostic {
                    file_path: file.file_path.clone(),
                    message: message.message.clone(),
                    diagnostic: serde_json::to_value(message)
                        .unwrap_or(serde_json::Value::Null),
                });
            }
        }
    }

    Ok(files)
}
