use colored::Colorize;

use crate::error::{HarnessError, HarnessResult};
use crate::runner::RunOutcome;

/// Render one block per failed target: the target name, the arguments the
/// external process was invoked with, the error message, captured stderr,
/// and for fatal diagnostics the originating file plus the diagnostic JSON.
pub fn render_failures(outcome: &RunOutcome) -> String {
    let mut out = String::new();

    for failure in outcome.failures() {
        out.push('\n');
        out.push_str(&format!(
            "{} {}\n",
            failure.target.red().bold().underline(),
            format!("({})", failure.args.join(" ")).dimmed()
        ));
        out.push_str(&format!("{}\n", failure.error));

        if let Some(stderr) = &failure.stderr {
            out.push_str(&format!("{}\n", stderr.trim().dimmed()));
        }

        if let HarnessError::LintFatalDiagnostic { file_path, diagnostic, .. } = &failure.error {
            let pretty = serde_json::to_string_pretty(diagnostic)
                .unwrap_or_else(|_| diagnostic.to_string());
            out.push_str(&format!("{} {}\n", file_path.dimmed(), pretty.dimmed()));
        }
    }

    out
}

/// Print the result of a run. Aggregate failures get formatted blocks; any
/// other error prints verbatim.
pub fn print(result: &HarnessResult<RunOutcome>) {
    match result {
        Ok(outcome) if outcome.is_success() => {}
        Ok(outcome) => eprint!("{}", render_failures(outcome)),
        Err(error) => eprintln!("{}", error),
    }
}

/// The single place an outcome turns into a process exit status.
pub fn exit_code(result: &HarnessResult<RunOutcome>) -> i32 {
    match result {
        Ok(outcome) if outcome.is_success() => 0,
        _ => 1,
    }
}
