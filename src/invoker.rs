//! Run the solver on one instance and read back what it reports.
//!
//! The solver prints its answer on the first line and its own elapsed time,
//! in seconds, on the line before the trailing empty one. Anything on stderr
//! marks the run as failed; the exit code is ignored.

use {
    crate::{
        error::{HarnessError, Result},
        regex,
    },
    std::{
        path::{Path, PathBuf},
        process::Stdio,
        time::Duration,
    },
    tokio::process::Command,
    tracing::debug,
};

/// What one solver run reported.
#[derive(Clone, Debug, PartialEq)]
pub struct InvocationResult {
    /// the first output line, verbatim
    pub solution: String,
    /// self-reported seconds
    pub elapsed: f64,
}

#[derive(Clone, Debug)]
pub struct Invoker {
    executable: PathBuf,
    timeout: Option<Duration>,
}

impl Invoker {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Invoker {
            executable: executable.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Run `<executable> <target>` to completion and parse its report.
    pub async fn invoke(&self, target: &Path) -> Result<InvocationResult> {
        let child = Command::new(&self.executable)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| HarnessError::Spawn {
                path: target.to_path_buf(),
                source,
            })?;
        let output = match self.timeout {
            Some(after) => tokio::time::timeout(after, child.wait_with_output())
                .await
                .map_err(|_| HarnessError::Timeout {
                    path: target.to_path_buf(),
                    after,
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|e| HarnessError::io(target, e))?;
        debug!(
            instance = %target.display(),
            status = ?output.status.code(),
            "solver exited"
        );
        if !output.stderr.is_empty() {
            return Err(HarnessError::Invocation {
                path: target.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        let stdout = String::from_utf8(output.stdout).map_err(|e| HarnessError::Parse {
            path: target.to_path_buf(),
            reason: format!("solver output is not UTF-8: {e}"),
        })?;
        parse_output(target, &stdout)
    }
}

/// Split on `\n`; line 0 is the solution and the second-to-last piece is
/// the time, so output ending in `<time>\n` puts the time right there.
pub fn parse_output(target: &Path, stdout: &str) -> Result<InvocationResult> {
    let lines: Vec<&str> = stdout.split('\n').collect();
    if lines.len() < 2 {
        return Err(HarnessError::Parse {
            path: target.to_path_buf(),
            reason: format!("expected at least 2 lines, got {}", lines.len()),
        });
    }
    let time_line = lines[lines.len() - 2].trim();
    let number = regex!(r"^[+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?$");
    if !number.is_match(time_line) {
        return Err(HarnessError::Parse {
            path: target.to_path_buf(),
            reason: format!("{time_line:?} is not a time in seconds"),
        });
    }
    let elapsed = time_line.parse::<f64>().map_err(|e| HarnessError::Parse {
        path: target.to_path_buf(),
        reason: format!("{time_line:?}: {e}"),
    })?;
    Ok(InvocationResult {
        solution: lines[0].to_string(),
        elapsed,
    })
}
