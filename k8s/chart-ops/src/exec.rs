use crate::common::error::{HelmCommand, HelmCommandFailed, Result, U8VectorToString};
use async_trait::async_trait;
use snafu::{ensure, ResultExt};
use std::{path::Path, str};
use tokio::process::Command;
use tracing::debug;

/// Runs a binary with a list of arguments to completion.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Runs `binary args...` and returns its standard output. A command which cannot be started,
    /// or which exits with a non-zero status, is an error.
    async fn exec(&self, binary: &Path, args: &[String]) -> Result<String>;
}

/// This type runs commands as child processes of the current process.
#[derive(Clone, Debug, Default)]
pub struct ProcessExecutor {
    verbose: bool,
}

impl ProcessExecutor {
    /// Creates a ProcessExecutor which does not log command output.
    pub fn new() -> Self {
        Self::default()
    }

    /// If set, the standard output of every command is logged at debug level.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn exec(&self, binary: &Path, args: &[String]) -> Result<String> {
        let command = binary.to_string_lossy().to_string();

        debug!(%command, ?args, "Running command");

        let output = Command::new(binary)
            .args(args)
            .output()
            .await
            .context(HelmCommand {
                command: command.clone(),
                args: args.to_vec(),
            })?;

        ensure!(
            output.status.success(),
            HelmCommandFailed {
                command,
                args: args.to_vec(),
                code: output.status.code(),
                std_err: String::from_utf8_lossy(output.stderr.as_slice())
                    .trim()
                    .to_string(),
            }
        );

        let stdout_str = str::from_utf8(output.stdout.as_slice()).context(U8VectorToString)?;
        if self.verbose {
            debug!(stdout=%stdout_str, "Command standard output");
        }

        Ok(stdout_str.to_string())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::{CommandExecutor, ProcessExecutor};
    use crate::common::error::{Error, ErrorKind};
    use std::path::Path;

    fn shell_args(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn returns_standard_output_unmodified() {
        let output = ProcessExecutor::new()
            .with_verbose(true)
            .exec(Path::new("sh"), &shell_args("printf 'kind: Pod\\n  name: x\\n'"))
            .await
            .unwrap();

        assert_eq!(output, "kind: Pod\n  name: x\n");
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_execution_failure() {
        let error = ProcessExecutor::new()
            .exec(Path::new("sh"), &shell_args("echo partial; echo broken >&2; exit 3"))
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Execution);
        match error {
            Error::HelmCommandFailed { code, std_err, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(std_err, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_is_an_execution_failure() {
        let error = ProcessExecutor::new()
            .exec(Path::new("/nonexistent/helm"), &["version".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(error, Error::HelmCommand { .. }));
        assert_eq!(error.kind(), ErrorKind::Execution);
    }
}
