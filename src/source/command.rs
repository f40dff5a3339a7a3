//! Raw graphs produced by an external program.

use std::process::{Command, Stdio};

use tracing::{debug, info};

use super::GraphSource;
use crate::error::{Result, SbomGraphError};
use crate::model::RawGraph;

/// Runs `program [args..] <target>` and parses its stdout as a JSON dump.
///
/// A spawn failure, a non-zero exit or unparsable output all mean the data
/// could not be acquired.
#[derive(Debug, Clone)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
}

impl CommandSource {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments placed before the target
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl GraphSource for CommandSource {
    fn fetch(&self, target: &str) -> Result<RawGraph> {
        info!(program = %self.program, target, "acquiring raw graph");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                SbomGraphError::source_unavailable(
                    target,
                    format!("failed to spawn {}: {e}", self.program),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SbomGraphError::source_unavailable(
                target,
                format!("{} exited with {}: {}", self.program, output.status, stderr.trim()),
            ));
        }
        debug!(bytes = output.stdout.len(), "source command finished");

        serde_json::from_slice(&output.stdout).map_err(|e| {
            SbomGraphError::source_unavailable(
                target,
                format!("unparsable output from {}: {e}", self.program),
            )
        })
    }

    fn name(&self) -> &str {
        "command"
    }
}
