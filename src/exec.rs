//! Process execution behind an injectable [`Executor`] trait.
use anyhow::{Context as _, Result};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};

use crate::error::PlatformError;
use crate::progress::ProgressSink;

/// Result of a captured command execution.
#[derive(Debug, Clone, Default)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Abstraction over running external programs.
///
/// [`SystemExecutor`] spawns real processes; tests substitute recording
/// implementations.
pub trait Executor: Send + Sync {
    /// Run a command to completion and capture its output. A non-zero exit
    /// is returned as `success == false`, not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with standard error merged into standard output,
    /// handing each trimmed, non-empty line to `sink` as it arrives.
    ///
    /// Blocks the calling thread until the child exits. Returns whether the
    /// exit status was zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or its output
    /// cannot be read.
    fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
        sink: &dyn ProgressSink,
    ) -> Result<bool>;

    /// Check whether a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// Executor that runs real processes on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
        sink: &dyn ProgressSink,
    ) -> Result<bool> {
        let (reader, writer) = std::io::pipe().context("failed to create output pipe")?;
        let writer_err = writer
            .try_clone()
            .context("failed to duplicate output pipe")?;

        // The Command keeps copies of the pipe's write end; it must be
        // dropped before reading or the read loop never sees EOF.
        let mut child = {
            let mut cmd = Command::new(program);
            cmd.args(args)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(writer_err);
            if let Some(dir) = cwd {
                cmd.current_dir(dir);
            }
            cmd.spawn().map_err(|source| PlatformError::Spawn {
                program: program.to_string(),
                source,
            })?
        };

        if let Err(e) = forward_lines(BufReader::new(reader), sink) {
            abandon(&mut child);
            return Err(e).with_context(|| format!("reading output of {program}"));
        }

        let status = child
            .wait()
            .with_context(|| format!("waiting for {program}"))?;
        Ok(status.success())
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Send each non-empty trimmed line of `reader` to `sink` until EOF.
fn forward_lines<R: BufRead>(mut reader: R, sink: &dyn ProgressSink) -> std::io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim();
        if !line.is_empty() {
            sink.line(line);
        }
    }
}

/// Kill and reap a child whose output can no longer be read.
fn abandon(child: &mut Child) {
    if let Err(e) = child.kill() {
        tracing::debug!("kill failed: {e}");
    }
    if let Err(e) = child.wait() {
        tracing::debug!("wait failed: {e}");
    }
}
