//! External command execution.
//!
//! Every external tool the engine touches is reached through the
//! [`CommandRunner`] trait so the whole pipeline can run against
//! [`ScriptedRunner`](super::mock::ScriptedRunner) in tests.

use crate::error::{RigupError, Result};
use crate::paths::PathRegistry;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,

    /// Arguments, passed verbatim (no shell word splitting).
    pub args: Vec<String>,

    /// Working directory (None = inherit the caller's).
    pub cwd: Option<PathBuf>,

    /// Extra environment variables, merged over the process environment.
    pub env: Vec<(String, String)>,
}

impl Invocation {
    /// Create an invocation of `program` with `args`.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Run `script` through `bash -c`.
    ///
    /// Needed for tools that only exist as shell functions (nvm) and for
    /// piped installer downloads.
    pub fn shell(script: impl Into<String>) -> Self {
        Self::new("bash", ["-c".to_string(), script.into()])
    }

    /// Set the working directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.env.retain(|(k, _)| k != &key);
        self.env.push((key, value.into()));
        self
    }

    /// Use the registry's search path as this command's `PATH`.
    pub fn with_search_path(self, paths: &PathRegistry) -> Self {
        let value = paths.to_env_value().to_string_lossy().into_owned();
        self.with_env("PATH", value)
    }

    /// Look up an environment variable set on this invocation.
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render as a copy-pasteable shell command line.
    pub fn display(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        if self.program == "bash" && self.args.len() == 2 && self.args[0] == "-c" {
            // Scripts are already written for a shell; show them as-is.
            return self.args[1].clone();
        }
        parts.push(quote(&self.program));
        parts.extend(self.args.iter().map(|a| quote(a)));
        parts.join(" ")
    }
}

/// Quote a word for a POSIX shell, leaving plain words untouched.
pub fn quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '@' | '=' | ':' | ',' | '+')
        });
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
            duration: Duration::ZERO,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
            duration: Duration::ZERO,
            success: false,
        }
    }

    /// Trimmed stdout, or None when empty.
    pub fn output(&self) -> Option<&str> {
        let out = self.stdout.trim();
        (!out.is_empty()).then_some(out)
    }

    /// Last non-empty stderr line, for short failure messages.
    pub fn error_line(&self) -> Option<&str> {
        self.stderr.lines().rev().map(str::trim).find(|l| !l.is_empty())
    }

    /// Convert a non-zero exit into a `CommandFailed` error.
    pub fn into_checked(self, invocation: &Invocation) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(RigupError::CommandFailed {
                command: invocation.display(),
                code: self.exit_code,
            })
        }
    }
}

/// Capability interface over the host: processes and file presence.
pub trait CommandRunner {
    /// Run an invocation to completion.
    ///
    /// A non-zero exit is reported in the result, not as an error; errors
    /// are reserved for commands that could not be started at all.
    fn run(&self, invocation: &Invocation) -> Result<CommandResult>;

    /// Find an executable on the given search path.
    fn locate(&self, program: &str, search_path: &[PathBuf]) -> Option<PathBuf> {
        resolve_tool_path(program, search_path)
    }

    /// Check whether a file exists.
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// Run and require a zero exit.
    fn run_checked(&self, invocation: &Invocation) -> Result<CommandResult> {
        self.run(invocation)?.into_checked(invocation)
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over search path entries.
///
/// Returns the first match that exists and is executable. Does NOT use
/// the `which` command, whose behavior varies across systems.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a runner for the real host.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        let start = Instant::now();
        let shown = invocation.display();
        tracing::debug!("running: {}", shown);

        // Resolve the program against the invocation's own PATH so tools
        // installed earlier in the run are found without a shell restart.
        let program = match invocation.env_var("PATH") {
            Some(path) if !invocation.program.contains('/') => {
                let entries: Vec<PathBuf> =
                    std::env::split_paths(&OsString::from(path)).collect();
                resolve_tool_path(&invocation.program, &entries)
                    .map(|p| p.into_os_string())
                    .unwrap_or_else(|| OsString::from(&invocation.program))
            }
            _ => OsString::from(&invocation.program),
        };

        let mut cmd = Command::new(program);
        cmd.args(&invocation.args);
        if let Some(cwd) = &invocation.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &invocation.env {
            cmd.env(key, value);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().map_err(|e| {
            tracing::debug!("failed to spawn {}: {}", shown, e);
            RigupError::CommandFailed {
                command: shown.clone(),
                code: None,
            }
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        for line in stdout.lines() {
            tracing::debug!("  | {}", line);
        }
        for line in stderr.lines() {
            tracing::debug!("  ! {}", line);
        }

        Ok(CommandResult {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout,
            stderr,
            duration: start.elapsed(),
        })
    }
}
