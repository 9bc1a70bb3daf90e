//! Blocking builder for executing external tool commands.
//!
//! stdout is drained on the calling thread so a per-line callback can
//! observe progress as it is printed; stderr is drained concurrently on a
//! helper thread so a chatty tool can never fill the pipe and deadlock.

use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use tf_core::{Error, Result, SourceSnapshot, Tool, ToolDiagnostics};

/// How MKVToolNix-style exit codes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitClass {
    /// Exit code 0.
    Success,
    /// Exit code 1: finished, with warnings. Treated as success.
    Warning,
    /// Exit code 2 or above, or killed by a signal.
    Error,
}

impl ExitClass {
    pub fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => ExitClass::Success,
            Some(1) => ExitClass::Warning,
            _ => ExitClass::Error,
        }
    }

    pub fn is_success(self) -> bool {
        !matches!(self, ExitClass::Error)
    }
}

/// Output captured from a tool execution, split into lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl ToolOutput {
    pub fn class(&self) -> ExitClass {
        ExitClass::from_code(self.exit_code)
    }
}

/// A builder for constructing and executing external tool invocations.
///
/// Unlike [`std::process::Command`] the argument list stays inspectable,
/// so it can be attached verbatim to [`ToolDiagnostics`].
#[derive(Debug, Clone)]
pub struct ToolCommand {
    tool: Tool,
    program: PathBuf,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a new command for the given tool and resolved program path.
    pub fn new(tool: Tool, program: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append a path argument.
    pub fn path_arg(&mut self, path: &Path) -> &mut Self {
        self.arg(path.to_string_lossy())
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Printable command line. Arguments with spaces or quotes are wrapped
    /// in double quotes with embedded quotes doubled.
    pub fn command_line(&self) -> String {
        let mut line = quote_arg(&self.program.to_string_lossy());
        for arg in &self.args {
            line.push(' ');
            line.push_str(&quote_arg(arg));
        }
        line
    }

    /// Run to completion, capturing stdout and stderr.
    pub fn run(&self) -> Result<ToolOutput> {
        self.run_streaming(|_| {})
    }

    /// Run to completion, calling `on_stdout` for each stdout line as it
    /// arrives. The callback runs on the calling thread.
    ///
    /// # Errors
    ///
    /// Only fails when the process cannot be spawned or waited on. A
    /// non-zero exit code is reported through [`ToolOutput::exit_code`].
    pub fn run_streaming(&self, mut on_stdout: impl FnMut(&str)) -> Result<ToolOutput> {
        tracing::debug!("spawning {}", self.command_line());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                tool: self.tool,
                source,
            })?;

        let stderr_thread = child.stderr.take().map(|stderr| {
            thread::spawn(move || {
                let mut lines = Vec::new();
                for_each_line(stderr, |line| lines.push(line));
                lines
            })
        });

        let mut stdout_lines = Vec::new();
        if let Some(stdout) = child.stdout.take() {
            for_each_line(stdout, |line| {
                on_stdout(&line);
                stdout_lines.push(line);
            });
        }

        let status = child.wait()?;
        let stderr_lines = stderr_thread
            .map(|t| t.join().unwrap_or_default())
            .unwrap_or_default();

        tracing::debug!("{} exited with {:?}", self.tool, status.code());

        Ok(ToolOutput {
            exit_code: status.code(),
            stdout: stdout_lines,
            stderr: stderr_lines,
        })
    }

    /// Build the diagnostics record for a failed run of this command.
    pub fn diagnostics(&self, output: &ToolOutput, source: Option<SourceSnapshot>) -> ToolDiagnostics {
        ToolDiagnostics {
            tool: self.tool,
            program: self.program.clone(),
            args: self.args.clone(),
            exit_code: output.exit_code,
            stdout: output.stdout.clone(),
            stderr: output.stderr.clone(),
            source,
        }
    }
}

/// Read `reader` line by line, tolerating invalid UTF-8.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. mkvmerge rewrites its
/// progress line in place with `\r`, so each update is delivered as soon
/// as it is written.
fn for_each_line(reader: impl Read, mut f: impl FnMut(String)) {
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let mut after_cr = false;
    loop {
        let chunk = match reader.fill_buf() {
            Ok([]) => break,
            Ok(chunk) => chunk,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!("stopped reading tool output: {}", e);
                break;
            }
        };
        let consumed = chunk.len();
        for &byte in chunk {
            match byte {
                b'\n' if after_cr => after_cr = false,
                b'\r' | b'\n' => {
                    f(String::from_utf8_lossy(&line).into_owned());
                    line.clear();
                    after_cr = byte == b'\r';
                }
                _ => {
                    after_cr = false;
                    line.push(byte);
                }
            }
        }
        reader.consume(consumed);
    }
    if !line.is_empty() {
        f(String::from_utf8_lossy(&line).into_owned());
    }
}

fn quote_arg(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains([' ', '\t', '"']) {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('"', "\"\""))
}
