/*
 * lessc.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Less compilation through the lessc executable.
 */

//! Less compilation through the `lessc` executable.
//!
//! `lessc` is the command-line front end of the Less reference compiler
//! (`npm install -g less`). [`LesscCompiler`] pipes the source to
//! `lessc -` and reads CSS from stdout.
//!
//! # Finding lessc
//!
//! [`find_lessc`] searches in this order:
//! 1. `LESSC` environment variable (path to the executable, or a command
//!    name to look up on PATH)
//! 2. System PATH via `which`
//!
//! # Options
//!
//! [`CompileOptions`] map onto command-line flags:
//!
//! | option | flag |
//! |--------|------|
//! | `paths` | `--include-path=<dir>:<dir>` (`;` on Windows) |
//! | `compress` | `--compress` |
//! | `globalVars` / `modifyVars` | one `--global-var=k=v` / `--modify-var=k=v` per entry |
//! | `javascriptEnabled: true` | `--js` |
//! | `strictUnits` | `--strict-units=on\|off` |
//! | other `true` | `--kebab-case-name` |
//! | other string/number | `--kebab-case-name=value` |
//!
//! `false` and `null` options are omitted. `filename` is not a flag: the
//! process runs in the file's directory so relative imports resolve against
//! the importing file.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::compiler::LessCompiler;
use crate::error::CompileError;
use crate::error_parser::parse_lessc_error;
use crate::options::{CompileOptions, PATHS};

/// Environment variable naming the lessc executable.
pub const LESSC_ENV: &str = "LESSC";

/// Find the lessc executable.
///
/// Returns `None` when neither `LESSC` nor PATH yields one.
pub fn find_lessc() -> Option<PathBuf> {
    if let Ok(value) = std::env::var(LESSC_ENV) {
        let candidate = PathBuf::from(&value);
        if candidate.is_file() {
            return Some(candidate);
        }
        if let Ok(found) = which::which(&value) {
            return Some(found);
        }
        warn!(
            env = LESSC_ENV,
            value = %value,
            "Ignoring LESSC: not an executable file or command on PATH"
        );
    }

    which::which("lessc").ok()
}

/// [`LessCompiler`] backed by the `lessc` executable.
#[derive(Debug, Clone)]
pub struct LesscCompiler {
    program: Option<PathBuf>,
}

impl LesscCompiler {
    /// Use a specific executable, or none (every compile then fails with
    /// [`CompileError::CompilerNotFound`]).
    pub fn new(program: Option<PathBuf>) -> Self {
        Self { program }
    }

    /// Locate lessc with [`find_lessc`].
    pub fn discover() -> Self {
        let program = find_lessc();
        match &program {
            Some(path) => debug!(lessc = %path.display(), "Found lessc"),
            None => debug!("lessc not found"),
        }
        Self::new(program)
    }

    pub fn program(&self) -> Option<&Path> {
        self.program.as_deref()
    }

    pub fn is_available(&self) -> bool {
        self.program.is_some()
    }
}

impl Default for LesscCompiler {
    fn default() -> Self {
        Self::discover()
    }
}

#[async_trait]
impl LessCompiler for LesscCompiler {
    fn name(&self) -> &str {
        "lessc"
    }

    async fn compile(&self, source: &str, options: &CompileOptions) -> Result<String, CompileError> {
        let program = self.program.as_ref().ok_or(CompileError::CompilerNotFound)?;
        let args = lessc_args(options)?;

        let mut cmd = Command::new(program);
        cmd.args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = options.working_dir() {
            cmd.current_dir(dir);
        }

        let spawn_error = |source: io::Error| CompileError::Spawn {
            program: program.clone(),
            source,
        };

        let mut child = cmd.spawn().map_err(spawn_error)?;

        // Feed stdin while collecting output so a large stylesheet can't
        // deadlock against a full stdout pipe.
        let stdin = child.stdin.take();
        let input = source.as_bytes();
        let write_input = async move {
            match stdin {
                Some(mut stdin) => stdin.write_all(input).await,
                None => Ok(()),
            }
        };
        let (written, output) = tokio::join!(write_input, child.wait_with_output());
        let output = output.map_err(spawn_error)?;

        let stderr = String::from_utf8_lossy(&output.stderr);

        if output.status.success() {
            if let Err(e) = written {
                return Err(spawn_error(e));
            }
            if !stderr.trim().is_empty() {
                warn!(file = %options.filename.display(), "lessc: {}", stderr.trim());
            }
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        // A broken pipe just means lessc stopped reading; its stderr says why.
        if let Err(e) = written {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(spawn_error(e));
            }
        }

        Err(compilation_error(&stderr, output.status, options))
    }
}

/// Turn a failed lessc run into a [`CompileError::Compilation`].
fn compilation_error(
    stderr: &str,
    status: std::process::ExitStatus,
    options: &CompileOptions,
) -> CompileError {
    let Some(info) = parse_lessc_error(stderr) else {
        return CompileError::compilation(format!("lessc exited with {} and no output", status));
    };

    let file = if info.is_in_stdin() {
        Some(options.filename.clone())
    } else {
        info.file.as_ref().map(PathBuf::from)
    };

    CompileError::Compilation {
        message: info.message,
        file,
        line: info.line,
        column: info.column,
    }
}

/// Build the lessc argument list for `options`, ending with `-` (stdin).
pub fn lessc_args(options: &CompileOptions) -> Result<Vec<OsString>, CompileError> {
    let mut args: Vec<OsString> = vec!["--no-color".into()];

    if !options.paths.is_empty() {
        let joined = std::env::join_paths(&options.paths)
            .map_err(|e| CompileError::invalid_option(PATHS, e.to_string()))?;
        let mut flag = OsString::from("--include-path=");
        flag.push(joined);
        args.push(flag);
    }

    if options.compress {
        args.push("--compress".into());
    }

    for (key, value) in &options.extra {
        push_extra_flag(&mut args, key, value)?;
    }

    args.push("-".into());
    Ok(args)
}

fn push_extra_flag(args: &mut Vec<OsString>, key: &str, value: &Value) -> Result<(), CompileError> {
    match (key, value) {
        ("strictUnits", Value::Bool(on)) => {
            args.push(format!("--strict-units={}", if *on { "on" } else { "off" }).into());
        }
        (_, Value::Null | Value::Bool(false)) => {}
        ("javascriptEnabled", Value::Bool(true)) => args.push("--js".into()),
        ("globalVars" | "modifyVars", Value::Object(vars)) => {
            let flag = if key == "globalVars" {
                "--global-var"
            } else {
                "--modify-var"
            };
            for (name, var) in vars {
                let var = scalar(key, var)?;
                args.push(format!("{}={}={}", flag, name.trim_start_matches('@'), var).into());
            }
        }
        (_, Value::Bool(true)) => args.push(format!("--{}", kebab_case(key)).into()),
        (_, Value::String(_) | Value::Number(_)) => {
            args.push(format!("--{}={}", kebab_case(key), scalar(key, value)?).into());
        }
        _ => {
            return Err(CompileError::invalid_option(
                key,
                "expected a boolean, string or number",
            ));
        }
    }
    Ok(())
}

fn scalar(key: &str, value: &Value) -> Result<String, CompileError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(CompileError::invalid_option(
            key,
            "values must be strings, numbers or booleans",
        )),
    }
}

/// `strictMath` -> `strict-math`.
fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
