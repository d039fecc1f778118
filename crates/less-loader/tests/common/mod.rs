//! Shared helpers for less-loader integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use less_loader::{CompileError, CompileOptions, LessCompiler};
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Compiler that wraps the source in a comment naming its options.
///
/// Sources containing `@fail` are rejected with a located error.
#[derive(Default)]
pub struct FakeCompiler {
    seen: Mutex<Vec<CompileOptions>>,
}

impl FakeCompiler {
    pub fn seen(&self) -> Vec<CompileOptions> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LessCompiler for FakeCompiler {
    fn name(&self) -> &str {
        "fake"
    }

    async fn compile(&self, source: &str, options: &CompileOptions) -> Result<String, CompileError> {
        self.seen.lock().unwrap().push(options.clone());
        // Finish out of request order
        let delay = (options.filename.as_os_str().len() % 7) as u64;
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;

        if source.contains("@fail") {
            return Err(CompileError::Compilation {
                message: "forced failure".to_string(),
                file: Some(options.filename.clone()),
                line: Some(1),
                column: Some(1),
            });
        }
        Ok(format!(
            "/* {} compress={} */\n{}",
            options.filename.display(),
            options.compress,
            source
        ))
    }
}
