/*
 * tests/lessc_integration.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end compilation through a real lessc executable.
 */

//! Compilation through the real `lessc` executable.
//!
//! Each test skips when `lessc` cannot be found. Install it with
//! `npm install -g less`, or point `LESSC` at an executable.

mod common;

use std::path::Path;
use std::sync::Arc;

use common::{init_tracing, write_file};
use less_loader::{LessOptions, LesscCompiler, find_lessc, less_plugin, less_plugin_with};
use loader_host::{BuildConfig, LoadResult, Loader, PluginDriver};
use tempfile::TempDir;

fn lessc_available() -> bool {
    if find_lessc().is_some() {
        return true;
    }
    eprintln!("Skipping: lessc not found");
    false
}

async fn load(path: &Path, config: BuildConfig) -> LoadResult {
    let plugin = less_plugin().with_compiler(Arc::new(LesscCompiler::discover()));
    let driver = PluginDriver::with_plugins(config, &[&plugin]).unwrap();
    driver.load(path).await.unwrap()
}

#[tokio::test]
async fn test_compiles_variables() {
    init_tracing();
    if !lessc_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "test.less", "@color: #09c; .test { color: @color; }");

    let result = load(&path, BuildConfig::default()).await;

    assert!(result.is_success(), "errors: {:?}", result.errors);
    assert_eq!(result.loader, Loader::Css);
    assert!(result.contents.contains(".test"));
    assert!(result.contents.contains("color: #09c"));
    assert!(!result.contents.contains('@'));
}

#[tokio::test]
async fn test_undefined_variable_reports_diagnostic() {
    init_tracing();
    if !lessc_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "broken.less",
        ".test {\n  color: @undefined-variable;\n}\n",
    );

    let result = load(&path, BuildConfig::default()).await;

    assert!(!result.is_success());
    assert_eq!(result.loader, Loader::Css);
    assert_eq!(result.contents, "");
    assert_eq!(result.errors.len(), 1);
    let message = &result.errors[0];
    assert!(message.text.contains("Less compilation failed:"));
    assert!(message.text.contains("undefined"));
    let location = message.location.as_ref().unwrap();
    assert_eq!(location.file, path);
}

#[tokio::test]
async fn test_compilation_is_deterministic() {
    init_tracing();
    if !lessc_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "stable.less",
        "@w: 10px; .box { width: @w * 2; .inner { margin: @w; } }",
    );

    let first = load(&path, BuildConfig::default()).await;
    let second = load(&path, BuildConfig::default()).await;

    assert!(first.is_success());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_minify_compresses_output() {
    init_tracing();
    if !lessc_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "wide.less",
        ".a {\n  color: red;\n  margin: 0 auto;\n}\n\n.b {\n  color: blue;\n}\n",
    );

    let plain = load(&path, BuildConfig::with_minify(false)).await;
    let compressed = load(&path, BuildConfig::with_minify(true)).await;

    assert!(plain.is_success() && compressed.is_success());
    assert!(compressed.contents.len() <= plain.contents.len());
    assert!(!compressed.contents.trim_end().contains('\n'));
}

#[tokio::test]
async fn test_sibling_import_resolves_from_file_directory() {
    init_tracing();
    if !lessc_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let styles = dir.path().join("styles");
    std::fs::create_dir(&styles).unwrap();
    write_file(&styles, "variables.less", "@brand-color: #ff6600;");
    let main = write_file(
        &styles,
        "main.less",
        "@import './variables.less';\n.brand { color: @brand-color; }",
    );

    let result = load(&main, BuildConfig::default()).await;

    assert!(result.is_success(), "errors: {:?}", result.errors);
    assert!(result.contents.contains("#ff6600"));
}

#[tokio::test]
async fn test_parallel_matches_sequential() {
    init_tracing();
    if !lessc_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let paths: Vec<_> = (0..8)
        .map(|i| {
            write_file(
                dir.path(),
                &format!("p{}.less", i),
                &format!("@n: {}; .p{} {{ z-index: @n + 1; }}", i, i),
            )
        })
        .collect();

    let mut sequential = Vec::new();
    for path in &paths {
        sequential.push(load(path, BuildConfig::default()).await);
    }

    let plugin = less_plugin();
    let driver = PluginDriver::with_plugins(BuildConfig::default(), &[&plugin]).unwrap();
    let output = driver.build(paths.clone()).await;

    assert!(output.success());
    let parallel: Vec<_> = output.outputs.into_iter().map(|m| m.result).collect();
    assert_eq!(parallel, sequential);
    assert!(parallel[3].contents.contains("z-index: 4"));
}

#[tokio::test]
async fn test_language_features() {
    init_tracing();
    if !lessc_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "features.less",
        ".rounded(@r: 4px) { border-radius: @r; }\n\
         @base: 8px;\n\
         .card {\n  .rounded(6px);\n  padding: (@base * 2);\n  .title { font-weight: bold; }\n}\n",
    );

    let result = load(&path, BuildConfig::default()).await;

    assert!(result.is_success(), "errors: {:?}", result.errors);
    assert!(result.contents.contains("border-radius: 6px"));
    assert!(result.contents.contains("padding: 16px"));
    assert!(result.contents.contains(".card .title"));
}

#[tokio::test]
async fn test_global_vars_option() {
    init_tracing();
    if !lessc_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "themed.less", ".t { color: @accent; }");
    let plugin = less_plugin_with(
        LessOptions::new().set("globalVars", serde_json::json!({ "accent": "#123456" })),
    );
    let driver = PluginDriver::with_plugins(BuildConfig::default(), &[&plugin]).unwrap();

    let result = driver.load(&path).await.unwrap();

    assert!(result.is_success(), "errors: {:?}", result.errors);
    assert!(result.contents.contains("#123456"));
}
