//! End-to-end project builds on temporary directories.

use lu_project::{
    BuildError, Disk, FetchError, Fetcher, MODULES_DIR, Project, Severity, build_with,
};
use std::path::Path;
use tempfile::TempDir;

/// Fetcher for projects that must not touch the network.
struct Offline;

impl Fetcher for Offline {
    fn fetch(&self, uri: &str) -> Result<String, FetchError> {
        Err(FetchError::Transport {
            uri: uri.to_string(),
            message: "offline".to_string(),
        })
    }
}

struct Fixed(&'static str);

impl Fetcher for Fixed {
    fn fetch(&self, _uri: &str) -> Result<String, FetchError> {
        Ok(self.0.to_string())
    }
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = dir.path().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
    dir
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn bundle_contains_every_traced_module() {
    let dir = project(&[
        (
            "luconfig.json",
            r#"{ "name": "demo", "entrypoint": "init.lu", "bundle": true, "outFile": "out.lua" }"#,
        ),
        ("init.lu", "local a = require(\"mod_a\")\nprint(a)"),
        ("mod_a.lu", "return require(\"mod_b\") .. __LU_PROJECT__"),
        ("mod_b.lua", "return \"b\""),
    ]);
    let project = Project::open(dir.path()).unwrap();
    let report = build_with(&project, &Disk, &Offline).unwrap();

    assert!(report.notices.is_empty());
    assert_eq!(report.written, vec![project.root.join("out.lua")]);
    let out = read(dir.path(), "out.lua");
    assert!(out.contains("  mod_a = function(...)\n"), "{out}");
    assert!(out.contains("  mod_b = function(...)\n"), "{out}");
    assert_eq!(out.matches("= function(...)\n").count(), 2, "{out}");
    assert!(out.contains("return __LU_REQUIRE(input)"), "{out}");
    assert!(out.contains("\"demo\""), "{out}");
    assert!(out.ends_with("local a = require(\"mod_a\")\nprint(a)\n"), "{out}");
}

#[test]
fn bundle_without_modules_writes_entry() {
    let dir = project(&[
        ("lu.toml", "name = \"solo\"\nentrypoint = \"main.lu\"\nbundle = true\nout_file = \"dist/solo.lua\"\nminify = true\n"),
        ("main.lu", "local x = 1\nx += 1\nprint(x)"),
    ]);
    let project = Project::open(dir.path()).unwrap();
    build_with(&project, &Disk, &Offline).unwrap();
    assert_eq!(read(dir.path(), "dist/solo.lua"), "local x=1 x=(x+1) print(x)\n");
}

#[test]
fn unbundled_build_mirrors_sources() {
    let dir = project(&[
        ("luconfig.json", r#"{ "name": "tree", "entrypoint": "init.lu", "outDir": "build" }"#),
        ("init.lu", "local util = require(\"lib.util\")"),
        ("lib/util.lu", "local m = require(\"./helpers\")\nreturn m"),
        ("lib/helpers.lua", "return {}"),
    ]);
    let project = Project::open(dir.path()).unwrap();
    let report = build_with(&project, &Disk, &Offline).unwrap();

    assert_eq!(report.written.len(), 3);
    assert_eq!(read(dir.path(), "build/init.lua"), "local util = require(\"lib.util\")\n");
    assert_eq!(read(dir.path(), "build/lib/util.lua"), "local m = require(\"./helpers\")\nreturn m\n");
    assert_eq!(read(dir.path(), "build/lib/helpers.lua"), "return {}\n");
}

#[test]
fn unresolved_module_is_a_single_warning() {
    let dir = project(&[
        (
            "luconfig.json",
            r#"{ "name": "x", "entrypoint": "init.lu", "outDir": "out", "modules": ["socket"] }"#,
        ),
        ("init.lu", "local a = require(\"nope\")\nlocal s = require(\"socket\")"),
    ]);
    let project = Project::open(dir.path()).unwrap();
    let report = build_with(&project, &Disk, &Offline).unwrap();

    let notices: Vec<_> = report.notices.iter().collect();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Warning);
    assert!(notices[0].text.contains("\"nope\""));
    assert!(read(dir.path(), "out/init.lua").contains("require(\"nope\")"));
}

#[test]
fn remote_modules_are_bundled_and_materialized() {
    let dir = project(&[
        (
            "luconfig.json",
            r#"{ "name": "net", "entrypoint": "init.lu", "bundle": true, "outFile": "out.lua" }"#,
        ),
        ("init.lu", "local r = require(\"https://mods.test/r.lu\")"),
    ]);
    let project = Project::open(dir.path()).unwrap();
    let report = build_with(&project, &Disk, &Fixed("return 7")).unwrap();

    assert!(report.notices.is_empty());
    let out = read(dir.path(), "out.lua");
    assert!(out.contains("[\"https://mods.test/r.lu\"] = function(...)\n    return 7\n  end"), "{out}");
    let modules: Vec<_> = std::fs::read_dir(dir.path().join(MODULES_DIR))
        .unwrap()
        .collect();
    assert_eq!(modules.len(), 1);
}

#[test]
fn failed_fetch_is_a_notice() {
    let dir = project(&[
        ("luconfig.json", r#"{ "name": "net", "entrypoint": "init.lu", "outDir": "out" }"#),
        ("init.lu", "local r = require(\"https://mods.test/r.lu\")"),
    ]);
    let project = Project::open(dir.path()).unwrap();
    let report = build_with(&project, &Disk, &Offline).unwrap();

    assert_eq!(report.notices.len(), 1);
    assert!(!dir.path().join(MODULES_DIR).exists());
}

#[test]
fn compile_errors_fail_the_build() {
    let dir = project(&[
        ("luconfig.json", r#"{ "name": "bad", "entrypoint": "init.lu", "outDir": "out" }"#),
        ("init.lu", "@memo\nreturn 1"),
    ]);
    let project = Project::open(dir.path()).unwrap();
    let err = build_with(&project, &Disk, &Offline).unwrap_err();
    assert!(matches!(err, BuildError::Compile { .. }));
    assert!(err.to_string().contains("script:1: intrinsic must precede"), "{err}");
}

#[test]
fn single_file_project() {
    let dir = project(&[("app.lu", "print(__LU_PROJECT__)")]);
    let out = dir.path().join("app.out.lua");
    let project = Project::single_file(&dir.path().join("app.lu"), Some(out.clone()), false, false)
        .unwrap();
    assert_eq!(project.config.name, "app.lu");
    build_with(&project, &Disk, &Offline).unwrap();
    assert_eq!(std::fs::read_to_string(out).unwrap(), "print(\"app.lu\")\n");
}
