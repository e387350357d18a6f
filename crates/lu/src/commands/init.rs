//! Create a new project in the current directory.

use anyhow::{Context, bail};
use clap::Args;
use lu_project::config::{DESCRIPTORS, JSON_DESCRIPTOR};
use std::fs;
use std::path::Path;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project name
    #[arg(default_value = "untitled-project")]
    pub name: String,
}

const ENTRYPOINT: &str = "init.lua";

pub fn run(args: InitArgs) -> anyhow::Result<()> {
    let root = std::env::current_dir()?;
    cmd_init(&root, &args.name)
}

fn cmd_init(root: &Path, name: &str) -> anyhow::Result<()> {
    if let Some(existing) = DESCRIPTORS.iter().find(|d| root.join(d).exists()) {
        bail!(
            "{existing} already exists in {}; remove it or pick another directory",
            root.display()
        );
    }

    let config = serde_json::json!({
        "name": name,
        "bundle": true,
        "outFile": "out.lua",
    });
    let descriptor = root.join(JSON_DESCRIPTOR);
    fs::write(&descriptor, serde_json::to_string_pretty(&config)? + "\n")
        .with_context(|| format!("failed to write {}", descriptor.display()))?;
    tracing::info!(descriptor = %descriptor.display(), "wrote project descriptor");

    let entry = root.join(ENTRYPOINT);
    if !entry.exists() {
        fs::write(&entry, "print(\"Hello world!\")\n")
            .with_context(|| format!("failed to write {}", entry.display()))?;
    }

    println!("Project \"{name}\" initialized.");
    Ok(())
}
