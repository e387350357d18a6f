//! Build a project from its descriptor.

use anyhow::Context;
use clap::Args;
use lu_project::Project;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project directory
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

pub fn run(args: BuildArgs) -> anyhow::Result<()> {
    let project = Project::open(&args.dir)
        .with_context(|| format!("failed to open project at {}", args.dir.display()))?;
    let report = lu_project::build(&project)?;
    super::print_report(&report);
    Ok(())
}
