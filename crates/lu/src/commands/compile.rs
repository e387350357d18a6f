//! Compile a single file without a project descriptor.

use anyhow::Context;
use clap::{Args, ValueEnum};
use lu_project::{Project, compile_module};
use lu_syntax::{Renderer, renderer_for_style};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// Lua source
    Lua,
    /// Desugared syntax tree as JSON
    Ast,
}

#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Script to compile (.lu or .lua)
    pub input: PathBuf,

    /// Output file (prints to stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Emit minified Lua
    #[arg(long)]
    pub minify: bool,

    /// Bundle required local modules into the output
    #[arg(long, requires = "output", conflicts_with = "emit")]
    pub bundle: bool,

    /// What to emit
    #[arg(long, value_enum, default_value_t = Emit::Lua)]
    pub emit: Emit,
}

pub fn run(args: CompileArgs) -> anyhow::Result<()> {
    let output = match &args.output {
        Some(path) => Some(std::env::current_dir()?.join(path)),
        None => None,
    };

    if args.emit == Emit::Lua && output.is_some() {
        let project = Project::single_file(&args.input, output, args.bundle, args.minify)?;
        let report = lu_project::build(&project)?;
        super::print_report(&report);
        return Ok(());
    }

    let project = Project::single_file(&args.input, None, false, args.minify)?;
    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let chunk = compile_module(&source, &project)
        .with_context(|| format!("failed to compile {}", args.input.display()))?;

    tracing::info!(input = %args.input.display(), emit = ?args.emit, "compiled script");

    let text = match args.emit {
        Emit::Ast => serde_json::to_string_pretty(&chunk)? + "\n",
        Emit::Lua => {
            let renderer = renderer_for_style(project.config.style())
                .context("renderer not registered")?;
            renderer.render_chunk(&chunk)
        }
    };
    match output {
        Some(path) => {
            std::fs::write(&path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => print!("{text}"),
    }
    Ok(())
}
