// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use plasmflow::config::{load_and_validate_config, load_config, PipelineBuilder};
use plasmflow::processors::ModuleFactory;

#[derive(Parser)]
#[command(name = "plasmflow")]
#[command(about = "Build and run dataflow graphs of typed modules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a pipeline, execute it, and print every module's outputs
    Run {
        /// Pipeline description (.yaml, .yml or .toml)
        file: PathBuf,

        /// Also print the graph in graphviz dot form
        #[arg(long)]
        viz: bool,
    },

    /// Check a pipeline description without running it
    Validate {
        file: PathBuf,
    },

    /// Print the graph of a pipeline in graphviz dot form
    Viz {
        file: PathBuf,
    },

    /// Document the slots of every built-in module type
    Modules,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { file, viz } => run_pipeline(&file, viz),
        Commands::Validate { file } => validate_pipeline(&file),
        Commands::Viz { file } => viz_pipeline(&file),
        Commands::Modules => describe_modules(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

fn run_pipeline(file: &Path, viz: bool) -> Result<()> {
    let config = load_config(file).with_context(|| format!("loading {}", file.display()))?;
    let pipeline = PipelineBuilder::new()
        .build(&config)
        .with_context(|| format!("building {}", file.display()))?;

    println!("🚀 Running {}", file.display());
    println!("═══════════════════════════════════");

    if viz {
        println!("{}", pipeline.plasm().viz_string());
    }

    let summaries = pipeline.run().context("executing pipeline")?;
    for (iteration, summary) in summaries.iter().enumerate() {
        println!(
            "iteration {}: {} module(s) executed, {} skipped, {:?}",
            iteration + 1,
            summary.executed.len(),
            summary.skipped,
            summary.duration
        );
    }

    println!();
    println!("📊 Outputs:");
    pipeline
        .write_outputs(&mut io::stdout().lock())
        .context("writing outputs")?;
    Ok(())
}

fn validate_pipeline(file: &Path) -> Result<()> {
    let config = load_and_validate_config(file)?;
    println!(
        "✅ {} is valid: {} module(s), {} connection(s)",
        file.display(),
        config.modules.len(),
        config.connections.len()
    );
    Ok(())
}

fn viz_pipeline(file: &Path) -> Result<()> {
    let config = load_config(file).with_context(|| format!("loading {}", file.display()))?;
    let pipeline = PipelineBuilder::new().build(&config)?;
    pipeline
        .plasm()
        .viz(&mut io::stdout().lock())
        .context("writing graph")?;
    Ok(())
}

fn describe_modules() -> Result<()> {
    let factory = ModuleFactory::default();
    let mut doc = String::new();
    for type_name in factory.available() {
        if let Some(module) = factory.create(type_name, type_name) {
            module?.print_doc(&mut doc)?;
            doc.push('\n');
        }
    }
    print!("{doc}");
    Ok(())
}
