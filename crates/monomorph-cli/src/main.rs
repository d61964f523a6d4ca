//! Command-line driver for the monomorph source generator.
//!
//! The binary is a thin wrapper over the `monomorph` engine: it loads a
//! YAML manifest, round-trip-validates every unit, renders every variant in
//! memory, and only then touches the filesystem. A failed run writes
//! nothing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use monomorph::{render_unit, validate_round_trip, JinjaEvaluator};

mod manifest;
use manifest::Manifest;

#[derive(Parser)]
#[command(
    name = "monomorph",
    version,
    about = "Generate type-specialized copies of an annotated source unit"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate every unit, then write one output file per variant.
    Generate {
        /// Path to the generation manifest (YAML).
        manifest: PathBuf,
    },
    /// Validate round-trip consistency only; write nothing.
    Check {
        /// Path to the generation manifest (YAML).
        manifest: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate { manifest } => run(&manifest, true),
        Command::Check { manifest } => run(&manifest, false),
    }
}

fn run(manifest_path: &Path, emit: bool) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let evaluator = JinjaEvaluator::new();

    // Everything renders in memory first. Nothing is written until every
    // unit has passed round-trip validation and rendered cleanly, so a
    // failed run leaves the filesystem in its prior state.
    let mut pending: Vec<(PathBuf, String)> = Vec::new();
    for unit in &manifest.units {
        let source_path = base.join(&unit.source);
        let text = fs::read_to_string(&source_path)
            .with_context(|| format!("reading {}", source_path.display()))?;
        let lines: Vec<String> = text.lines().map(|l| l.trim_end().to_string()).collect();

        validate_round_trip(&lines, &manifest.reference, &evaluator)
            .with_context(|| format!("in {}", unit.source.display()))?;
        info!(unit = %unit.source.display(), "round-trip validation passed");

        let variants = unit.variant_set(&manifest);
        let outputs = render_unit(&lines, &variants, &evaluator)
            .with_context(|| format!("in {}", unit.source.display()))?;
        for (variant, out_lines) in variants.iter().zip(outputs) {
            let path = base.join(unit.output_path(variant));
            let mut body = out_lines.join("\n");
            body.push('\n');
            debug!(
                variant = %variant.display_name,
                path = %path.display(),
                lines = out_lines.len(),
                "rendered variant"
            );
            pending.push((path, body));
        }
    }

    if !emit {
        println!(
            "ok: {} unit(s) validated, {} variant file(s) up for generation",
            manifest.units.len(),
            pending.len()
        );
        return Ok(());
    }

    for (path, body) in &pending {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating directory {}", dir.display()))?;
        }
        fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
    }
    println!("generated {} file(s)", pending.len());
    Ok(())
}
