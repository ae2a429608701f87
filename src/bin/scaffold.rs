//! Dashboard Scaffold CLI
//!
//! Generates CRUD dashboard code from a JSON schema document.
//!
//! Usage:
//!   scaffold generate input.json --output ./src
//!   cat input.json | scaffold generate --dry-run
//!   scaffold render form input.json
//!   scaffold check input.json --diff
//!   scaffold lint inputs/
//!   scaffold types
//!   scaffold config init

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use dashboard_scaffold::codegen::render_artifact;
use dashboard_scaffold::codegen::types::mapping_table;
use dashboard_scaffold::drift::check_drift;
use dashboard_scaffold::lint::{lint_input, lint_inputs, LintResult};
use dashboard_scaffold::{
    ArtifactKind, DriftStatus, FileStatus, InputConfig, Orchestrator, ScaffoldConfig, WriteOptions,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scaffold")]
#[command(about = "Generate CRUD dashboard code from a JSON field schema")]
#[command(version)]
struct Cli {
    /// Configuration file layered over the default locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every artifact of the input's template set
    Generate {
        /// Input JSON file (stdin when omitted or "-")
        input: Option<PathBuf>,
        /// Output root (default: [output].root)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Template set, overriding the input's templateName
        #[arg(short, long)]
        template: Option<String>,
        /// Replace existing files
        #[arg(long)]
        overwrite: bool,
        /// Render and report without writing
        #[arg(long)]
        dry_run: bool,
        /// Skip the manifest
        #[arg(long)]
        no_manifest: bool,
        /// Generate even when lint reports errors
        #[arg(long)]
        force: bool,
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print one artifact to stdout
    Render {
        /// Artifact name (model, types, collection-route, item-route, form, ...)
        artifact: String,
        /// Input JSON file (stdin when omitted or "-")
        input: Option<PathBuf>,
    },

    /// Compare generated output on disk against a fresh render
    Check {
        /// Input JSON file (stdin when omitted or "-")
        input: Option<PathBuf>,
        /// Output root (default: [output].root)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print unified diffs of modified files
        #[arg(long)]
        diff: bool,
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Lint an input file or every JSON input in a directory
    Lint {
        /// Input JSON file or directory (stdin when omitted or "-")
        input: Option<PathBuf>,
    },

    /// Print the field type mapping table
    Types,

    /// Show or create configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        #[arg(default_value = "scaffold.toml")]
        path: PathBuf,
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();

    let config = match ScaffoldConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command, config) {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config: ScaffoldConfig) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            input,
            output,
            template,
            overwrite,
            dry_run,
            no_manifest,
            force,
            format,
        } => {
            let (input_id, input) = read_input(input.as_deref(), template.as_deref(), &config)?;

            let lint = lint_input(&input_id, &input);
            if format == OutputFormat::Text {
                print_lint(&lint);
            }
            if !lint.is_clean() {
                if force {
                    eprintln!("⚠️  Generating despite {} lint error(s) (--force)", lint.errors.len());
                } else {
                    lint.ensure_clean()?;
                }
            }

            let options = config.generation.options();
            let templates = config.generation.templates()?;
            let write = WriteOptions {
                overwrite: overwrite || config.output.overwrite,
                dry_run,
                manifest: config.output.manifest && !no_manifest,
            };
            let root = output.unwrap_or_else(|| config.output_root());

            let report = Orchestrator::new(&options, &templates, write).run(&input, &root)?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => {
                    if report.dry_run {
                        println!("🔍 Dry run - nothing written");
                    }
                    println!("📂 {}", report.entity_dir.display());
                    for file in &report.files {
                        let icon = match file.status {
                            FileStatus::Written => "✅",
                            FileStatus::Unchanged => "  ",
                            FileStatus::Skipped => "⏭️ ",
                            FileStatus::Failed { .. } => "❌",
                        };
                        let rel = file.path.strip_prefix(&report.entity_dir).unwrap_or(file.path.as_path());
                        println!("  {} {:<18} {} ({})", icon, file.kind.as_str(), rel.display(), file.status);
                    }
                    for field in &report.unsupported {
                        println!("  ⚠️  {} has an unsupported type and was generated as a disabled text field", field);
                    }
                    if let Some(path) = &report.manifest {
                        println!("  📝 manifest: {}", path.display());
                    }
                    if let Some(error) = &report.manifest_error {
                        println!("  ❌ manifest: {}", error);
                    }
                    println!();
                    println!("📊 {}", report.summary());
                    if report.skipped() > 0 {
                        println!("   Use --overwrite to replace skipped files");
                    }
                }
            }

            if !report.is_success() {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Render { artifact, input } => {
            let kind: ArtifactKind = artifact.parse()?;
            let (_, input) = read_input(input.as_deref(), None, &config)?;
            let options = config.generation.options();
            let templates = config.generation.templates()?;
            let file = render_artifact(kind, &input, &options, &templates)?;
            print!("{}", file.content);
            Ok(())
        }

        Commands::Check {
            input,
            output,
            diff,
            format,
        } => {
            let (_, input) = read_input(input.as_deref(), None, &config)?;
            let options = config.generation.options();
            let templates = config.generation.templates()?;
            let root = output.unwrap_or_else(|| config.output_root());

            let report = check_drift(&input, &options, &templates, &root)?;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => {
                    println!("🔍 Drift check: {}", report.entity_dir.display());
                    if !report.manifest_found {
                        println!("   (no manifest found; orphaned files cannot be detected)");
                    }
                    for entry in &report.entries {
                        match &entry.status {
                            DriftStatus::Clean => {}
                            DriftStatus::Missing => println!("  ❌ missing   {}", entry.path),
                            DriftStatus::Orphaned => println!("  🗑️  orphaned  {}", entry.path),
                            DriftStatus::Modified { diff: text, edited } => {
                                let note = match edited {
                                    Some(true) => " (edited by hand)",
                                    Some(false) => " (stale output)",
                                    None => "",
                                };
                                println!("  ✏️  modified  {}{}", entry.path, note);
                                if diff {
                                    println!("{}", text);
                                }
                            }
                        }
                    }
                    for path in &report.untracked {
                        println!("  ❔ untracked {}", path);
                    }
                    println!();
                    println!("📊 {}", report.summary());
                }
            }

            if report.is_clean() {
                eprintln!("✅ No drift detected");
                Ok(())
            } else {
                eprintln!("⚠️  Generated files differ from a fresh render");
                std::process::exit(1);
            }
        }

        Commands::Lint { input } => {
            let results = match input.as_deref() {
                Some(dir) if dir.is_dir() => lint_inputs(dir),
                other => {
                    let (input_id, input) = read_input(other, None, &config)?;
                    vec![lint_input(&input_id, &input)]
                }
            };

            for result in &results {
                print_lint(result);
            }
            let errors: usize = results.iter().map(|r| r.errors.len()).sum();
            let warnings: usize = results.iter().map(|r| r.warnings.len()).sum();
            println!();
            println!("📊 {} input(s), {} error(s), {} warning(s)", results.len(), errors, warnings);

            if errors > 0 {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Types => {
            let rows = mapping_table(&config.generation.default_options);
            println!("{:<14} {:<16} {:<24} {}", "TAG", "WIDGET", "TYPESCRIPT", "PERSISTENCE");
            for row in rows {
                println!(
                    "{:<14} {:<16} {:<24} {}",
                    row.tag, row.widget, row.ts_type, row.persistence
                );
            }
            Ok(())
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                print!("{}", toml::to_string_pretty(&config)?);
                if let Some(path) = ScaffoldConfig::user_config_path() {
                    eprintln!("# user config: {}", path.display());
                }
                Ok(())
            }
            ConfigAction::Init { path, force } => {
                if path.exists() && !force {
                    bail!("{} already exists (use --force to replace it)", path.display());
                }
                ScaffoldConfig::default()
                    .save(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("✅ Wrote {}", path.display());
                Ok(())
            }
        },
    }
}

/// Read and parse input from a file, or stdin for `None` / `-`
fn read_input(
    path: Option<&Path>,
    template: Option<&str>,
    config: &ScaffoldConfig,
) -> anyhow::Result<(String, InputConfig)> {
    let (input_id, json) = match path {
        Some(path) if path != Path::new("-") => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            (path.display().to_string(), json)
        }
        _ => {
            let mut json = String::new();
            std::io::stdin()
                .read_to_string(&mut json)
                .context("reading input from stdin")?;
            ("<stdin>".to_string(), json)
        }
    };

    let mut input = InputConfig::from_json_with_default(&json, config.generation.default_template)
        .with_context(|| format!("parsing {}", input_id))?;
    if let Some(name) = template {
        input.template = name.parse()?;
    }
    Ok((input_id, input))
}

fn print_lint(result: &LintResult) {
    if result.errors.is_empty() && result.warnings.is_empty() {
        println!("✅ {} - clean", result.input_id);
        return;
    }
    println!("📄 {}", result.input_id);
    for error in &result.errors {
        println!("  ❌ [{}] {}: {}", error.code, error.path, error.message);
    }
    for warning in &result.warnings {
        println!("  ⚠️  [{}] {}: {}", warning.code, warning.path, warning.message);
    }
}
