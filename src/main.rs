//! Statera command-line entry point

mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use statera_config::{Config, ConfigError};
use statera_core::{Engine, ErrorSeverity};
use statera_io::{
    export_snapshot, export_tabular, import_snapshot, import_tabular, DirTemplateStore, ImportMode,
    ImportOptions, SerializationError, Snapshot, TabularOptions, TemplateStore,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use render::Renderer;

#[derive(Parser, Debug)]
#[command(name = "statera")]
#[command(version = "0.1.0")]
#[command(about = "Balance sheet, income statement, cash flow and ratios from line items", long_about = None)]
struct Args {
    /// Configuration file path (defaults are used when it does not exist)
    #[arg(short, long, default_value = "statera.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print statements, ratios and the balance check for a snapshot
    Report {
        snapshot: PathBuf,
        /// Print the computation result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Exit with status 2 when the balance sheet does not balance
    Check { snapshot: PathBuf },
    /// Import line items from CSV into a snapshot file
    ImportCsv {
        csv: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Add to the items already in the output snapshot
        #[arg(long)]
        append: bool,
    },
    /// Export a snapshot's line items as CSV
    ExportCsv {
        snapshot: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Manage named templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Print the default configuration
    InitConfig,
}

#[derive(Subcommand, Debug)]
enum TemplateAction {
    /// Save a snapshot under a name
    Save { name: String, snapshot: PathBuf },
    /// Write a stored template out as a snapshot file
    Load {
        name: String,
        #[arg(long)]
        out: PathBuf,
    },
    /// List stored templates
    List,
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path).with_context(|| format!("Failed to load configuration {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

fn load_engine(config: &Config, path: &Path) -> Result<Engine> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut engine = Engine::new(config);
    let report = import_snapshot(&mut engine, &text, ImportOptions::from_config(&config.io))
        .with_context(|| format!("Failed to import {}", path.display()))?;
    for item in &report.flagged {
        eprintln!("{}", item.to_details());
    }
    Ok(engine)
}

fn write_snapshot(engine: &Engine, path: &Path) -> Result<()> {
    let json = export_snapshot(engine)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

fn run(args: Args, config: Config) -> Result<ExitCode> {
    match args.command {
        Command::Report { snapshot, json } => {
            let mut engine = load_engine(&config, &snapshot)?;
            let result = engine.recompute().clone();
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", Renderer::new(&config.currency).report(engine.metadata(), &result));
            }
        }
        Command::Check { snapshot } => {
            let mut engine = load_engine(&config, &snapshot)?;
            let result = engine.recompute();
            println!("{}", Renderer::new(&config.currency).consistency_line(result));
            if !result.balanced {
                return Ok(ExitCode::from(2));
            }
        }
        Command::ImportCsv { csv, out, append } => {
            let mut engine = if append && out.exists() {
                load_engine(&config, &out)?
            } else {
                Engine::new(&config)
            };
            let mode = if append { ImportMode::Append } else { ImportMode::Replace };
            let file = fs::File::open(&csv).with_context(|| format!("Failed to open {}", csv.display()))?;
            let report = import_tabular(&mut engine, file, TabularOptions::from_config(&config.io).with_mode(mode))?;

            for issue in report.rejected.iter().chain(report.flagged.iter()) {
                eprintln!("{}", issue.to_details());
            }
            println!(
                "Imported {} rows ({} rejected, {} flagged)",
                report.imported,
                report.rejected.len(),
                report.flagged.len()
            );
            write_snapshot(&engine, &out)?;
        }
        Command::ExportCsv { snapshot, out } => {
            let engine = load_engine(&config, &snapshot)?;
            let delimiter = config.io.delimiter_byte();
            match out {
                Some(path) => {
                    let file = fs::File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
                    export_tabular(&engine, file, delimiter)?;
                }
                None => export_tabular(&engine, io::stdout().lock(), delimiter)?,
            }
        }
        Command::Template { action } => {
            let mut store = DirTemplateStore::new(&config.data.templates_dir);
            match action {
                TemplateAction::Save { name, snapshot } => {
                    let engine = load_engine(&config, &snapshot)?;
                    store.put(&name, &Snapshot::capture(&engine))?;
                    println!("Saved template {:?}", name);
                }
                TemplateAction::Load { name, out } => {
                    let Some(snapshot) = store.get(&name)? else {
                        bail!("No template named {:?} in {}", name, store.dir().display());
                    };
                    fs::write(&out, snapshot.to_json()?).with_context(|| format!("Failed to write {}", out.display()))?;
                    println!("Wrote template {:?} to {}", name, out.display());
                }
                TemplateAction::List => {
                    for info in store.list()? {
                        println!("{:<32} {}", info.name, info.updated.format("%Y-%m-%d %H:%M"));
                    }
                }
            }
        }
        Command::InitConfig => print!("{}", Config::generate_default()),
    }
    Ok(ExitCode::SUCCESS)
}

/// Render a failure for the terminal, with the error code and hints when
/// it came from configuration or serialization
fn error_report(e: &anyhow::Error) -> String {
    let (severity, details) = if let Some(err) = e.downcast_ref::<SerializationError>() {
        (err.severity(), err.to_details().to_string())
    } else if let Some(err) = e.downcast_ref::<ConfigError>() {
        (ErrorSeverity::Error, err.to_details().to_string())
    } else {
        return format!("{}: {:#}", ErrorSeverity::Error, e);
    };

    if e.chain().count() > 1 {
        format!("{}: {}\n{}", severity, e, details)
    } else {
        format!("{}: {}", severity, details)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", error_report(&e));
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();
    if !args.config.exists() {
        log::debug!("{} not found, using default configuration", args.config.display());
    }

    match run(args, config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", error_report(&e));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_report_shows_code_and_hint() {
        let err = Config::from_yaml("io:\n  csv_delimiter: \";;\"\n").unwrap_err();
        let e = anyhow::Error::new(err).context("Failed to load configuration statera.yaml");
        let text = error_report(&e);
        assert!(text.starts_with("error: Failed to load configuration statera.yaml\n"));
        assert!(text.contains("[INVALID_VALUE]"));
        assert!(text.contains("Setting: io.csv_delimiter"));

        let mut engine = Engine::default();
        let err = import_snapshot(&mut engine, "{}", ImportOptions::default()).unwrap_err();
        let text = error_report(&anyhow::Error::new(err));
        assert!(text.starts_with("error: [SNAPSHOT_SCHEMA_MISMATCH]"));
        assert!(text.contains("Suggestions:"));

        let text = error_report(&anyhow::anyhow!("plain failure"));
        assert_eq!(text, "error: plain failure");
    }
}
