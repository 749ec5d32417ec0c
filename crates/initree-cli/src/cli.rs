//! initree CLI - Command-line interface for inspecting INI configuration files
//!
//! Usage:
//!   initree get run.ini solver.type
//!   initree dump base.ini local.ini --sources
//!   initree check run.ini

use clap::{Parser, Subcommand};
use colored::Colorize;
use initree_core::{reader, Options};
use std::path::PathBuf;
use std::process::ExitCode;

/// initree - section-based INI configuration with source tracking
#[derive(Parser)]
#[command(name = "initree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a specific value from the configuration
    Get {
        /// Configuration file(s), read in order (last write wins)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Path to the value (e.g., solver.type)
        path: String,

        /// Default value if the path is not set
        #[arg(short, long)]
        default: Option<String>,

        /// Print the source file the value came from instead of the value
        #[arg(long)]
        origin: bool,
    },

    /// List all values in the configuration
    Dump {
        /// Configuration file(s), read in order (last write wins)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Show source files instead of values
        #[arg(long)]
        sources: bool,

        /// Write to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Quick syntax check of configuration files
    Check {
        /// Configuration file(s) to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Run the CLI with the given arguments
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            files,
            path,
            default,
            origin,
        } => cmd_get(files, &path, default, origin),

        Commands::Dump {
            files,
            format,
            sources,
            output,
        } => cmd_dump(files, &format, sources, output),

        Commands::Check { files } => cmd_check(files),
    }
}

fn load_options(files: &[PathBuf]) -> Result<Options, String> {
    if files.is_empty() {
        return Err("No configuration files specified".to_string());
    }

    // Read all files into one store; later files overwrite earlier ones
    let mut options = Options::new();
    for file in files {
        reader::read_file(&mut options, file).map_err(|e| e.to_string())?;
    }

    Ok(options)
}

fn cmd_get(files: Vec<PathBuf>, path: &str, default: Option<String>, origin: bool) -> ExitCode {
    let options = match load_options(&files) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    // The grammar lowercases keys and section names outside quotes, so the
    // query is folded the same way.
    match options.lookup(&path.to_lowercase()) {
        Some(entry) => {
            if origin {
                println!("{}", entry.origin());
            } else {
                println!("{}", entry.value());
            }
            ExitCode::SUCCESS
        }
        None => {
            if let Some(default_val) = default {
                println!("{}", default_val);
                ExitCode::SUCCESS
            } else {
                eprintln!("{}: Option '{}' not found", "Error".red(), path);
                ExitCode::from(1)
            }
        }
    }
}

fn cmd_dump(files: Vec<PathBuf>, format: &str, sources: bool, output: Option<PathBuf>) -> ExitCode {
    let options = match load_options(&files) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let content = if sources {
        // Output which file each value came from
        let mut leaves = options.leaf_paths();
        leaves.sort_by(|(a, _), (b, _)| a.cmp(b));

        if format == "json" {
            let map: serde_json::Map<String, serde_json::Value> = leaves
                .into_iter()
                .map(|(path, entry)| (path, entry.origin().into()))
                .collect();
            serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
        } else {
            leaves
                .iter()
                .map(|(path, entry)| format!("{}: {}", path, entry.origin()))
                .collect::<Vec<_>>()
                .join("\n")
        }
    } else if format == "json" {
        // Full tree, entries with values and origins
        serde_json::to_string_pretty(&options).unwrap_or_else(|_| "{}".to_string())
    } else {
        // Text output in file order
        options
            .leaf_paths()
            .iter()
            .map(|(path, entry)| format!("{} = {}", path, entry.value()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    if let Some(output_path) = output {
        if let Err(e) = std::fs::write(&output_path, &content) {
            eprintln!("{}: {}", "Error writing file".red(), e);
            return ExitCode::from(2);
        }
        eprintln!("{} Wrote to {}", "✓".green(), output_path.display());
    } else {
        println!("{}", content);
    }
    ExitCode::SUCCESS
}

fn cmd_check(files: Vec<PathBuf>) -> ExitCode {
    let mut all_valid = true;

    for file in files {
        match Options::from_file(&file) {
            Ok(_) => {
                println!("{} {}: valid", "✓".green(), file.display());
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                all_valid = false;
            }
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
