mod reader;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use prisma_mock_core::{parse_schema, render_catalog, Catalog};
use reader::{read_schema_files, SchemaFile};

#[derive(Parser)]
#[command(
    name = "prisma-mock",
    version,
    about = "Prisma schema parser: read .prisma files into a model catalog"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse schema files and print the model catalog
    Parse {
        /// Input path (file or directory, defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Write output to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: json (default) or yaml
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Check schema files and report models or the first error
    Check {
        /// Input path (file or directory, defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format: human (default) or json
        #[arg(long, default_value = "human")]
        format: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            path,
            output,
            format,
        } => match run_parse(&path, output.as_deref(), &format) {
            Ok(text) => {
                println!("{text}");
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
        Commands::Check { path, format } => match run_check(&path, &format) {
            Ok((output, error_count)) => {
                println!("{output}");
                if error_count > 0 {
                    process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        },
    }
}

fn read_inputs(input_path: &Path) -> Result<Vec<SchemaFile>, String> {
    let files = read_schema_files(input_path)?;
    if files.is_empty() {
        return Err(format!(
            "No schema files (.prisma) found at: {}",
            input_path.display()
        ));
    }
    Ok(files)
}

/// Parse every file and merge the results into one catalog.
pub fn build_catalog(input_path: &Path) -> Result<Catalog, String> {
    let mut catalog = Catalog::default();
    for file in read_inputs(input_path)? {
        let parsed = parse_schema(&file.content).map_err(|e| format!("{}: {e}", file.path))?;
        catalog
            .merge(parsed)
            .map_err(|e| format!("{}: {e}", file.path))?;
    }
    Ok(catalog)
}

fn run_parse(input_path: &Path, output_file: Option<&Path>, format: &str) -> Result<String, String> {
    let catalog = build_catalog(input_path)?;
    let document = render_catalog(&catalog);

    let text = match format {
        "json" => serde_json::to_string_pretty(&document)
            .map_err(|e| format!("JSON serialization error: {e}"))?,
        "yaml" => serde_yaml::to_string(&document)
            .map_err(|e| format!("YAML serialization error: {e}"))?,
        other => return Err(format!("Unknown format: {other} (expected json or yaml)")),
    };

    if let Some(out_path) = output_file {
        std::fs::write(out_path, &text)
            .map_err(|e| format!("Failed to write {}: {e}", out_path.display()))?;
        return Ok(format!("Written to {}", out_path.display()));
    }

    Ok(text)
}

struct FileReport {
    path: String,
    outcome: Result<Catalog, String>,
}

fn run_check(input_path: &Path, format: &str) -> Result<(String, usize), String> {
    if format != "human" && format != "json" {
        return Err(format!("Unknown format: {format} (expected human or json)"));
    }

    let files = read_inputs(input_path)?;
    let file_count = files.len();

    // Every file is checked on its own, then merged to catch cross-file duplicates.
    let mut merged = Catalog::default();
    let mut reports = Vec::with_capacity(file_count);
    for file in files {
        let outcome = parse_schema(&file.content)
            .and_then(|catalog| {
                merged.merge(catalog.clone())?;
                Ok(catalog)
            })
            .map_err(|e| e.to_string());
        reports.push(FileReport {
            path: file.path,
            outcome,
        });
    }

    let error_count = reports.iter().filter(|r| r.outcome.is_err()).count();
    let model_count = merged.len();
    let field_count: usize = merged.iter().map(|(_, fields)| fields.len()).sum();

    if format == "json" {
        let files: Vec<serde_json::Value> = reports
            .iter()
            .map(|r| match &r.outcome {
                Ok(catalog) => serde_json::json!({
                    "path": r.path,
                    "models": catalog
                        .iter()
                        .map(|(name, fields)| (name.to_string(), serde_json::Value::from(fields.len())))
                        .collect::<serde_json::Map<String, serde_json::Value>>(),
                }),
                Err(message) => serde_json::json!({
                    "path": r.path,
                    "error": message,
                }),
            })
            .collect();
        let output = serde_json::json!({
            "files": files,
            "summary": {
                "errors": error_count,
                "models": model_count,
                "fields": field_count,
                "files": file_count,
            }
        });
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        return Ok((json, error_count));
    }

    let mut lines: Vec<String> = Vec::new();
    for r in &reports {
        match &r.outcome {
            Ok(catalog) => {
                for (name, fields) in catalog.iter() {
                    let field_word = if fields.len() == 1 { "field" } else { "fields" };
                    lines.push(format!("{}: model {name} ({} {field_word})", r.path, fields.len()));
                }
            }
            Err(message) => lines.push(format!("{}: error: {message}", r.path)),
        }
    }

    let error_word = if error_count == 1 { "error" } else { "errors" };
    let model_word = if model_count == 1 { "model" } else { "models" };
    let file_word = if file_count == 1 { "file" } else { "files" };
    lines.push(format!(
        "{error_count} {error_word}, {model_count} {model_word} in {file_count} {file_word}."
    ));

    Ok((lines.join("\n"), error_count))
}
