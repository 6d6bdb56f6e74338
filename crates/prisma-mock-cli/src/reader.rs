use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

pub const CONFIG_FILE: &str = "prisma-mock.config.yaml";

/// A schema file with its path and content.
pub struct SchemaFile {
    pub path: String,
    pub content: String,
}

/// Project configuration from prisma-mock.config.yaml.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    pub sources: Option<Vec<String>>,
}

/// Read schema files from a path (file or directory).
pub fn read_schema_files(input_path: &Path) -> Result<Vec<SchemaFile>, String> {
    if !input_path.exists() {
        return Err(format!("Path does not exist: {}", input_path.display()));
    }

    if input_path.is_file() {
        return Ok(vec![read_file(input_path)?]);
    }

    if input_path.is_dir() {
        let config_path = input_path.join(CONFIG_FILE);
        if config_path.exists() {
            return read_from_config(&config_path, input_path);
        }
        return scan_directory(input_path);
    }

    Err(format!(
        "Path is neither a file nor a directory: {}",
        input_path.display()
    ))
}

fn read_file(path: &Path) -> Result<SchemaFile, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    Ok(SchemaFile {
        path: path.to_string_lossy().to_string(),
        content,
    })
}

fn glob_paths(pattern: &Path) -> Result<Vec<PathBuf>, String> {
    let pattern_str = pattern.to_string_lossy().replace('\\', "/");
    let entries = glob::glob(&pattern_str)
        .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern_str, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => return Err(format!("Glob error: {}", e)),
        }
    }
    paths.sort();
    Ok(paths)
}

fn scan_directory(dir_path: &Path) -> Result<Vec<SchemaFile>, String> {
    glob_paths(&dir_path.join("**/*.prisma"))?
        .iter()
        .map(|path| read_file(path))
        .collect()
}

fn read_from_config(config_path: &Path, base_dir: &Path) -> Result<Vec<SchemaFile>, String> {
    let yaml_content =
        fs::read_to_string(config_path).map_err(|e| format!("Failed to read config: {}", e))?;

    let config: ProjectConfig =
        serde_yaml::from_str(&yaml_content).map_err(|e| format!("Invalid YAML config: {}", e))?;

    let source_patterns = match config.sources {
        Some(s) if !s.is_empty() => s,
        _ => return scan_directory(base_dir),
    };
    debug!(config = %config_path.display(), patterns = ?source_patterns, "reading sources");

    let mut files = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for pattern in &source_patterns {
        for path in glob_paths(&base_dir.join(pattern))? {
            if seen.insert(path.clone()) {
                files.push(read_file(&path)?);
            }
        }
    }

    Ok(files)
}
