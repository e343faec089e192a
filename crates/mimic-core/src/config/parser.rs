//! Fixture and options file parsing (YAML/JSON/JSONC).

use crate::config::error::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Config file type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFileType {
    Yaml,
    Json,
    Jsonc,
    Unknown,
}

/// Get config file type from path extension
pub fn get_file_type(path: &str) -> ConfigFileType {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "yaml" | "yml" => ConfigFileType::Yaml,
        "json" => ConfigFileType::Json,
        "jsonc" => ConfigFileType::Jsonc,
        _ => ConfigFileType::Unknown,
    }
}

/// Remove `//` and `/* */` comments outside of string literals.
///
/// Line comments keep their terminating newline so error positions stay
/// on the right line.
pub fn strip_json_comments(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        result.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' || skipped == '\r' {
                        result.push(skipped);
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = '\0';
                for skipped in chars.by_ref() {
                    if previous == '*' && skipped == '/' {
                        break;
                    }
                    previous = skipped;
                }
            }
            _ => result.push(c),
        }
    }

    result
}

/// Parse config content based on file type
pub fn parse_config<T: DeserializeOwned>(content: &str, path: &str) -> ConfigResult<T> {
    match get_file_type(path) {
        ConfigFileType::Yaml => Ok(serde_yaml::from_str(content)?),
        ConfigFileType::Json => Ok(serde_json::from_str(content)?),
        ConfigFileType::Jsonc => Ok(serde_json::from_str(&strip_json_comments(content))?),
        ConfigFileType::Unknown => Err(ConfigError::UnknownFileType(path.to_string())),
    }
}

/// Expand a path or glob pattern into a sorted list of files.
pub fn resolve_paths(pattern: &str) -> ConfigResult<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|e| ConfigError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(ConfigError::NoFiles(pattern.to_string()));
    }
    Ok(paths)
}

/// Read and parse one config file.
pub async fn load_file<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let display = path.to_string_lossy().into_owned();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
    parse_config(&content, &display)
}

/// Read and parse every file matching `pattern`, in path order.
pub async fn load_all<T: DeserializeOwned>(pattern: &str) -> ConfigResult<Vec<T>> {
    let mut documents = Vec::new();
    for path in resolve_paths(pattern)? {
        documents.push(load_file(&path).await?);
    }
    Ok(documents)
}
