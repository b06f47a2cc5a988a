//! Reading model definition files from disk.
//!
//! This is the only part of the crate that touches the filesystem. It turns
//! paths, directories and glob patterns into [`SourceDocument`]s for
//! [`parse`](crate::parse).

use crate::document::SourceDocument;
use crate::error::ConvertError;
use std::fs;
use std::path::{Path, PathBuf};

fn is_model_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

fn push_unique(files: &mut Vec<PathBuf>, path: PathBuf) {
    if !files.contains(&path) {
        files.push(path);
    }
}

/// Model files directly inside `dir`, sorted by name
fn list_directory(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let io_error = |source| ConvertError::Io {
        path: dir.display().to_string(),
        source,
    };

    let mut found = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let entry_path = entry.map_err(io_error)?.path();
        if entry_path.is_file() && is_model_file(&entry_path) {
            found.push(entry_path);
        }
    }
    found.sort();
    Ok(found)
}

/// Resolve command-line style arguments into files.
///
/// Each argument is a glob pattern (`models/**/en*.yaml`); a plain path is a
/// pattern matching itself. Matched directories contribute their model
/// files. Matches keep the order of the arguments, then the glob's
/// alphabetical order, and a file matched twice is listed once. Arguments
/// matching nothing contribute nothing, so the result may be empty.
pub fn collect_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>, ConvertError> {
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            for file in list_directory(path)? {
                push_unique(&mut files, file);
            }
            continue;
        }

        let Some(pattern) = path.to_str() else {
            push_unique(&mut files, path.to_path_buf());
            continue;
        };

        let entries = glob::glob(pattern).map_err(|source| ConvertError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;

        for entry in entries {
            let matched = entry.map_err(|e| {
                let path = e.path().display().to_string();
                ConvertError::Io {
                    path,
                    source: e.into_error(),
                }
            })?;

            if matched.is_dir() {
                for file in list_directory(&matched)? {
                    push_unique(&mut files, file);
                }
            } else {
                push_unique(&mut files, matched);
            }
        }
    }

    Ok(files)
}

/// Load one YAML or JSON file
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<SourceDocument, ConvertError> {
    let path = path.as_ref();
    let origin = path.display().to_string();

    let contents = fs::read_to_string(path).map_err(|source| ConvertError::Io {
        path: origin.clone(),
        source,
    })?;

    if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
        let json: serde_json::Value = serde_json::from_str(&contents).map_err(|source| ConvertError::Json {
            path: origin.clone(),
            source,
        })?;
        let content = serde_yaml::to_value(json).map_err(|source| ConvertError::Yaml {
            path: origin.clone(),
            source,
        })?;
        return Ok(SourceDocument::new(origin, content));
    }

    SourceDocument::from_yaml_str(origin, &contents)
}

/// Load every file named by `paths`, in order
///
/// # Example
///
/// ```ignore
/// use language_model_converter::loader::load_sources;
///
/// let sources = load_sources(&["models/en-basic.yaml", "models/shared", "models/**/en-*.yaml"])?;
/// ```
pub fn load_sources<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SourceDocument>, ConvertError> {
    let files = collect_files(paths)?;
    let mut sources = Vec::with_capacity(files.len());

    for file in &files {
        tracing::debug!(file = %file.display(), "loading model file");
        sources.push(load_source(file)?);
    }

    Ok(sources)
}
