//! Source definition discovery.
//!
//! Every `*.toml` file below the definitions directory is one retailer.
//! Subdirectories only group files (`retailers/`, `aggregators/`) and carry
//! no meaning of their own.

use crate::{
    definition::SourceDefinition,
    error::{Result, SourceError},
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Name of the bundled definitions directory at the workspace root.
pub const DEFAULT_DIR_NAME: &str = "source-definitions";

/// Reads source definitions from a directory tree.
pub struct SourceLoader {
    definitions_dir: PathBuf,
}

impl SourceLoader {
    /// Use `definitions_dir`, which must already exist.
    ///
    /// # Errors
    /// [`SourceError::DirectoryNotFound`] when it is not a directory.
    pub fn new(definitions_dir: impl Into<PathBuf>) -> Result<Self> {
        let definitions_dir = definitions_dir.into();

        if !definitions_dir.is_dir() {
            return Err(SourceError::DirectoryNotFound {
                path: definitions_dir.display().to_string(),
            });
        }

        Ok(Self { definitions_dir })
    }

    /// Use the bundled `source-definitions/` directory.
    ///
    /// The first ancestor of the current directory that holds one wins.
    ///
    /// # Errors
    /// Fails when no ancestor has the directory.
    pub fn with_default_dir() -> Result<Self> {
        let cwd = std::env::current_dir()?;

        let found = cwd
            .ancestors()
            .map(|dir| dir.join(DEFAULT_DIR_NAME))
            .find(|candidate| candidate.is_dir());

        Self::new(found.unwrap_or_else(|| cwd.join(DEFAULT_DIR_NAME)))
    }

    /// Directory this loader reads from.
    #[must_use]
    pub fn definitions_dir(&self) -> &Path {
        &self.definitions_dir
    }

    /// Parse and validate every definition file, in path order.
    ///
    /// A broken file is skipped with a warning so one bad retailer does not
    /// take the others down.
    ///
    /// # Errors
    /// Only when the directory tree itself cannot be read.
    pub fn load_all(&self) -> Result<Vec<SourceDefinition>> {
        let files = definition_files(&self.definitions_dir)?;

        let definitions: Vec<SourceDefinition> = files
            .iter()
            .filter_map(|path| match read_definition(path) {
                Ok(definition) => Some(definition),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping source definition");
                    None
                }
            })
            .collect();

        info!(
            files = files.len(),
            loaded = definitions.len(),
            dir = %self.definitions_dir.display(),
            "loaded source definitions"
        );

        Ok(definitions)
    }
}

/// All `*.toml` files under `root`, sorted.
fn definition_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut pending = vec![root.to_path_buf()];
    let mut files = Vec::new();

    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "toml") {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn read_definition(path: &Path) -> Result<SourceDefinition> {
    let contents = std::fs::read_to_string(path).map_err(|e| SourceError::LoadError {
        path: path.display().to_string(),
        source: Box::new(e),
    })?;

    let definition: SourceDefinition =
        toml::from_str(&contents).map_err(|e| SourceError::ParseError {
            path: path.display().to_string(),
            source: e,
        })?;

    definition.validate()?;
    Ok(definition)
}
