//! File-backed service catalog.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use navdeck_core::{Catalog, CatalogSource, CoreError};

use crate::error::CliError;

/// `services.yaml` on disk, re-read on every load.
#[derive(Debug, Clone)]
pub struct ServicesFile {
    path: PathBuf,
}

impl ServicesFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the catalog, stamping it with the file's mtime.
    pub async fn read(&self) -> Result<Catalog, CoreError> {
        let source = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::Catalog {
                message: format!("{}: {e}", self.path.display()),
            })?;
        let catalog = Catalog::from_yaml(&source)?;

        let modified = tokio::fs::metadata(&self.path)
            .await
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);
        debug!(path = %self.path.display(), services = catalog.len(), "catalog loaded");

        Ok(match modified {
            Some(at) => catalog.with_updated_at(at),
            None => catalog,
        })
    }

    /// Like [`read`](Self::read), with the path attached to the error.
    pub async fn read_for_cli(&self) -> Result<Catalog, CliError> {
        self.read().await.map_err(|e| CliError::Catalog {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

impl CatalogSource for ServicesFile {
    async fn load(&self) -> Result<Catalog, CoreError> {
        self.read().await
    }
}
