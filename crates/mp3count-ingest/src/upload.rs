use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::policy::{check_content_type, check_size};

/// An accepted input, ready to be scanned.
///
/// Either an existing file, or bytes spooled from a reader into a temporary
/// file. A spooled file is removed exactly once: by [`Upload::release`], or
/// on drop if it was never released.
#[derive(Debug)]
pub struct Upload {
    path: PathBuf,
    spool: Option<NamedTempFile>,
    size: u64,
    content_type: String,
}

impl Upload {
    /// Accept an existing file after checking its type and size.
    pub fn from_path(
        path: impl AsRef<Path>,
        declared_type: Option<&str>,
        config: &IngestConfig,
    ) -> Result<Self> {
        let path = path.as_ref();
        let content_type = check_content_type(declared_type, Some(path), config)?;
        let size = fs::metadata(path)
            .map_err(|err| IngestError::io(path, err))?
            .len();
        check_size(size, config)?;

        Ok(Self {
            path: path.to_path_buf(),
            spool: None,
            size,
            content_type,
        })
    }

    /// Copy a reader into a temporary file, enforcing the size limit as the
    /// bytes arrive.
    pub fn spool<R: Read>(
        reader: R,
        declared_type: Option<&str>,
        config: &IngestConfig,
    ) -> Result<Self> {
        let content_type = check_content_type(declared_type, None, config)?;

        let builder = {
            let mut builder = tempfile::Builder::new();
            builder.prefix("mp3count-").suffix(".upload");
            builder
        };
        let mut file = match &config.spool_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|err| {
            IngestError::io(config.spool_dir.clone().unwrap_or_else(std::env::temp_dir), err)
        })?;
        let path = file.path().to_path_buf();

        // One byte past the limit is enough to know it was exceeded.
        let mut limited = reader.take(config.max_upload_size.saturating_add(1));
        let size = io::copy(&mut limited, &mut file).map_err(|err| IngestError::io(&path, err))?;
        file.flush().map_err(|err| IngestError::io(&path, err))?;
        if size > config.max_upload_size {
            return Err(IngestError::LimitExceeded {
                max: config.max_upload_size,
            });
        }

        debug!(path = ?path, size, "spooled upload");
        Ok(Self {
            path,
            spool: Some(file),
            size,
            content_type,
        })
    }

    /// Location of the bytes on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Normalized content type the upload was accepted under.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// True if the bytes live in a temporary file owned by this upload.
    pub fn is_spooled(&self) -> bool {
        self.spool.is_some()
    }

    /// Remove the spooled file, if any. Existing files are left alone.
    pub fn release(mut self) -> Result<()> {
        if let Some(file) = self.spool.take() {
            file.close()
                .map_err(|err| IngestError::io(&self.path, err))?;
            debug!(path = ?self.path, "released spooled upload");
        }
        Ok(())
    }
}

impl Drop for Upload {
    fn drop(&mut self) {
        if let Some(file) = self.spool.take() {
            match file.close() {
                Ok(()) => debug!(path = ?self.path, "removed unreleased spooled upload"),
                Err(err) => warn!(path = ?self.path, error = %err, "failed removing spooled upload"),
            }
        }
    }
}
