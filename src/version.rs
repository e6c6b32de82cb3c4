//! Asset version fingerprint.
//!
//! The token is a BLAKE3 fold over every entry under the asset root, visited
//! in file-name order. Each step mixes the previous digest with the entry's
//! root-relative path, its kind and, for files, size, mtime and a bounded
//! prefix of the content. Nothing is cached: a redeploy is picked up on the
//! next request without restarting the process.
//!
//! Only the first `prefix_bytes` of a file are read. An edit past the prefix
//! that keeps size and mtime unchanged is not detected.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use blake3::Hasher;
use thiserror::Error;
use walkdir::WalkDir;

/// Default number of leading bytes hashed per file.
pub const DEFAULT_PREFIX_BYTES: usize = 4096;

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("asset root is empty; configure an assets path")]
    EmptyRoot,

    #[error("failed to walk asset directory '{root}': {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read asset '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Computes the version token for `asset_root` with the default prefix size.
pub fn fingerprint(asset_root: &Path) -> Result<String, FingerprintError> {
    Fingerprinter::new(asset_root).compute()
}

/// Fingerprint computation with a configurable content prefix.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    root: PathBuf,
    prefix_bytes: usize,
}

impl Fingerprinter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prefix_bytes: DEFAULT_PREFIX_BYTES,
        }
    }

    pub fn with_prefix_bytes(mut self, prefix_bytes: usize) -> Self {
        self.prefix_bytes = prefix_bytes;
        self
    }

    pub fn compute(&self) -> Result<String, FingerprintError> {
        if self.root.as_os_str().is_empty() {
            return Err(FingerprintError::EmptyRoot);
        }

        let mut running = *blake3::hash(b"inertia-assets").as_bytes();

        for entry in WalkDir::new(&self.root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| FingerprintError::Walk {
                root: self.root.clone(),
                source: e,
            })?;

            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            let relative = relative.to_string_lossy();
            let relative = relative.as_bytes();

            let mut hasher = Hasher::new();
            hasher.update(&running);
            hasher.update(&(relative.len() as u64).to_be_bytes());
            hasher.update(relative);

            let file_type = entry.file_type();
            if file_type.is_file() {
                hasher.update(b"file");
                self.fold_file(&mut hasher, entry.path())?;
            } else if file_type.is_dir() {
                hasher.update(b"dir");
            } else {
                hasher.update(b"link");
            }

            running = *hasher.finalize().as_bytes();
        }

        let token = blake3::hash(&running);
        let token = hex::encode(token.as_bytes());
        tracing::trace!(root = %self.root.display(), %token, "Computed asset fingerprint");
        Ok(token)
    }

    fn fold_file(&self, hasher: &mut Hasher, path: &Path) -> Result<(), FingerprintError> {
        let read_err = |source| FingerprintError::Read {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(read_err)?;
        let metadata = file.metadata().map_err(read_err)?;

        hasher.update(&metadata.len().to_be_bytes());

        // Some filesystems don't report mtime; size and content still count.
        let mtime = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        hasher.update(&mtime.to_be_bytes());

        let mut prefix = Vec::with_capacity(self.prefix_bytes.min(64 * 1024));
        file.take(self.prefix_bytes as u64)
            .read_to_end(&mut prefix)
            .map_err(read_err)?;
        hasher.update(blake3::hash(&prefix).as_bytes());

        Ok(())
    }
}
