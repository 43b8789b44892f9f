//! Planet image association.
//!
//! Uploaded images live in a single directory, one file per planet, named
//! `planet_<id>.<ext>`. The store writes uploads atomically, keeps at most one
//! current file per planet and mirrors the stored path into the catalog.
//!
//! # Example
//!
//! ```no_run
//! use planetarium::{Catalog, ImageStore};
//!
//! let catalog = Catalog::embedded()?;
//! let store = ImageStore::open("static/uploads", "uploads")?;
//!
//! let stored = store.record_upload(&catalog, 3, "earth.png", "png", b"...")?;
//! assert_eq!(store.image_url(3), Some(stored.relative_path));
//! # Ok::<(), planetarium::Error>(())
//! ```

mod extension;
mod filename;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::model::PlanetId;

pub use extension::ImageExtension;
pub use filename::{sanitize_file_name, split_extension};

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredImage {
    /// Planet the image belongs to.
    pub planet_id: PlanetId,
    /// Extension the image was stored under.
    pub extension: ImageExtension,
    /// Path relative to the public root, as recorded on the planet.
    pub relative_path: String,
    /// Location of the file on disk.
    pub path: PathBuf,
    /// Sanitized name of the file as uploaded.
    pub original_name: String,
    /// Size of the stored file.
    pub size_bytes: u64,
    /// BLAKE3 hash of the stored bytes.
    pub checksum: String,
    /// When the upload was recorded.
    pub uploaded_at: DateTime<Utc>,
}

/// Durable storage for planet images.
#[derive(Debug)]
pub struct ImageStore {
    /// Directory holding the image files.
    root: PathBuf,
    /// Prefix of relative paths, without surrounding slashes.
    public_prefix: String,
    /// One lock per planet id, held for the whole upload sequence.
    locks: Mutex<HashMap<PlanetId, Arc<Mutex<()>>>>,
}

impl ImageStore {
    /// Open the store, creating the upload directory if it does not exist.
    ///
    /// Opening the same directory repeatedly is harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl AsRef<Path>, public_prefix: &str) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        std::fs::create_dir_all(&root).map_err(|source| Error::DirectoryCreate {
            path: root.clone(),
            source,
        })?;

        debug!("Image store opened at {}", root.display());
        Ok(Self {
            root,
            public_prefix: public_prefix.trim_matches('/').to_string(),
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Get the upload directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage file name for a planet image.
    #[must_use]
    pub fn file_name(planet_id: PlanetId, extension: ImageExtension) -> String {
        format!("planet_{planet_id}.{extension}")
    }

    /// Relative path handed out for a stored file name.
    #[must_use]
    pub fn relative_path(&self, file_name: &str) -> String {
        if self.public_prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{file_name}", self.public_prefix)
        }
    }

    /// Store an uploaded image for a planet and record it on the catalog.
    ///
    /// The extension is checked before anything else, then the planet must
    /// exist. The bytes go to a temporary file that is renamed into place, so
    /// readers never see a partial image. Files for the same planet under other
    /// extensions are removed. Concurrent uploads for the same planet run one
    /// after the other; the last one wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExtension`] for extensions outside the
    /// allow-list, [`Error::NotFound`] for unknown planets and an I/O error if
    /// the file cannot be written or moved into place. On error nothing is
    /// left behind and the catalog is unchanged.
    pub fn record_upload(
        &self,
        catalog: &Catalog,
        planet_id: PlanetId,
        source_file_name: &str,
        extension: &str,
        bytes: &[u8],
    ) -> Result<StoredImage> {
        let extension: ImageExtension = extension.parse()?;
        if !catalog.contains_planet(planet_id) {
            return Err(Error::planet_not_found(planet_id));
        }

        let lock = self.planet_lock(planet_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let file_name = Self::file_name(planet_id, extension);
        let path = self.root.join(&file_name);
        let tmp_path = self.root.join(format!(".{file_name}.tmp"));

        if let Err(err) =
            std::fs::write(&tmp_path, bytes).and_then(|()| std::fs::rename(&tmp_path, &path))
        {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(err.into());
        }

        // The new file is live from here on; the catalog must follow it.
        let relative_path = self.relative_path(&file_name);
        catalog.set_planet_image(planet_id, Some(relative_path.clone()));

        self.remove_other_extensions(planet_id, extension);

        let stored = StoredImage {
            planet_id,
            extension,
            relative_path,
            path,
            original_name: sanitize_file_name(source_file_name),
            size_bytes: bytes.len() as u64,
            checksum: blake3::hash(bytes).to_hex().to_string(),
            uploaded_at: Utc::now(),
        };

        info!(
            planet_id,
            file = %stored.relative_path,
            original = %stored.original_name,
            size = stored.size_bytes,
            "Stored planet image"
        );
        Ok(stored)
    }

    /// Relative path of the stored image for a planet, if one exists on disk.
    #[must_use]
    pub fn image_url(&self, planet_id: PlanetId) -> Option<String> {
        self.stored_extension(planet_id)
            .map(|ext| self.relative_path(&Self::file_name(planet_id, ext)))
    }

    /// Extension of the stored image for a planet, if one exists on disk.
    #[must_use]
    pub fn stored_extension(&self, planet_id: PlanetId) -> Option<ImageExtension> {
        ImageExtension::ALL
            .into_iter()
            .find(|&ext| self.root.join(Self::file_name(planet_id, ext)).is_file())
    }

    /// Re-associate images already on disk with their planets.
    ///
    /// Returns the number of planets that received an image.
    pub fn restore(&self, catalog: &Catalog) -> usize {
        let mut restored = 0;
        for planet_id in catalog.planet_ids() {
            if let Some(url) = self.image_url(planet_id) {
                debug!(planet_id, file = %url, "Restored planet image");
                catalog.set_planet_image(planet_id, Some(url));
                restored += 1;
            }
        }
        if restored > 0 {
            info!("Restored {} planet images from {}", restored, self.root.display());
        }
        restored
    }

    /// Remove files for the planet under any other extension.
    ///
    /// Failures are logged and skipped: the new image is already in place.
    fn remove_other_extensions(&self, planet_id: PlanetId, keep: ImageExtension) {
        for ext in ImageExtension::ALL.into_iter().filter(|&ext| ext != keep) {
            let stale = self.root.join(Self::file_name(planet_id, ext));
            match std::fs::remove_file(&stale) {
                Ok(()) => debug!("Removed superseded image {}", stale.display()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => warn!("Failed to remove superseded image {}: {}", stale.display(), err),
            }
        }
    }

    fn planet_lock(&self, planet_id: PlanetId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(planet_id).or_default())
    }
}
