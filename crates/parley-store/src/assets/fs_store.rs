//! `FsAssetStore`: disks mapped to directories under one root
//!
//! Asset `messenger:threads/t-1/avatar/img_x.png` lives at
//! `{root}/messenger/threads/t-1/avatar/img_x.png`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use parley_core::model::{AssetDirectory, AssetPath, AvatarUpload};
use parley_core::ports::AssetStore;
use uuid::Uuid;

use crate::assets::atomic::atomic_write;
use crate::errors::{invalid_asset_path, io_error, Result};

#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a disk and relative path onto the filesystem.
    ///
    /// Only plain path segments are accepted.
    fn resolve(&self, disk: &str, relative: &str) -> Result<PathBuf> {
        let mut resolved = self.root.clone();
        for part in [disk, relative] {
            for component in Path::new(part).components() {
                match component {
                    Component::Normal(segment) => resolved.push(segment),
                    _ => return Err(invalid_asset_path(&format!("{}:{}", disk, relative))),
                }
            }
        }
        Ok(resolved)
    }

    pub fn read(&self, path: &AssetPath) -> Result<Vec<u8>> {
        let file = self.resolve(&path.disk, &path.path)?;
        fs::read(file).map_err(|e| io_error("read_asset", e))
    }

    pub fn exists(&self, path: &AssetPath) -> bool {
        self.resolve(&path.disk, &path.path)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }
}

/// `img_{uuid v7}.{ext}`; time-ordered so newer uploads sort last
fn generated_file_name(upload: &AvatarUpload) -> String {
    let extension = upload.extension().unwrap_or_else(|| "bin".to_string());
    format!("img_{}.{}", Uuid::now_v7(), extension)
}

impl AssetStore for FsAssetStore {
    fn upload(&self, upload: &AvatarUpload, directory: &AssetDirectory) -> Result<String> {
        let file_name = generated_file_name(upload);
        let target = self.resolve(&directory.disk, &directory.file(&file_name).path)?;

        atomic_write(&target, &upload.bytes)?;

        tracing::debug!(
            disk = %directory.disk,
            path = %target.display(),
            bytes = upload.bytes.len(),
            "asset stored"
        );
        Ok(file_name)
    }

    fn delete(&self, path: &AssetPath) -> Result<()> {
        let file = self.resolve(&path.disk, &path.path)?;
        match fs::remove_file(&file) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("delete_asset", e)),
        }
    }
}
