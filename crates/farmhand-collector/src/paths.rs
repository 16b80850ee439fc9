use std::ffi::OsString;
use std::path::{Path, PathBuf};

const GAME_ROOT: &str = "/Game/";

/// Maps asset package paths onto files in the project's content directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentPaths {
    content_dir: PathBuf,
}

impl ContentPaths {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// File backing `asset_path`: `.umap` for `World` assets, `.uasset` for
    /// everything else, including assets of unknown class.
    pub fn os_path(&self, asset_path: &str, asset_class: Option<&str>) -> PathBuf {
        let base = match asset_path.find(GAME_ROOT) {
            Some(index) => self.content_dir.join(&asset_path[index + GAME_ROOT.len()..]),
            None => PathBuf::from(asset_path),
        };
        let extension = match asset_class {
            Some("World") => ".umap",
            _ => ".uasset",
        };

        let mut file: OsString = base.into_os_string();
        file.push(extension);
        PathBuf::from(file)
    }
}

/// Package part of an object path: `/Game/Maps/Arena.Arena` → `/Game/Maps/Arena`.
pub fn package_path(object_path: &str) -> &str {
    let name_start = object_path.rfind('/').map_or(0, |slash| slash + 1);
    match object_path[name_start..].find('.') {
        Some(dot) => &object_path[..name_start + dot],
        None => object_path,
    }
}
