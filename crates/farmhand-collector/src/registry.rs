use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Read access to the project's asset dependency graph.
///
/// Asset paths are package paths such as `/Game/Maps/Arena`.
pub trait AssetRegistry: Send + Sync {
    /// Direct dependencies of `asset_path`, in registry order.
    fn dependencies(&self, asset_path: &str) -> Vec<String>;

    /// Class name of the asset (`World` for levels), if the asset is known.
    fn asset_class(&self, asset_path: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Registry backed by a map, loadable from a YAML export of the project.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryAssetRegistry {
    #[serde(default)]
    assets: HashMap<String, AssetEntry>,
}

impl InMemoryAssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read asset registry: {:?}", path))?;
        let registry: InMemoryAssetRegistry = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse asset registry: {:?}", path))?;
        tracing::info!(assets = registry.assets.len(), "Loaded asset registry");
        Ok(registry)
    }

    pub fn insert(
        &mut self,
        asset_path: impl Into<String>,
        class: Option<&str>,
        dependencies: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.assets.insert(
            asset_path.into(),
            AssetEntry {
                class: class.map(str::to_string),
                dependencies: dependencies.into_iter().map(Into::into).collect(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetRegistry for InMemoryAssetRegistry {
    fn dependencies(&self, asset_path: &str) -> Vec<String> {
        self.assets
            .get(asset_path)
            .map(|entry| entry.dependencies.clone())
            .unwrap_or_default()
    }

    fn asset_class(&self, asset_path: &str) -> Option<String> {
        self.assets.get(asset_path).and_then(|entry| entry.class.clone())
    }
}
