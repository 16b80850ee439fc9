use crate::paths::{ContentPaths, package_path};
use crate::registry::AssetRegistry;
use crate::walker::{DependencyCollector, DependencyFilter};
use anyhow::Result;
use async_trait::async_trait;
use farmhand_core::SceneReference;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

/// Computes the files a job's scene needs on the render node.
#[async_trait]
pub trait DependencySource: Send + Sync {
    async fn job_dependencies(&self, scene: &SceneReference) -> Result<Vec<PathBuf>>;
}

/// Dependency source reading the project's asset registry.
pub struct RegistryDependencySource<R: AssetRegistry> {
    registry: Arc<R>,
    paths: ContentPaths,
    filter: DependencyFilter,
}

impl<R: AssetRegistry> RegistryDependencySource<R> {
    pub fn new(registry: Arc<R>, paths: ContentPaths) -> Self {
        Self {
            registry,
            paths,
            filter: DependencyFilter::InGameFolder,
        }
    }

    pub fn with_filter(mut self, filter: DependencyFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Asset paths for `scene`: dependencies of the sequence, then of the map,
    /// then the two assets themselves, each listed once.
    pub fn scene_assets(&self, scene: &SceneReference) -> Vec<String> {
        let roots: Vec<&str> = [scene.sequence.as_deref(), scene.map.as_deref()]
            .into_iter()
            .flatten()
            .map(package_path)
            .collect();

        let collector = DependencyCollector::new(self.registry.as_ref());
        let mut seen = HashSet::new();
        roots
            .iter()
            .flat_map(|root| collector.collect(root, self.filter))
            .chain(roots.iter().map(|root| root.to_string()))
            .filter(|asset| seen.insert(asset.clone()))
            .collect()
    }
}

#[async_trait]
impl<R: AssetRegistry + 'static> DependencySource for RegistryDependencySource<R> {
    #[tracing::instrument(skip(self), fields(map = ?scene.map, sequence = ?scene.sequence))]
    async fn job_dependencies(&self, scene: &SceneReference) -> Result<Vec<PathBuf>> {
        let files: Vec<PathBuf> = self
            .scene_assets(scene)
            .iter()
            .map(|asset| {
                let class = self.registry.asset_class(asset);
                self.paths.os_path(asset, class.as_deref())
            })
            .collect();
        tracing::info!(count = files.len(), "Resolved job dependencies");
        Ok(files)
    }
}
