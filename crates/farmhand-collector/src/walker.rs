use crate::registry::AssetRegistry;
use std::collections::HashSet;

/// Decides which dependencies are followed and reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DependencyFilter {
    #[default]
    All,
    /// Only assets in the project's `/Game/` folder.
    InGameFolder,
}

impl DependencyFilter {
    pub fn accepts(&self, asset_path: &str) -> bool {
        match self {
            DependencyFilter::All => true,
            DependencyFilter::InGameFolder => asset_path.contains("/Game/"),
        }
    }
}

/// Walks the asset registry to collect every transitive dependency of an asset.
pub struct DependencyCollector<'r, R: AssetRegistry + ?Sized> {
    registry: &'r R,
}

impl<'r, R: AssetRegistry + ?Sized> DependencyCollector<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Self { registry }
    }

    /// Transitive dependencies of `asset_path` in discovery order: all direct
    /// dependencies of an asset come before those found through them.
    ///
    /// Rejected dependencies are neither reported nor followed. The asset
    /// itself is not part of the result.
    pub fn collect(&self, asset_path: &str, filter: DependencyFilter) -> Vec<String> {
        let mut collected = Vec::new();
        let mut seen = HashSet::from([asset_path.to_string()]);
        // Assets whose dependencies are still to be listed, next on top.
        let mut stack = vec![asset_path.to_string()];

        while let Some(current) = stack.pop() {
            let found: Vec<String> = self
                .registry
                .dependencies(&current)
                .into_iter()
                .filter(|dependency| filter.accepts(dependency) && seen.insert(dependency.clone()))
                .collect();

            collected.extend(found.iter().cloned());
            stack.extend(found.into_iter().rev());
        }

        tracing::debug!(asset = asset_path, found = collected.len(), "Collected dependencies");
        collected
    }
}
