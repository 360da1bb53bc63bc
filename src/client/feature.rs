//! Installable client features and the per-client registry that holds them.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::error::ClientError;
use super::HttpClient;

/// A feature that hooks into a client's send pipeline.
///
/// Installation has two steps: [`prepare`](Self::prepare) turns the
/// configuration into a feature instance, then [`install`](Self::install)
/// registers that instance's interceptors on the client.
#[async_trait]
pub trait HttpClientFeature: Sized + Send + Sync + 'static {
    /// Install-time configuration.
    type Config: Default + Send;

    /// Name used in logs and errors.
    const NAME: &'static str;

    /// Builds the feature from its configuration.
    async fn prepare(config: Self::Config) -> Result<Self, ClientError>;

    /// Registers the feature's interceptors on `client`.
    fn install(feature: Arc<Self>, client: &HttpClient) -> Result<(), ClientError>;
}

/// Installed features of one client, keyed by feature type.
#[derive(Default)]
pub struct FeatureRegistry {
    features: HashMap<TypeId, (&'static str, Arc<dyn Any + Send + Sync>)>,
}

impl FeatureRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a feature of type `F` is installed.
    pub fn contains<F: HttpClientFeature>(&self) -> bool {
        self.features.contains_key(&TypeId::of::<F>())
    }

    /// Stores `feature`, returning the previous instance of the same type.
    pub fn insert<F: HttpClientFeature>(&mut self, feature: Arc<F>) -> Option<Arc<F>> {
        let feature: Arc<dyn Any + Send + Sync> = feature;
        self.features
            .insert(TypeId::of::<F>(), (F::NAME, feature))
            .and_then(|(_, previous)| previous.downcast::<F>().ok())
    }

    /// Returns the installed feature of type `F`.
    pub fn get<F: HttpClientFeature>(&self) -> Option<Arc<F>> {
        self.features
            .get(&TypeId::of::<F>())
            .and_then(|(_, feature)| Arc::clone(feature).downcast::<F>().ok())
    }

    /// Returns the names of installed features, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.features.values().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of installed features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if no feature is installed.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl std::fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
