use std::sync::Arc;

use crate::services::{metadata::ProviderLimits, MetadataProvider, ServiceContext};

/// Shared application state
///
/// Everything here is read-only after startup, so cloning per request only
/// bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<ServiceContext>,
    /// `None` when no TMDB API key is configured
    pub metadata: Option<Arc<dyn MetadataProvider>>,
    pub provider_limits: ProviderLimits,
}

impl AppState {
    pub fn new(
        context: ServiceContext,
        metadata: Option<Arc<dyn MetadataProvider>>,
        provider_limits: ProviderLimits,
    ) -> Self {
        Self {
            context: Arc::new(context),
            metadata,
            provider_limits,
        }
    }
}
