//! Content-service port for item flavor and thematic bonus stats
//!
//! The generation pipeline works without the service: every call site keeps
//! its deterministic roll and only patches in richer content when a request
//! succeeds. Implementations live outside this crate.

use crate::item::Item;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Generated name and description for an item
#[derive(Debug, Clone)]
pub struct ItemFlavor {
    pub name: String,
    pub description: String,
}

/// Outbound port to the external content-generation service
#[async_trait]
pub trait ItemContentPort: Send + Sync {
    /// Generate a name and description for an item
    async fn generate_flavor(&self, item: &Item) -> Result<ItemFlavor>;

    /// Generate thematically-chosen bonus stats, keyed by snake_case stat
    /// name. Unknown keys and out-of-bound values are discarded by the
    /// caller, never trusted.
    async fn generate_bonus_stats(&self, item: &Item, count: u32) -> Result<HashMap<String, f64>>;
}

/// Port implementation for running without a content service.
///
/// Every request fails, which exercises the deterministic fallbacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineContent;

#[async_trait]
impl ItemContentPort for OfflineContent {
    async fn generate_flavor(&self, _item: &Item) -> Result<ItemFlavor> {
        anyhow::bail!("content service offline")
    }

    async fn generate_bonus_stats(
        &self,
        _item: &Item,
        _count: u32,
    ) -> Result<HashMap<String, f64>> {
        anyhow::bail!("content service offline")
    }
}
