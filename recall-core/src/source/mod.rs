use crate::{CoreError, ItemId, ItemStatistics};
use async_trait::async_trait;

pub mod memory;

/// Read-only access to per-item history.
#[async_trait]
pub trait StatisticsSource: Send + Sync {
    /// `Ok(None)` means the item has no history yet.
    async fn item_statistics(&self, id: ItemId) -> Result<Option<ItemStatistics>, CoreError>;
}
