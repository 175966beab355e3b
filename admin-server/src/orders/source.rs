//! Order source abstraction
//!
//! The hosted backend owns order storage. Reports only need two things from
//! it: a consistent snapshot of every candidate order, and a signal that the
//! order set may have changed.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use shared::models::Order;
use tokio::sync::broadcast;

use crate::utils::AppResult;

/// Kind of change reported by the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Inserted,
    Updated,
    Deleted,
    Reloaded,
}

/// "The order set changed" notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderChange {
    /// Revision of the order set after the change
    pub revision: u64,
    pub kind: ChangeKind,
    /// Affected order, if the change concerns a single one
    pub order_id: Option<String>,
}

/// Immutable view of the order set at one revision
#[derive(Debug, Clone)]
pub struct OrderSnapshot {
    pub revision: u64,
    pub orders: Arc<[Order]>,
}

impl OrderSnapshot {
    pub fn empty() -> Self {
        Self {
            revision: 0,
            orders: Arc::from(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Supplier of order snapshots and change notifications
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Fetch the full candidate set
    async fn fetch_orders(&self) -> AppResult<OrderSnapshot>;

    /// Revision of the order set as of now, without fetching it
    fn current_revision(&self) -> u64;

    /// Subscribe to change notifications
    fn subscribe(&self) -> broadcast::Receiver<OrderChange>;
}
