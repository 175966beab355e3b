//! In-process order source
//!
//! Holds the order set as a copy-on-write `Arc<[Order]>`: readers clone the
//! `Arc` and keep a snapshot that later writes never touch. Every write bumps
//! the revision and broadcasts an [`OrderChange`].

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use shared::models::{Order, OrderRow};
use tokio::sync::broadcast;

use super::normalize::normalize_order;
use super::source::{ChangeKind, OrderChange, OrderSnapshot, OrderSource};
use crate::utils::{AppError, AppResult};

/// Default capacity of the change channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug)]
pub struct MemoryOrderSource {
    state: RwLock<OrderSnapshot>,
    change_tx: broadcast::Sender<OrderChange>,
}

impl MemoryOrderSource {
    pub fn new(channel_capacity: usize) -> Self {
        let (change_tx, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            state: RwLock::new(OrderSnapshot::empty()),
            change_tx,
        }
    }

    /// Create a source already holding `orders` (revision 0)
    pub fn with_orders(orders: Vec<Order>, channel_capacity: usize) -> Self {
        let source = Self::new(channel_capacity);
        source.state.write().orders = Arc::from(orders);
        source
    }

    /// Seed from a JSON array of backend order rows
    pub fn load_json_file(path: impl AsRef<Path>, channel_capacity: usize) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::order_source(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let rows: Vec<OrderRow> = serde_json::from_str(&raw).map_err(|e| {
            AppError::order_source(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let received_at = Utc::now();
        let orders = rows
            .into_iter()
            .map(|row| normalize_order(row, received_at))
            .collect::<AppResult<Vec<_>>>()?;

        tracing::info!(path = %path.display(), orders = orders.len(), "Loaded seed orders");
        Ok(Self::with_orders(orders, channel_capacity))
    }

    /// Current snapshot
    pub fn snapshot(&self) -> OrderSnapshot {
        self.state.read().clone()
    }

    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    /// Insert a new order or replace the one with the same id
    pub fn upsert(&self, row: OrderRow) -> AppResult<Order> {
        let order = normalize_order(row, Utc::now())?;

        let mut state = self.state.write();
        let mut orders = state.orders.to_vec();
        let kind = match orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => {
                *existing = order.clone();
                ChangeKind::Updated
            }
            None => {
                orders.push(order.clone());
                ChangeKind::Inserted
            }
        };
        self.commit(&mut state, orders, kind, Some(order.id.clone()));
        Ok(order)
    }

    /// Remove an order by id
    pub fn remove(&self, id: &str) -> AppResult<()> {
        let mut state = self.state.write();
        if !state.orders.iter().any(|o| o.id == id) {
            return Err(AppError::order_not_found(id));
        }
        let orders: Vec<Order> = state.orders.iter().filter(|o| o.id != id).cloned().collect();
        self.commit(&mut state, orders, ChangeKind::Deleted, Some(id.to_string()));
        Ok(())
    }

    /// Replace the whole order set
    ///
    /// All rows are normalized before anything is replaced.
    pub fn replace_all(&self, rows: Vec<OrderRow>) -> AppResult<u64> {
        let received_at = Utc::now();
        let orders = rows
            .into_iter()
            .map(|row| normalize_order(row, received_at))
            .collect::<AppResult<Vec<_>>>()?;

        let mut state = self.state.write();
        Ok(self.commit(&mut state, orders, ChangeKind::Reloaded, None))
    }

    /// Install a new order set and notify subscribers (caller holds the write lock)
    fn commit(
        &self,
        state: &mut OrderSnapshot,
        orders: Vec<Order>,
        kind: ChangeKind,
        order_id: Option<String>,
    ) -> u64 {
        state.revision += 1;
        state.orders = Arc::from(orders);

        let change = OrderChange {
            revision: state.revision,
            kind,
            order_id,
        };
        if self.change_tx.send(change).is_err() {
            tracing::trace!(revision = state.revision, "No change subscribers");
        }
        state.revision
    }
}

impl Default for MemoryOrderSource {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[async_trait]
impl OrderSource for MemoryOrderSource {
    async fn fetch_orders(&self) -> AppResult<OrderSnapshot> {
        Ok(self.snapshot())
    }

    fn current_revision(&self) -> u64 {
        self.state.read().revision
    }

    fn subscribe(&self) -> broadcast::Receiver<OrderChange> {
        self.change_tx.subscribe()
    }
}
