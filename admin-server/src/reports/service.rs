//! Report refresher
//!
//! Recomputes the daily and weekly reports whenever the order source says the
//! order set changed, and on a periodic tick so that the windows follow the
//! clock. Results are published through a `watch` channel; a board computed
//! from an older snapshot never replaces one computed from a newer snapshot.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use shared::models::{ReportData, ReportPeriod, ReportView, ReportWindow};
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::aggregator::aggregate_window;
use crate::orders::{OrderSnapshot, OrderSource};
use crate::utils::AppResult;
use crate::utils::time::{now_in, report_window};

/// Report for one period together with the window it covers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub window: ReportWindow,
    pub report: ReportData,
}

/// Reports computed from one order snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportBoard {
    /// Revision of the snapshot the board was computed from
    pub revision: u64,
    pub generated_at: DateTime<Utc>,
    pub daily: PeriodReport,
    pub weekly: PeriodReport,
}

impl ReportBoard {
    /// Aggregate both periods from `snapshot` relative to `now`
    pub fn build(snapshot: &OrderSnapshot, now: &DateTime<Tz>) -> AppResult<Self> {
        let period_report = |period: ReportPeriod| -> AppResult<PeriodReport> {
            let window = report_window(period, now);
            let report = aggregate_window(&snapshot.orders, &window)?;
            Ok(PeriodReport { window, report })
        };

        Ok(Self {
            revision: snapshot.revision,
            generated_at: now.with_timezone(&Utc),
            daily: period_report(ReportPeriod::Daily)?,
            weekly: period_report(ReportPeriod::Weekly)?,
        })
    }

    pub fn get(&self, period: ReportPeriod) -> &PeriodReport {
        match period {
            ReportPeriod::Daily => &self.daily,
            ReportPeriod::Weekly => &self.weekly,
        }
    }

    /// Presentation view of one period
    pub fn view(&self, period: ReportPeriod) -> ReportView {
        let entry = self.get(period);
        ReportView::new(
            period,
            entry.window,
            self.generated_at,
            self.revision,
            entry.report.clone(),
        )
    }
}

type BoardSlot = Option<Arc<ReportBoard>>;

/// 报表服务 - owns the published reports
pub struct ReportService {
    source: Arc<dyn OrderSource>,
    timezone: Tz,
    board_tx: watch::Sender<BoardSlot>,
}

impl ReportService {
    pub fn new(source: Arc<dyn OrderSource>, timezone: Tz) -> Self {
        let (board_tx, _) = watch::channel(None);
        Self {
            source,
            timezone,
            board_tx,
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Last published board
    pub fn latest(&self) -> BoardSlot {
        self.board_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardSlot> {
        self.board_tx.subscribe()
    }

    /// Latest board if it reflects the source's current revision and its
    /// daily window still contains the current instant, otherwise a freshly
    /// computed one
    pub async fn current(&self) -> AppResult<Arc<ReportBoard>> {
        let source_revision = self.source.current_revision();
        match self.latest() {
            Some(board)
                if board.revision >= source_revision
                    && board.daily.window.contains(&Utc::now()) =>
            {
                Ok(board)
            }
            _ => self.refresh().await,
        }
    }

    /// Fetch a snapshot, aggregate and publish
    ///
    /// Returns the board that is current after publication, which may be a
    /// newer one than this call computed.
    pub async fn refresh(&self) -> AppResult<Arc<ReportBoard>> {
        let snapshot = self.source.fetch_orders().await?;
        let board = ReportBoard::build(&snapshot, &now_in(self.timezone))?;

        tracing::debug!(
            revision = board.revision,
            orders = snapshot.len(),
            daily_orders = board.daily.report.total_orders,
            weekly_orders = board.weekly.report.total_orders,
            "Reports recomputed"
        );

        Ok(self.publish(Arc::new(board)))
    }

    /// Publish `board` unless a board from a newer snapshot is already out
    pub fn publish(&self, board: Arc<ReportBoard>) -> Arc<ReportBoard> {
        let mut current = Arc::clone(&board);
        self.board_tx.send_if_modified(|slot| {
            if let Some(existing) = slot.as_ref().filter(|b| b.revision > board.revision) {
                tracing::debug!(
                    stale = board.revision,
                    published = existing.revision,
                    "Discarding report computed from a stale snapshot"
                );
                current = Arc::clone(existing);
                return false;
            }
            *slot = Some(Arc::clone(&board));
            true
        });
        current
    }

    /// Refresh loop: change notifications, periodic tick, shutdown
    ///
    /// A burst of notifications is coalesced into one refresh. A failed
    /// refresh is logged and the previous board stays published.
    pub async fn run(self: Arc<Self>, refresh_interval: Duration, shutdown: CancellationToken) {
        let mut changes = self.source.subscribe();
        let mut ticker = tokio::time::interval(refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            interval_secs = refresh_interval.as_secs(),
            timezone = %self.timezone,
            "Report refresher started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Report refresher stopped");
                    break;
                }
                change = changes.recv() => match change {
                    Ok(change) => {
                        tracing::debug!(
                            revision = change.revision,
                            kind = ?change.kind,
                            order_id = ?change.order_id,
                            "Order set changed"
                        );
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Report refresher lagged behind order changes");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::warn!("Order change channel closed, report refresher exiting");
                        break;
                    }
                },
                _ = ticker.tick() => {}
            }

            // Coalesce: the refresh below reads the latest snapshot anyway
            while let Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) = changes.try_recv() {}

            if let Err(e) = self.refresh().await {
                tracing::error!(
                    code = %e.code,
                    error = %e,
                    "Report refresh failed, keeping previous report"
                );
            }
        }
    }
}
