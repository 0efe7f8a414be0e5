///! Lake service - application-lifetime cache over the lake store
///!
///! Holds the last loaded snapshot of both tables. A request that finds the
///! snapshot too thin triggers the bootstrap path: reload from the store, and
///! if the tables are still empty, ask the stocking source to fill them.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use trout_common::{derby_lake_set, latest_date, totals_by_date, DateTotal, DateWindow, LakeRecord};

use crate::error::{AppError, AppResult};
use crate::store::{LakeStore, StockingSource};

/// How much data a page needs before the cached snapshot is good enough
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Populated {
    /// Index page: stocked and derby rows
    Full,
    /// Map-only page: stocked rows
    StockedOnly,
}

/// One consistent read of both lake tables
#[derive(Debug, Clone)]
pub struct LakeSnapshot {
    pub stocked: Vec<LakeRecord>,
    pub derby: Vec<String>,
    pub totals: Vec<DateTotal>,
    pub loaded_at: DateTime<Utc>,
}

impl LakeSnapshot {
    pub fn new(stocked: Vec<LakeRecord>, derby: Vec<String>) -> Self {
        let totals = totals_by_date(&stocked, None);
        Self {
            stocked,
            derby,
            totals,
            loaded_at: Utc::now(),
        }
    }

    /// More than one row in each table the page needs.
    pub fn is_populated(&self, requirement: Populated) -> bool {
        let stocked_ok = self.stocked.len() > 1;
        match requirement {
            Populated::Full => stocked_ok && self.derby.len() > 1,
            Populated::StockedOnly => stocked_ok,
        }
    }

    pub fn derby_set(&self) -> BTreeSet<String> {
        derby_lake_set(&self.derby)
    }

    /// Date of the most recent stocking event
    pub fn data_updated(&self) -> Option<NaiveDate> {
        latest_date(&self.stocked)
    }

    /// Stocked rows, newest first
    pub fn most_recent(&self) -> Vec<&LakeRecord> {
        let mut recent: Vec<&LakeRecord> = self.stocked.iter().collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.lake.cmp(&b.lake)));
        recent
    }
}

/// Rows and daily totals inside one date window
#[derive(Debug, Clone)]
pub struct FilteredLakes {
    pub window: DateWindow,
    pub stocked: Vec<LakeRecord>,
    pub totals: Vec<DateTotal>,
}

pub struct LakeService {
    store: LakeStore,
    source: Arc<dyn StockingSource>,
    snapshot: RwLock<Option<Arc<LakeSnapshot>>>,
}

impl LakeService {
    pub fn new(store: LakeStore, source: Arc<dyn StockingSource>) -> Self {
        Self {
            store,
            source,
            snapshot: RwLock::new(None),
        }
    }

    /// Cached snapshot if it meets `requirement`, otherwise run the bootstrap path.
    pub async fn snapshot(&self, requirement: Populated) -> AppResult<Arc<LakeSnapshot>> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            if snapshot.is_populated(requirement) {
                return Ok(snapshot.clone());
            }
        }

        let mut guard = self.snapshot.write().await;
        // Another request may have bootstrapped while we waited for the lock
        if let Some(snapshot) = guard.as_ref() {
            if snapshot.is_populated(requirement) {
                return Ok(snapshot.clone());
            }
        }

        let snapshot = Arc::new(self.bootstrap(requirement).await?);
        *guard = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Reload from the store, replacing the cached snapshot.
    pub async fn refresh(&self) -> AppResult<Arc<LakeSnapshot>> {
        let snapshot = Arc::new(self.load().await?);
        tracing::info!(
            "Lake cache refreshed at {}: {} stocked rows, {} derby rows",
            snapshot.loaded_at.format("%Y-%m-%d %H:%M:%S"),
            snapshot.stocked.len(),
            snapshot.derby.len()
        );
        *self.snapshot.write().await = Some(snapshot.clone());
        Ok(snapshot)
    }

    /// Rows and totals inside `window`, straight from the store.
    pub async fn filtered(&self, window: DateWindow) -> AppResult<FilteredLakes> {
        let stocked = self.store.get_stocked_in(&window).await?;
        let totals = totals_by_date(&stocked, Some(&window));
        tracing::debug!(
            "Filtered {} to {}: {} stocked rows over {} dates",
            window.start,
            window.end,
            stocked.len(),
            totals.len()
        );
        Ok(FilteredLakes {
            window,
            stocked,
            totals,
        })
    }

    async fn load(&self) -> AppResult<LakeSnapshot> {
        self.store.ensure_schema().await?;
        let stocked = self.store.get_all_stocked().await?;
        let derby = self.store.get_all_derby().await?;
        Ok(LakeSnapshot::new(stocked, derby))
    }

    async fn bootstrap(&self, requirement: Populated) -> AppResult<LakeSnapshot> {
        let snapshot = self.load().await?;
        if snapshot.is_populated(requirement) {
            return Ok(snapshot);
        }

        tracing::info!(
            "Lake tables under-populated ({} stocked, {} derby), populating from source",
            snapshot.stocked.len(),
            snapshot.derby.len()
        );
        let report = self
            .source
            .populate(&self.store)
            .await
            .map_err(AppError::Source)?;
        tracing::info!(
            "Source wrote {} stocked rows and {} derby rows",
            report.stocked,
            report.derby
        );

        self.load().await
    }
}
