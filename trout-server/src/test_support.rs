///! Fixtures shared by the unit tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use trout_common::{LakeRecord, RawLake};

use crate::store::{LakeStore, PopulateReport, StockingSource};

pub fn lake(name: &str, date: &str, fish: &str, lat: f64, lon: f64, derby: bool) -> LakeRecord {
    LakeRecord::from_raw(RawLake {
        date: Some(date.to_string()),
        lake: Some(name.to_string()),
        stocked_fish: Some(fish.to_string()),
        latitude: Some(lat.to_string()),
        longitude: Some(lon.to_string()),
        directions: Some(format!("https://www.google.com/maps?q={},{}", lat, lon)),
        derby_participant: derby,
    })
    .unwrap()
}

/// Fresh in-memory store with both tables created
pub async fn memory_store() -> LakeStore {
    let store = LakeStore::connect("sqlite::memory:").await.unwrap();
    store.ensure_schema().await.unwrap();
    store
}

pub fn template_dir() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/resources").to_string()
}

/// Source writing three stocked rows (one derby participant) and two derby names
pub struct FixtureSource {
    pub calls: AtomicUsize,
}

impl FixtureSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StockingSource for FixtureSource {
    async fn populate(&self, store: &LakeStore) -> anyhow::Result<PopulateReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (stocked, derby) = store
            .replace_all(
                &[
                    lake("LAKE A", "Jan 10, 2024", "100", 47.0, -121.0, false),
                    lake("LAKE B", "Jan 20, 2024", "2,000", 48.0, -120.0, true),
                    lake("LAKE C", "Jan 20, 2024", "50", 47.5, -120.5, false),
                ],
                &["LAKE B".to_string(), "LAKE D".to_string()],
            )
            .await?;
        Ok(PopulateReport { stocked, derby })
    }
}
