///! Populating the lake tables when the store comes up empty
///!
///! The stocking report scraper lives outside this service. `StockingSource`
///! is the seam it plugs into; `CsvSeedSource` fills the tables from CSV
///! exports of the scraper output.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use trout_common::{derby_lake_set, LakeRecord, RawLake};

use super::LakeStore;
use crate::config::ServerConfig;

/// Rows written by one populate call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateReport {
    pub stocked: usize,
    pub derby: usize,
}

#[async_trait]
pub trait StockingSource: Send + Sync {
    /// Write fresh rows into `stocked_lakes_table` and `derby_lakes_table`.
    async fn populate(&self, store: &LakeStore) -> Result<PopulateReport>;
}

/// Source that never writes anything
pub struct NoSource;

#[async_trait]
impl StockingSource for NoSource {
    async fn populate(&self, _store: &LakeStore) -> Result<PopulateReport> {
        tracing::warn!("Lake tables are empty and no seed source is configured");
        Ok(PopulateReport::default())
    }
}

/// Seed source reading the scraper's CSV exports
pub struct CsvSeedSource {
    stocked_csv: PathBuf,
    derby_csv: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct DerbyCsvRow {
    lake: Option<String>,
}

impl CsvSeedSource {
    pub fn new(stocked_csv: impl AsRef<Path>, derby_csv: Option<PathBuf>) -> Self {
        Self {
            stocked_csv: stocked_csv.as_ref().to_path_buf(),
            derby_csv,
        }
    }

    async fn load_stocked(&self) -> Result<Vec<LakeRecord>> {
        let content = tokio::fs::read_to_string(&self.stocked_csv)
            .await
            .with_context(|| format!("Failed to read stocked lakes CSV: {:?}", self.stocked_csv))?;
        Ok(parse_stocked_csv(&content))
    }

    /// Derby names from the derby CSV, or from the flagged stocked rows when there is none.
    async fn load_derby(&self, stocked: &[LakeRecord]) -> Result<Vec<String>> {
        match &self.derby_csv {
            Some(path) => {
                let content = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read derby lakes CSV: {:?}", path))?;
                parse_derby_csv(&content)
            }
            None => Ok(derby_lake_set(
                stocked
                    .iter()
                    .filter(|r| r.derby_participant)
                    .map(|r| r.lake.as_str()),
            )
            .into_iter()
            .collect()),
        }
    }
}

#[async_trait]
impl StockingSource for CsvSeedSource {
    async fn populate(&self, store: &LakeStore) -> Result<PopulateReport> {
        tracing::info!("Seeding lake tables from {:?}", self.stocked_csv);

        let stocked = self.load_stocked().await?;
        let derby = self.load_derby(&stocked).await?;

        store.ensure_schema().await.context("Failed to create lake tables")?;
        let (stocked, derby) = store
            .replace_all(&stocked, &derby)
            .await
            .context("Failed to replace lake tables")?;

        Ok(PopulateReport { stocked, derby })
    }
}

fn parse_stocked_csv(content: &str) -> Vec<LakeRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<RawLake>().enumerate() {
        let row_number = index + 1;
        match result {
            Ok(raw) => match LakeRecord::from_raw(raw) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping stocked CSV row {}: {}", row_number, e),
            },
            Err(e) => tracing::warn!("Error parsing stocked CSV row {}: {}", row_number, e),
        }
    }
    records
}

fn parse_derby_csv(content: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut names = Vec::new();
    for result in reader.deserialize::<DerbyCsvRow>() {
        let row = result.context("Failed to parse derby CSV row")?;
        if let Some(lake) = row.lake.filter(|l| !l.is_empty()) {
            names.push(lake);
        }
    }
    Ok(names)
}

/// Source selected by the seed paths in the config
pub fn source_from_config(config: &ServerConfig) -> Arc<dyn StockingSource> {
    match &config.seed_stocked_csv {
        Some(stocked) => Arc::new(CsvSeedSource::new(
            stocked,
            config.seed_derby_csv.as_ref().map(PathBuf::from),
        )),
        None => Arc::new(NoSource),
    }
}
