///! Lake data access
///!
///! Reads `stocked_lakes_table` and `derby_lakes_table` from Postgres (when
///! `SQLALCHEMY_DATABASE_URI` is set) or from an in-memory SQLite database.
///! Columns are read as text and parsed here, so the same SQL runs on both.

mod rows;
pub mod seed;

pub use rows::{parse_stocked_rows, DerbyLakeRow, StockedLakeRow};
pub use seed::{CsvSeedSource, NoSource, PopulateReport, StockingSource};

use chrono::NaiveDate;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::{AnyConnection, AnyPool};
use trout_common::{derby_lake_set, latest_date, totals_by_date, DateTotal, DateWindow, LakeRecord};

use crate::error::AppResult;

const CREATE_STOCKED_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS stocked_lakes_table (
    "date" TEXT,
    lake TEXT,
    stocked_fish TEXT,
    latitude DOUBLE PRECISION,
    longitude DOUBLE PRECISION,
    directions TEXT,
    derby_participant BOOLEAN
)"#;

const CREATE_DERBY_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS derby_lakes_table (
    lake TEXT,
    "date" TEXT
)"#;

const SELECT_STOCKED: &str = r#"
SELECT CAST("date" AS TEXT) AS "date",
       CAST(lake AS TEXT) AS lake,
       CAST(stocked_fish AS TEXT) AS stocked_fish,
       CAST(latitude AS TEXT) AS latitude,
       CAST(longitude AS TEXT) AS longitude,
       CAST(directions AS TEXT) AS directions,
       CAST(CASE WHEN derby_participant THEN 1 ELSE 0 END AS BIGINT) AS derby_participant
FROM stocked_lakes_table"#;

const SELECT_DERBY: &str = "SELECT CAST(lake AS TEXT) AS lake FROM derby_lakes_table";

const INSERT_STOCKED: &str = r#"
INSERT INTO stocked_lakes_table ("date", lake, stocked_fish, latitude, longitude, directions, derby_participant)
VALUES ($1, $2, $3, $4, $5, $6, $7)"#;

const INSERT_DERBY: &str = "INSERT INTO derby_lakes_table (lake) VALUES ($1)";

const DELETE_STOCKED: &str = "DELETE FROM stocked_lakes_table";
const DELETE_DERBY: &str = "DELETE FROM derby_lakes_table";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Sqlite,
}

/// Connection pool over the two lake tables
#[derive(Clone)]
pub struct LakeStore {
    pool: AnyPool,
    backend: Backend,
}

impl LakeStore {
    /// Connect to `url`. `sqlite::memory:` keeps one connection open for the
    /// lifetime of the pool so the data is not dropped between queries.
    pub async fn connect(url: &str) -> AppResult<Self> {
        install_default_drivers();

        let url = normalize_database_url(url);
        let backend = if url.starts_with("sqlite:") {
            Backend::Sqlite
        } else {
            Backend::Postgres
        };

        let options = if backend == Backend::Sqlite && url.contains(":memory:") {
            AnyPoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            AnyPoolOptions::new().max_connections(5)
        };

        let pool = options.connect(&url).await?;
        tracing::info!("Connected to {:?} lake store", backend);

        Ok(Self { pool, backend })
    }

    /// Create both tables if they are missing.
    pub async fn ensure_schema(&self) -> AppResult<()> {
        sqlx::query(CREATE_STOCKED_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_DERBY_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// All stocked lakes, ascending by date.
    pub async fn get_all_stocked(&self) -> AppResult<Vec<LakeRecord>> {
        let rows: Vec<StockedLakeRow> = sqlx::query_as(SELECT_STOCKED).fetch_all(&self.pool).await?;
        let mut records = parse_stocked_rows(rows);
        records.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(records)
    }

    /// Stocked lakes dated inside `window`, ascending by date.
    pub async fn get_stocked_in(&self, window: &DateWindow) -> AppResult<Vec<LakeRecord>> {
        let records = self.get_all_stocked().await?;
        Ok(trout_common::within_window(&records, window))
    }

    /// Derby lake names as stored (may repeat).
    pub async fn get_all_derby(&self) -> AppResult<Vec<String>> {
        let rows: Vec<DerbyLakeRow> = sqlx::query_as(SELECT_DERBY).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().filter_map(|r| r.lake).collect())
    }

    pub async fn get_derby_set(&self) -> AppResult<std::collections::BTreeSet<String>> {
        Ok(derby_lake_set(self.get_all_derby().await?))
    }

    /// Fish stocked per date, ascending, optionally limited to `window`.
    pub async fn get_totals_by_date(&self, window: Option<&DateWindow>) -> AppResult<Vec<DateTotal>> {
        let records = self.get_all_stocked().await?;
        Ok(totals_by_date(&records, window))
    }

    /// Date of the newest stocking event, `None` when the table is empty.
    pub async fn last_stocked_date(&self) -> AppResult<Option<NaiveDate>> {
        Ok(latest_date(&self.get_all_stocked().await?))
    }

    pub async fn insert_stocked(&self, records: &[LakeRecord]) -> AppResult<usize> {
        let mut tx = self.pool.begin().await?;
        insert_stocked_rows(&mut tx, records).await?;
        tx.commit().await?;
        Ok(records.len())
    }

    pub async fn insert_derby(&self, names: &[String]) -> AppResult<usize> {
        let mut tx = self.pool.begin().await?;
        insert_derby_rows(&mut tx, names).await?;
        tx.commit().await?;
        Ok(names.len())
    }

    /// Swap the contents of both tables in one transaction.
    ///
    /// Running it again with the same input leaves the tables unchanged.
    pub async fn replace_all(&self, stocked: &[LakeRecord], derby: &[String]) -> AppResult<(usize, usize)> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(DELETE_STOCKED).execute(&mut *tx).await?;
        sqlx::query(DELETE_DERBY).execute(&mut *tx).await?;
        insert_stocked_rows(&mut tx, stocked).await?;
        insert_derby_rows(&mut tx, derby).await?;
        tx.commit().await?;
        tracing::info!(
            "Replaced {:?} lake tables: {} stocked rows, {} derby rows",
            self.backend,
            stocked.len(),
            derby.len()
        );
        Ok((stocked.len(), derby.len()))
    }
}

async fn insert_stocked_rows(conn: &mut AnyConnection, records: &[LakeRecord]) -> Result<(), sqlx::Error> {
    for record in records {
        sqlx::query(INSERT_STOCKED)
            .bind(record.date_text.clone())
            .bind(record.lake.clone())
            .bind(record.stocked_fish_text.clone())
            .bind(record.latitude)
            .bind(record.longitude)
            .bind(record.directions.clone())
            .bind(record.derby_participant)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn insert_derby_rows(conn: &mut AnyConnection, names: &[String]) -> Result<(), sqlx::Error> {
    for name in names {
        sqlx::query(INSERT_DERBY)
            .bind(name.clone())
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Accept SQLAlchemy-style URIs such as `postgresql+psycopg2://...`.
pub fn normalize_database_url(url: &str) -> String {
    let url = url.trim();
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let scheme = scheme.split('+').next().unwrap_or(scheme);
            format!("{}://{}", scheme, rest)
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{lake, memory_store};

    #[test]
    fn test_normalize_database_url() {
        assert_eq!(
            normalize_database_url("postgresql+psycopg2://u:p@host/db"),
            "postgresql://u:p@host/db"
        );
        assert_eq!(normalize_database_url(" postgres://host/db "), "postgres://host/db");
        assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    }

    #[tokio::test]
    async fn test_memory_store_round_trips_records() {
        let store = memory_store().await;
        assert_eq!(store.backend, Backend::Sqlite);
        assert!(store.get_all_stocked().await.unwrap().is_empty());

        let records = vec![
            lake("LAKE B", "Jan 20, 2024", "1,500", 48.0, -120.0, true),
            lake("LAKE A", "Jan 10, 2024", "200", 47.0, -121.0, false),
        ];
        assert_eq!(store.insert_stocked(&records).await.unwrap(), 2);

        let loaded = store.get_all_stocked().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].lake, "LAKE A");
        assert_eq!(loaded[1].lake, "LAKE B");
        assert_eq!(loaded[1].stocked_fish, 1500);
        assert_eq!(loaded[1].stocked_fish_text, "1,500");
        assert!(loaded[1].derby_participant);
        assert_eq!(loaded[1].latitude, 48.0);
    }

    #[tokio::test]
    async fn test_totals_and_window_queries() {
        let store = memory_store().await;
        store
            .insert_stocked(&[
                lake("A", "Jan 23, 2024", "100", 47.0, -121.0, false),
                lake("B", "Jan 24, 2024", "1,000", 47.0, -121.0, false),
                lake("C", "Jan 24, 2024", "250", 47.0, -121.0, true),
                lake("D", "Jan 31, 2024", "5", 47.0, -121.0, false),
            ])
            .await
            .unwrap();

        let all = store.get_totals_by_date(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].date < w[1].date));

        let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let window = DateWindow::last_days(today, 7);
        let filtered = store.get_totals_by_date(Some(&window)).await.unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|t| window.contains(t.date)));
        assert_eq!(filtered[0].total, 1250);

        let lakes = store.get_stocked_in(&window).await.unwrap();
        assert_eq!(lakes.len(), 3);
        assert!(lakes.iter().all(|l| l.lake != "A"));
    }

    #[tokio::test]
    async fn test_derby_set_is_distinct() {
        let store = memory_store().await;
        let names: Vec<String> = ["Lake B", "Lake A", "Lake B"].iter().map(|s| s.to_string()).collect();
        store.insert_derby(&names).await.unwrap();

        assert_eq!(store.get_all_derby().await.unwrap().len(), 3);
        let set = store.get_derby_set().await.unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["Lake A", "Lake B"]);
    }

    #[tokio::test]
    async fn test_last_stocked_date() {
        let store = memory_store().await;
        assert_eq!(store.last_stocked_date().await.unwrap(), None);

        store
            .insert_stocked(&[
                lake("A", "Mar 02, 2024", "10", 47.0, -121.0, false),
                lake("B", "Dec 30, 2023", "10", 47.0, -121.0, false),
                lake("C", "Feb 14, 2024", "10", 47.0, -121.0, false),
            ])
            .await
            .unwrap();
        assert_eq!(store.last_stocked_date().await.unwrap(), NaiveDate::from_ymd_opt(2024, 3, 2));
    }

    #[tokio::test]
    async fn test_replace_all_does_not_accumulate() {
        let store = memory_store().await;
        let stocked = vec![
            lake("A", "Jan 10, 2024", "1,000", 47.0, -121.0, true),
            lake("B", "Jan 11, 2024", "5", 47.0, -121.0, false),
        ];
        let derby = vec!["A".to_string()];

        for _ in 0..3 {
            assert_eq!(store.replace_all(&stocked, &derby).await.unwrap(), (2, 1));
        }

        assert_eq!(store.get_all_stocked().await.unwrap().len(), 2);
        assert_eq!(store.get_all_derby().await.unwrap(), vec!["A"]);
        let totals = store.get_totals_by_date(None).await.unwrap();
        assert_eq!(totals[0].total, 1000);
    }

    #[tokio::test]
    async fn test_derby_table_has_date_column() {
        let store = memory_store().await;
        sqlx::query(r#"INSERT INTO derby_lakes_table (lake, "date") VALUES ($1, $2)"#)
            .bind("MOSES LK".to_string())
            .bind("Apr 27, 2024".to_string())
            .execute(&store.pool)
            .await
            .unwrap();
        store.insert_derby(&["BIG LK".to_string()]).await.unwrap();

        assert_eq!(store.get_all_derby().await.unwrap(), vec!["MOSES LK", "BIG LK"]);
    }
}
