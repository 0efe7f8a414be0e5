///! Row types as read back from the lake tables

use trout_common::{LakeRecord, RawLake};

/// One `stocked_lakes_table` row, every column read as text
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StockedLakeRow {
    pub date: Option<String>,
    pub lake: Option<String>,
    pub stocked_fish: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub directions: Option<String>,
    pub derby_participant: Option<i64>,
}

impl From<StockedLakeRow> for RawLake {
    fn from(row: StockedLakeRow) -> Self {
        RawLake {
            date: row.date,
            lake: row.lake,
            stocked_fish: row.stocked_fish,
            latitude: row.latitude,
            longitude: row.longitude,
            directions: row.directions,
            derby_participant: row.derby_participant.unwrap_or(0) != 0,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DerbyLakeRow {
    pub lake: Option<String>,
}

/// Parse rows into records, skipping (and logging) the ones that cannot be mapped.
pub fn parse_stocked_rows(rows: Vec<StockedLakeRow>) -> Vec<LakeRecord> {
    let total = rows.len();
    let mut records = Vec::with_capacity(total);

    for row in rows {
        let name = row.lake.clone().unwrap_or_default();
        match LakeRecord::from_raw(row.into()) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("Skipping stocked lake row '{}': {}", name, e),
        }
    }

    if records.len() < total {
        tracing::debug!("Parsed {} of {} stocked lake rows", records.len(), total);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(lake: &str, fish: &str, derby: Option<i64>) -> StockedLakeRow {
        StockedLakeRow {
            date: Some("Apr 20, 2024".to_string()),
            lake: Some(lake.to_string()),
            stocked_fish: Some(fish.to_string()),
            latitude: Some("47.1".to_string()),
            longitude: Some("-121.9".to_string()),
            directions: None,
            derby_participant: derby,
        }
    }

    #[test]
    fn test_parse_stocked_rows_skips_bad_rows() {
        let records = parse_stocked_rows(vec![
            row("GOOD LAKE", "1,000", Some(1)),
            row("BAD LAKE", "n/a", Some(0)),
            row("OTHER LAKE", "12", None),
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].lake, "GOOD LAKE");
        assert_eq!(records[0].stocked_fish, 1000);
        assert!(records[0].derby_participant);
        assert!(!records[1].derby_participant);
        assert_eq!(records[1].directions, "");
    }
}
