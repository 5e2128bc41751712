//! CSV snapshot loader.
//!
//! Parses daily inventory snapshot CSVs into validated `Snapshot` records.
//! Expected columns:
//!   date, store_id, product_id, region_id, category, inventory_level,
//!   units_sold, units_ordered, demand_forecast, current_price,
//!   season, weather, promotion
//!
//! Categorical columns (`season`, `weather`, `promotion`) may be empty;
//! empty strings become `None` rather than an empty tag.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use stockpulse_core::error::{AnalyticsError, AnalyticsResult};
use stockpulse_core::snapshot::Snapshot;

/// Raw CSV record before validation.
#[derive(Debug, Clone, Deserialize)]
struct RawSnapshot {
    date: chrono::NaiveDate,
    store_id: String,
    product_id: String,
    region_id: String,
    category: String,
    inventory_level: f64,
    units_sold: f64,
    units_ordered: f64,
    demand_forecast: f64,
    current_price: f64,
    #[serde(default, deserialize_with = "empty_as_none")]
    season: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    weather: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    promotion: Option<String>,
}

impl From<RawSnapshot> for Snapshot {
    fn from(raw: RawSnapshot) -> Self {
        Snapshot {
            date: raw.date,
            store_id: raw.store_id,
            product_id: raw.product_id,
            region_id: raw.region_id,
            category: raw.category,
            inventory_level: raw.inventory_level,
            units_sold: raw.units_sold,
            units_ordered: raw.units_ordered,
            current_price: raw.current_price,
            demand_forecast: raw.demand_forecast,
            season: raw.season,
            weather: raw.weather,
            promotion: raw.promotion,
        }
    }
}

/// Load and validate snapshots from a CSV reader.
pub fn load_snapshots<R: Read>(reader: R) -> AnalyticsResult<Vec<Snapshot>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut snapshots = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        // +2: one for the header row, one for 1-based line numbers.
        let raw: RawSnapshot = result.map_err(|e| AnalyticsError::CsvParse {
            line: line_num + 2,
            reason: e.to_string(),
        })?;
        let snapshot: Snapshot = raw.into();
        snapshot.validate()?;
        snapshots.push(snapshot);
    }

    Ok(snapshots)
}

/// Load snapshots from a CSV file path.
pub fn load_snapshots_file<P: AsRef<Path>>(path: P) -> AnalyticsResult<Vec<Snapshot>> {
    let file = std::fs::File::open(path)?;
    load_snapshots(file)
}

/// Empty or whitespace-only strings deserialize to `None`.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
date,store_id,product_id,region_id,category,inventory_level,units_sold,units_ordered,demand_forecast,current_price,season,weather,promotion
2024-01-01,S001,P0001,North,Groceries,231,12,55,14.2,33.50,Winter,Snowy,
2024-01-01,S001,P0002,North,Toys,88,0,20,3.1,12.25,Winter,,Holiday
2024-01-02,S001,P0001,North,Groceries,219,9,0,13.8,33.50,Winter,Sunny,
";

    #[test]
    fn load_sample_csv() {
        let snapshots = load_snapshots(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].store_id, "S001");
        assert_eq!(snapshots[0].product_id, "P0001");
        assert!((snapshots[0].inventory_level - 231.0).abs() < 1e-9);
        assert_eq!(snapshots[0].season.as_deref(), Some("Winter"));
        assert_eq!(snapshots[0].promotion, None);
        assert_eq!(snapshots[1].weather, None);
        assert_eq!(snapshots[1].promotion.as_deref(), Some("Holiday"));
    }

    #[test]
    fn zero_sale_days_load_as_zero_not_missing() {
        let snapshots = load_snapshots(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(snapshots[1].units_sold, 0.0);
    }

    #[test]
    fn parse_error_carries_line_number() {
        let bad = "\
date,store_id,product_id,region_id,category,inventory_level,units_sold,units_ordered,demand_forecast,current_price,season,weather,promotion
2024-01-01,S001,P0001,North,Groceries,not-a-number,12,55,14.2,33.50,,,
";
        let err = load_snapshots(bad.as_bytes()).unwrap_err();
        match err {
            AnalyticsError::CsvParse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected CsvParse, got {other:?}"),
        }
    }

    #[test]
    fn negative_units_rejected_at_load() {
        let bad = "\
date,store_id,product_id,region_id,category,inventory_level,units_sold,units_ordered,demand_forecast,current_price,season,weather,promotion
2024-01-01,S001,P0001,North,Groceries,100,-5,55,14.2,33.50,,,
";
        let err = load_snapshots(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, AnalyticsError::MalformedInput { .. }));
    }
}
