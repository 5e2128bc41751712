use chrono::NaiveDate;

use stockpulse_analytics::pipelines::health_report::HealthReportPipeline;
use stockpulse_analytics::snapshot_loader::load_snapshots;
use stockpulse_analytics::source::{CsvFileSource, VecSource};
use stockpulse_analytics::store::SnapshotStore;
use stockpulse_analytics::types::*;
use stockpulse_analytics::{age, consistency, kpi, reorder, seasonal, trend, turnover};
use stockpulse_core::{AnalyticsError, Snapshot, Thresholds};

// ---------------------------------------------------------------------------
// Test data fixtures
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn snap(
    day: NaiveDate,
    store_id: &str,
    product_id: &str,
    region_id: &str,
    units_sold: f64,
    inventory_level: f64,
) -> Snapshot {
    Snapshot {
        date: day,
        store_id: store_id.into(),
        product_id: product_id.into(),
        region_id: region_id.into(),
        category: "Groceries".into(),
        inventory_level,
        units_sold,
        units_ordered: units_sold,
        current_price: 9.99,
        demand_forecast: units_sold,
        season: None,
        weather: None,
        promotion: None,
    }
}

/// `days` consecutive daily rows ending at `end`, constant demand and stock.
fn daily_run(
    end: NaiveDate,
    store_id: &str,
    product_id: &str,
    region_id: &str,
    days: u64,
    units_sold: f64,
    inventory_level: f64,
) -> Vec<Snapshot> {
    (0..days)
        .map(|i| {
            let day = end - chrono::Duration::days((days - 1 - i) as i64);
            snap(day, store_id, product_id, region_id, units_sold, inventory_level)
        })
        .collect()
}

fn store_of(snapshots: Vec<Snapshot>) -> SnapshotStore {
    SnapshotStore::from_snapshots(snapshots).unwrap()
}

// ---------------------------------------------------------------------------
// Loader and store tests
// ---------------------------------------------------------------------------

#[test]
fn csv_rows_load_with_optional_tags() {
    let csv = "\
date,store_id,product_id,region_id,category,inventory_level,units_sold,units_ordered,demand_forecast,current_price,season,weather,promotion
2024-01-01,S001,P0001,North,Groceries,231,127,55,135.5,33.5,Winter,Snowy,0
2024-01-01,S001,P0002,North,Toys,204,150,66,144.0,63.0,,,
";
    let snapshots = load_snapshots(csv.as_bytes()).unwrap();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].season.as_deref(), Some("Winter"));
    assert_eq!(snapshots[1].season, None);
    assert_eq!(snapshots[0].inventory_level, 231.0);
}

#[tokio::test]
async fn csv_file_source_feeds_the_pipeline() {
    let csv = "\
date,store_id,product_id,region_id,category,inventory_level,units_sold,units_ordered,demand_forecast,current_price,season,weather,promotion
2024-06-24,S001,P0001,North,Groceries,120,5,5,5.0,9.99,Summer,Sunny,0
2024-06-25,S001,P0001,North,Groceries,115,5,5,5.0,9.99,Summer,Sunny,0
2024-06-26,S001,P0001,North,Groceries,110,5,5,5.0,9.99,Summer,Sunny,0
2024-06-27,S001,P0001,North,Groceries,105,5,5,5.0,9.99,Summer,Rainy,0
2024-06-28,S001,P0001,North,Groceries,100,5,5,5.0,9.99,Summer,Sunny,0
2024-06-29,S001,P0001,North,Groceries,95,5,5,5.0,9.99,Summer,Sunny,0
2024-06-30,S001,P0001,North,Groceries,90,5,5,5.0,9.99,Summer,Sunny,0
";
    let path = std::env::temp_dir().join("stockpulse_source_test.csv");
    std::fs::write(&path, csv).unwrap();

    let source = CsvFileSource::new(path.to_string_lossy().into_owned());
    let report = HealthReportPipeline::with_defaults()
        .run(&source)
        .await
        .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(report.summary.snapshot_count, 7);
    assert_eq!(report.summary.max_date, date(2024, 6, 30));
    assert_eq!(report.reorder.len(), 1);
    assert_eq!(report.reorder[0].avg_daily_demand, 5.0);
}

#[test]
fn duplicate_snapshot_for_same_key_and_date_is_fatal() {
    let day = date(2024, 3, 1);
    let rows = vec![
        snap(day, "S001", "P0001", "North", 5.0, 100.0),
        snap(day, "S001", "P0001", "North", 7.0, 90.0),
    ];
    let err = SnapshotStore::from_snapshots(rows).unwrap_err();
    assert!(matches!(err, AnalyticsError::DuplicateKey { .. }));
}

#[test]
fn negative_quantity_is_rejected_as_malformed() {
    let mut bad = snap(date(2024, 3, 1), "S001", "P0001", "North", 5.0, 100.0);
    bad.inventory_level = -3.0;
    let err = SnapshotStore::from_snapshots(vec![bad]).unwrap_err();
    assert!(matches!(err, AnalyticsError::MalformedInput { .. }));
}

// ---------------------------------------------------------------------------
// Reorder engine
// ---------------------------------------------------------------------------

#[test]
fn demand_spike_raises_reorder_point_via_stddev() {
    let end = date(2024, 6, 30);
    let t = Thresholds::default();

    // Steady seller: 5/day for the whole lead-time window.
    let steady = store_of(daily_run(end, "S001", "P-STEADY", "North", 14, 5.0, 50.0));
    let steady_rp = reorder::compute(&steady, &t).rows[0].reorder_point;

    // Same average-ish seller with one 100-unit spike inside the window.
    let mut spiky = daily_run(end, "S001", "P-SPIKY", "North", 14, 5.0, 50.0);
    let spike_idx = spiky.len() - 3;
    spiky[spike_idx].units_sold = 100.0;
    let spiky_store = store_of(spiky);
    let row = &reorder::compute(&spiky_store, &t).rows[0];

    // mean 18.57, population stddev ~33.2 over [5,5,5,5,100,5,5]
    assert!(row.demand_stddev > 30.0);
    assert!(
        row.reorder_point > steady_rp * 3.0,
        "spike must inflate the reorder point: {} vs steady {}",
        row.reorder_point,
        steady_rp
    );
    assert_eq!(row.status, StockStatus::BelowReorderPoint);
}

#[test]
fn zero_demand_yields_no_days_of_supply_never_an_error() {
    let end = date(2024, 6, 30);
    let t = Thresholds::default();
    let store = store_of(daily_run(end, "S001", "P0001", "North", 10, 0.0, 50.0));
    let result = reorder::compute(&store, &t);
    let row = &result.rows[0];
    assert_eq!(row.avg_daily_demand, 0.0);
    assert_eq!(row.days_of_supply, None);
    assert_eq!(row.reorder_point, 0.0);
    assert_eq!(row.status, StockStatus::AdequateStock);
}

// ---------------------------------------------------------------------------
// Seasonal adjustment
// ---------------------------------------------------------------------------

#[test]
fn winter_demand_scales_the_reorder_point() {
    let end = date(2024, 1, 30);
    let t = Thresholds::default();

    // 30 summer days at 10/day, then 30 winter days at 30/day.
    let mut rows = daily_run(
        end - chrono::Duration::days(30),
        "S001",
        "P0001",
        "North",
        30,
        10.0,
        250.0,
    );
    rows.extend(daily_run(end, "S001", "P0001", "North", 30, 30.0, 250.0));
    for (i, r) in rows.iter_mut().enumerate() {
        r.season = Some(if i < 30 { "Summer" } else { "Winter" }.into());
    }
    let store = store_of(rows);

    let factors = seasonal::factors(&store);
    let winter = factors.iter().find(|f| f.season == "Winter").unwrap();
    // winter avg 30 over overall avg 20
    assert!((winter.factor - 1.5).abs() < 1e-9);

    let base = reorder::compute(&store, &t);
    let adjusted = seasonal::apply(&base.rows, &factors, &store, &t);
    let row = &adjusted[0];
    assert_eq!(row.season.as_deref(), Some("Winter"));
    assert!(
        row.seasonal_reorder_point > row.standard_reorder_point,
        "factor 1.5 must raise the cut point"
    );
    assert!((row.seasonal_reorder_point - row.standard_reorder_point * 1.5).abs() < 1e-9);
}

#[test]
fn untagged_keys_fall_back_to_factor_one() {
    let end = date(2024, 6, 30);
    let t = Thresholds::default();
    let store = store_of(daily_run(end, "S001", "P0001", "North", 14, 5.0, 50.0));
    let base = reorder::compute(&store, &t);
    let adjusted = seasonal::apply(&base.rows, &seasonal::factors(&store), &store, &t);
    assert_eq!(adjusted[0].seasonal_factor, 1.0);
    assert_eq!(
        adjusted[0].seasonal_reorder_point,
        adjusted[0].standard_reorder_point
    );
}

// ---------------------------------------------------------------------------
// Turnover and stock adjustments
// ---------------------------------------------------------------------------

#[test]
fn slow_mover_sitting_on_stock_gets_a_reduction() {
    let end = date(2024, 6, 30);
    let t = Thresholds::default();
    // 90 days at 1/day against a constant 300 on hand: ratio 0.3, slow.
    let store = store_of(daily_run(end, "S001", "P0001", "North", 90, 1.0, 300.0));
    let rolling = turnover::compute_rolling(&store, &t);
    let row = &rolling[0];
    assert_eq!(row.movement, RollingMovement::SlowMoving);
    // period demand 90, target 2x = 180, on hand 300
    assert_eq!(row.adjustment, StockAdjustment::ReduceStock(120.0));
}

#[test]
fn zero_sales_key_reports_no_sales_not_an_error() {
    let end = date(2024, 6, 30);
    let t = Thresholds::default();
    let store = store_of(daily_run(end, "S001", "P0001", "North", 30, 0.0, 120.0));
    let rolling = turnover::compute_rolling(&store, &t);
    assert_eq!(rolling[0].movement, RollingMovement::NoSales);
    assert_eq!(rolling[0].supply_periods, None);

    let monthly = turnover::compute_monthly(&store, &t);
    assert!(monthly.iter().all(|m| m.movement == MonthlyMovement::NoSales));
}

// ---------------------------------------------------------------------------
// Trend classification
// ---------------------------------------------------------------------------

#[test]
fn month_above_trailing_mean_is_upward() {
    let t = Thresholds::default();
    // Jan-Mar total 100 each, Apr total 200: Apr vs trailing mean 100.
    let mut rows = Vec::new();
    for month in 1..=4u32 {
        let per_day = if month == 4 { 20.0 } else { 10.0 };
        for day in 1..=10u32 {
            rows.push(snap(date(2024, month, day), "S001", "P0001", "North", per_day, 100.0));
        }
    }
    let store = store_of(rows);
    let years = trend::classify_years(&store, &t);
    let april = years
        .iter()
        .find(|r| r.month.year == 2024 && r.month.month == 4)
        .unwrap();
    assert_eq!(april.total_units_sold, 200.0);
    assert_eq!(april.trailing_mean, 100.0);
    assert_eq!(april.direction, TrendDirection::Upward);
}

#[test]
fn repeated_yearly_direction_wins_the_summary_vote() {
    let t = Thresholds::default();
    // Two years, both with an April jump: April summary is MostlyUpward.
    let mut rows = Vec::new();
    for year in [2023, 2024] {
        for month in 1..=4u32 {
            let per_day = if month == 4 { 20.0 } else { 10.0 };
            for day in 1..=10u32 {
                rows.push(snap(date(year, month, day), "S001", "P0001", "North", per_day, 100.0));
            }
        }
    }
    let store = store_of(rows);
    let years = trend::classify_years(&store, &t);
    let summary = trend::summarize(&years);
    let april = summary.iter().find(|r| r.calendar_month == 4).unwrap();
    assert_eq!(april.upward_votes, 2);
    assert_eq!(april.label, TrendLabel::MostlyUpward);
}

// ---------------------------------------------------------------------------
// Consistency and age
// ---------------------------------------------------------------------------

#[test]
fn stockout_heavy_key_is_flagged_first() {
    let t = Thresholds::default();
    let end = date(2024, 6, 30);
    let mut rows = daily_run(end, "S001", "P0001", "North", 30, 5.0, 120.0);
    // 10 of 30 days out of stock: rate 0.33 over the 0.17 ceiling.
    for r in rows.iter_mut().take(10) {
        r.inventory_level = 0.0;
    }
    let store = store_of(rows);
    let flagged = consistency::compute(&store, &t);
    assert_eq!(flagged[0].status, ConsistencyStatus::FrequentStockouts);
    assert!((flagged[0].stockout_rate - 10.0 / 30.0).abs() < 1e-9);
}

#[test]
fn replenishment_jump_resets_inventory_age() {
    let t = Thresholds::default();
    let days = [40.0, 40.0, 40.0, 60.0, 60.0];
    let rows: Vec<Snapshot> = days
        .iter()
        .enumerate()
        .map(|(i, &level)| snap(date(2024, 5, 1 + i as u32), "S001", "P0001", "North", 2.0, level))
        .collect();
    let store = store_of(rows);
    let ages = age::compute(&store, &t);
    assert_eq!(ages[0].last_replenishment, Some(date(2024, 5, 4)));
    assert_eq!(ages[0].age_days, Some(1));
}

#[test]
fn age_sums_inventory_across_regions_before_jump_detection() {
    let t = Thresholds::default();
    // Each region alone never jumps 20%, but the summed level 40 -> 60 does.
    let mut rows = Vec::new();
    for (i, level) in [20.0, 20.0, 30.0].iter().enumerate() {
        let day = date(2024, 5, 1 + i as u32);
        rows.push(snap(day, "S001", "P0001", "North", 2.0, *level));
        rows.push(snap(day, "S001", "P0001", "South", 2.0, *level));
    }
    let store = store_of(rows);
    let ages = age::compute(&store, &t);
    assert_eq!(ages.len(), 1, "one row per (store, product)");
    assert_eq!(ages[0].last_replenishment, Some(date(2024, 5, 3)));
}

// ---------------------------------------------------------------------------
// Monthly KPIs
// ---------------------------------------------------------------------------

#[test]
fn healthy_store_month_rates_green_on_stock_and_stockouts() {
    let t = Thresholds::default();
    let end = date(2024, 6, 30);
    let store = store_of(daily_run(end, "S001", "P0001", "North", 30, 5.0, 150.0));
    let kpis = kpi::store_kpis(&store, &t);
    let june = kpis
        .iter()
        .find(|k| k.month.year == 2024 && k.month.month == 6)
        .unwrap();
    assert_eq!(june.average_stock_level, 150.0);
    assert_eq!(june.stock_level_rating, TrafficLight::Green);
    assert_eq!(june.stockout_rate, 0.0);
    assert_eq!(june.stockout_rating, TrafficLight::Green);
}

#[test]
fn sell_through_with_no_inventory_and_no_sales_is_none() {
    let end = date(2024, 6, 30);
    let store = store_of(daily_run(end, "S001", "P0001", "North", 10, 0.0, 0.0));
    let rows = kpi::sell_through_by_region(&store);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].sell_through_pct, None);
}

// ---------------------------------------------------------------------------
// Full pipeline integration tests
// ---------------------------------------------------------------------------

fn mixed_dataset() -> Vec<Snapshot> {
    let end = date(2024, 6, 30);
    let mut rows = Vec::new();
    // Healthy seller across two regions.
    rows.extend(daily_run(end, "S001", "P0001", "North", 60, 8.0, 200.0));
    rows.extend(daily_run(end, "S001", "P0001", "South", 60, 6.0, 180.0));
    // Slow mover at a second store.
    rows.extend(daily_run(end, "S002", "P0002", "North", 90, 1.0, 300.0));
    // Brand-new key with three days of history, under the observation floor.
    rows.extend(daily_run(end, "S002", "P0003", "South", 3, 4.0, 40.0));
    for r in rows.iter_mut() {
        r.season = Some("Summer".into());
    }
    rows
}

#[tokio::test]
async fn health_report_end_to_end() {
    let pipeline = HealthReportPipeline::with_defaults();
    let source = VecSource::new(mixed_dataset());
    let report = pipeline.run(&source).await.unwrap();

    assert_eq!(report.summary.max_date, date(2024, 6, 30));
    assert_eq!(report.summary.key_count, 4);

    // The three-day key is reported, not silently dropped.
    assert!(report.reorder.iter().all(|r| r.key.product_id != "P0003"));
    assert!(report
        .reorder_insufficient
        .iter()
        .any(|r| r.key.product_id == "P0003" && r.observed_days == 3));

    // Worst stock positions first.
    for w in report.reorder.windows(2) {
        assert!(
            w[0].status <= w[1].status,
            "reorder rows must be sorted worst-first"
        );
    }

    // Seasonal rows mirror the reorder rows one-to-one.
    assert_eq!(report.seasonal_reorder.len(), report.reorder.len());

    // The slow mover shows up with a reduction suggestion.
    let slow = report
        .turnover_rolling
        .iter()
        .find(|r| r.key.store_id == "S002" && r.key.product_id == "P0002")
        .unwrap();
    assert_eq!(slow.movement, RollingMovement::SlowMoving);
    assert!(matches!(slow.adjustment, StockAdjustment::ReduceStock(_)));

    assert!(!report.store_kpis.is_empty());
    assert!(!report.sell_through.is_empty());
    assert!(!report.inventory_age.is_empty());
}

#[tokio::test]
async fn report_is_deterministic_for_identical_input() {
    let pipeline = HealthReportPipeline::with_defaults();
    let a = pipeline.run(&VecSource::new(mixed_dataset())).await.unwrap();
    let b = pipeline.run(&VecSource::new(mixed_dataset())).await.unwrap();
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[tokio::test]
async fn empty_source_is_an_error_not_an_empty_report() {
    let pipeline = HealthReportPipeline::with_defaults();
    let err = pipeline.run(&VecSource::new(Vec::new())).await.unwrap_err();
    assert!(matches!(err, AnalyticsError::EmptyStore));
}
