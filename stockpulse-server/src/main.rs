use std::env;
use std::process;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;

use stockpulse_analytics::pipelines::health_report::{HealthReport, HealthReportPipeline};
use stockpulse_analytics::snapshot_loader::load_snapshots_file;
use stockpulse_analytics::source::VecSource;
use stockpulse_analytics::types::{ConsistencyStatus, RollingMovement, StockStatus, TrendLabel};
use stockpulse_core::Thresholds;

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ReportJson {
    generated_at: String,
    source_file: String,
    store_filter: Vec<String>,
    load_ms: u128,
    pipeline_ms: u128,
    report: HealthReport,
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

fn count_status(report: &HealthReport, status: StockStatus) -> usize {
    report.reorder.iter().filter(|r| r.status == status).count()
}

fn print_human(report: &HealthReport, top_k: usize, load_ms: u128, pipeline_ms: u128) {
    println!();
    println!("  \u{2554}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2557}");
    println!("  \u{2551}          STOCKPULSE \u{2014} Inventory Health Report          \u{2551}");
    println!("  \u{255a}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{255d}");
    println!();

    let s = &report.summary;
    println!(
        "  {} snapshots \u{00b7} {} store/product/region keys \u{00b7} {} through {}",
        s.snapshot_count, s.key_count, s.min_date, s.max_date
    );
    println!(
        "  {} below reorder point \u{00b7} {} out of stock \u{00b7} {} keys with insufficient history",
        count_status(report, StockStatus::BelowReorderPoint),
        count_status(report, StockStatus::OutOfStock),
        report.reorder_insufficient.len(),
    );
    println!();

    if report.reorder.is_empty() {
        println!("  No keys with enough history to evaluate.");
    } else {
        println!("  Most urgent stock positions:");
        println!("  {:\u{2500}<64}", "");
        for (i, r) in report.reorder.iter().take(top_k).enumerate() {
            let flag = match r.status {
                StockStatus::OutOfStock => "!!",
                StockStatus::BelowReorderPoint => "! ",
                _ => "  ",
            };
            let supply = match r.days_of_supply {
                Some(d) => format!("{:.1}d supply", d),
                None => "no demand".to_string(),
            };
            println!(
                "  {} {}. {:24} {:>8.0} on hand  reorder at {:>8.1}  {}",
                flag,
                i + 1,
                r.key.to_string(),
                r.current_stock,
                r.reorder_point,
                supply,
            );
            println!("       {}", r.status);
        }
        println!("  {:\u{2500}<64}", "");
    }
    println!();

    let slow = report
        .turnover_rolling
        .iter()
        .filter(|r| matches!(r.movement, RollingMovement::SlowMoving | RollingMovement::NoSales))
        .count();
    let fast = report
        .turnover_rolling
        .iter()
        .filter(|r| r.movement == RollingMovement::FastMoving)
        .count();
    println!(
        "  Movement: {} fast-moving \u{00b7} {} slow or dormant (of {} keys)",
        fast,
        slow,
        report.turnover_rolling.len()
    );

    let declining = report
        .trend_summary
        .iter()
        .filter(|r| r.label == TrendLabel::MostlyDownward)
        .count();
    println!(
        "  Trends: {} store/product/month cells mostly downward (of {})",
        declining,
        report.trend_summary.len()
    );
    println!(
        "  Consistency: {} keys flagged \u{00b7} Store KPIs: {} store-months \u{00b7} Sell-through: {} region-months",
        report
            .consistency
            .iter()
            .filter(|r| r.status != ConsistencyStatus::Consistent)
            .count(),
        report.store_kpis.len(),
        report.sell_through.len(),
    );

    println!();
    println!(
        "  \u{23f1}  CSV loaded in {}ms \u{00b7} Pipeline ran in {}ms \u{00b7} Total {}ms",
        load_ms,
        pipeline_ms,
        load_ms + pipeline_ms
    );
    println!();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: stockpulse <snapshots.csv> [--stores s1,s2,...] [--top N] [--json]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --stores   Comma-separated store IDs to analyze");
        eprintln!("  --top      Number of stock positions to print (default: 10)");
        eprintln!("  --json     Output the full report as JSON instead of formatted text");
        eprintln!();
        eprintln!("Example:");
        eprintln!("  stockpulse fixtures/retail_store_inventory.csv");
        eprintln!("  stockpulse fixtures/retail_store_inventory.csv --stores S001,S002 --json");
        process::exit(1);
    }

    let csv_path = &args[1];

    // Parse optional flags
    let mut store_filter: Option<Vec<String>> = None;
    let mut top_k: usize = 10;
    let mut json_output = false;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--stores" => {
                if i + 1 < args.len() {
                    store_filter = Some(
                        args[i + 1]
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .collect(),
                    );
                    i += 2;
                } else {
                    eprintln!("Error: --stores requires a comma-separated list of store IDs");
                    process::exit(1);
                }
            }
            "--top" => {
                if i + 1 < args.len() {
                    top_k = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: --top requires a positive integer");
                        process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --top requires a number");
                    process::exit(1);
                }
            }
            "--json" => {
                json_output = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
    }

    // Load snapshot data from CSV
    let load_start = Instant::now();
    let mut snapshots = match load_snapshots_file(csv_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading CSV: {}", e);
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();

    // Apply store filter if provided
    let active_filter: Vec<String> = if let Some(filter) = store_filter {
        let mut store_ids: Vec<String> =
            snapshots.iter().map(|s| s.store_id.clone()).collect();
        store_ids.sort();
        store_ids.dedup();

        snapshots.retain(|s| filter.contains(&s.store_id));
        if snapshots.is_empty() {
            eprintln!("Error: no matching stores found in the data");
            eprintln!("  Requested: {:?}", filter);
            eprintln!("  Available: {:?}", store_ids);
            process::exit(1);
        }
        filter
    } else {
        Vec::new()
    };

    log::info!(
        "loaded {} snapshots from {} in {}ms",
        snapshots.len(),
        csv_path,
        load_ms
    );

    // Build and run pipeline
    let pipeline_start = Instant::now();
    let pipeline = HealthReportPipeline::new(Thresholds::default());
    let source = VecSource::new(snapshots);

    let report = match pipeline.run(&source).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error running health report: {}", e);
            process::exit(1);
        }
    };
    let pipeline_ms = pipeline_start.elapsed().as_millis();

    if json_output {
        let out = ReportJson {
            generated_at: Utc::now().to_rfc3339(),
            source_file: csv_path.clone(),
            store_filter: active_filter,
            load_ms,
            pipeline_ms,
            report,
        };
        println!("{}", serde_json::to_string_pretty(&out).unwrap());
    } else {
        print_human(&report, top_k, load_ms, pipeline_ms);
    }
}
