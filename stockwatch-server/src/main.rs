use std::env;
use std::path::Path;
use std::process;
use std::time::Instant;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use stockwatch_core::config::EngineConfig;
use stockwatch_core::risk::{summarize_client, ClientRiskSummary};
use stockwatch_core::types::ProductSnapshot;

use stockwatch_pipeline::catalog_loader::{load_catalog_file, load_transactions_file};
use stockwatch_pipeline::import_analysis::{
    project_status, AlertType, ImportAnalysisReport, ImportImpactAnalyzer, OpenAlert,
};
use stockwatch_pipeline::import_diff::{generate_import_diff, ImportDiff};
use stockwatch_pipeline::import_loader::load_import_file;
use stockwatch_pipeline::pipeline::ReviewPipeline;
use stockwatch_pipeline::pipelines::risk_review::RiskReviewPipeline;
use stockwatch_pipeline::types::{ReviewQuery, RiskCandidate};

// ---------------------------------------------------------------------------
// JSON output contract
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ReviewJson {
    generated_at: String,
    client_id: String,
    as_of: String,
    pipeline_ms: u128,
    products: Vec<ProductJson>,
    summary: ReviewSummaryJson,
}

#[derive(Serialize)]
struct ProductJson {
    product_id: String,
    sku: String,
    name: String,
    status: String,
    weeks_remaining: f64,
    percent_of_reorder_point: f64,
    risk_score: f64,
    risk_level: String,
    priority_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    seasonal_factor: Option<f64>,
    factors: Vec<FactorJson>,
}

#[derive(Serialize)]
struct FactorJson {
    name: String,
    value: f64,
    weight: f64,
    contribution: f64,
    description: String,
}

#[derive(Serialize)]
struct ReviewSummaryJson {
    products_in_catalog: usize,
    candidates_assessed: usize,
    passed_filter: usize,
    selected: usize,
    client: ClientRiskSummary,
}

#[derive(Serialize)]
struct ImportJson {
    generated_at: String,
    analysis: ImportAnalysisReport,
    diff: ImportDiff,
}

fn build_review_json(
    result: &stockwatch_pipeline::pipeline::PipelineResult<RiskCandidate>,
    query: &ReviewQuery,
    catalog_size: usize,
    pipeline_ms: u128,
) -> ReviewJson {
    let scores: Vec<_> = result.selected.iter().map(|c| c.risk.clone()).collect();
    let client = summarize_client(&scores);

    ReviewJson {
        generated_at: Utc::now().to_rfc3339(),
        client_id: query.client_id.clone(),
        as_of: query.as_of.to_rfc3339(),
        pipeline_ms,
        products: result
            .selected
            .iter()
            .map(|c| ProductJson {
                product_id: c.product_id.clone(),
                sku: c.sku.clone(),
                name: c.name.clone(),
                status: c.health.status.to_string(),
                weeks_remaining: c.health.weeks_remaining,
                percent_of_reorder_point: c.health.percent_of_reorder_point,
                risk_score: c.risk.score,
                risk_level: c.risk.risk_level.to_string(),
                priority_score: c.priority_score.unwrap_or(0.0),
                seasonal_factor: c.seasonal_factor,
                factors: c
                    .risk
                    .factors
                    .iter()
                    .map(|f| FactorJson {
                        name: f.name.to_string(),
                        value: f.value,
                        weight: f.weight,
                        contribution: f.contribution,
                        description: f.description.clone(),
                    })
                    .collect(),
            })
            .collect(),
        summary: ReviewSummaryJson {
            products_in_catalog: catalog_size,
            candidates_assessed: result.retrieved,
            passed_filter: result.filtered,
            selected: result.selected.len(),
            client,
        },
    }
}

// ---------------------------------------------------------------------------
// Human-readable output
// ---------------------------------------------------------------------------

fn print_review_human(
    result: &stockwatch_pipeline::pipeline::PipelineResult<RiskCandidate>,
    catalog_size: usize,
    load_ms: u128,
    pipeline_ms: u128,
) {
    println!();
    println!("  ==============================================================");
    println!("  STOCKWATCH  |  Catalog Risk Review");
    println!("  ==============================================================");
    println!();
    println!(
        "  {} products in catalog  |  {} assessed  |  {} passed filter  |  top {} selected",
        catalog_size,
        result.retrieved,
        result.filtered,
        result.selected.len()
    );
    println!();

    if result.selected.is_empty() {
        println!("  No at-risk products. All clear!");
    } else {
        println!("  {:-<62}", "");
        for (i, c) in result.selected.iter().enumerate() {
            let priority = c.priority_score.unwrap_or(0.0);
            let urgency_icon = match c.risk.score {
                s if s >= 75.0 => "!!",
                s if s >= 50.0 => "! ",
                _ => "  ",
            };
            println!(
                "  {} {}. {:14} {:24} risk {:>3.0} ({})  priority {:.1}",
                urgency_icon,
                i + 1,
                c.sku,
                truncate(&c.name, 24),
                c.risk.score,
                c.risk.risk_level,
                priority,
            );
            let weeks = if c.health.weeks_remaining >= 999.0 {
                "no usage data".to_string()
            } else {
                format!("{:.1} weeks left", c.health.weeks_remaining)
            };
            let seasonal = match c.seasonal_factor {
                Some(f) => format!("  seasonal x{:.2}", f),
                None => String::new(),
            };
            println!(
                "       status: {}  |  {}  |  {:.0}% of reorder point{}",
                c.health.status, weeks, c.health.percent_of_reorder_point, seasonal,
            );
            if let Some(top) = c
                .risk
                .factors
                .iter()
                .max_by(|a, b| a.contribution.total_cmp(&b.contribution))
            {
                println!("       driver: {}", top.description);
            }
            println!();
        }
        println!("  {:-<62}", "");
    }

    println!();
    println!(
        "  CSV loaded in {}ms  |  pipeline ran in {}ms  |  total {}ms",
        load_ms,
        pipeline_ms,
        load_ms + pipeline_ms
    );
    println!();
}

fn print_import_human(report: &ImportAnalysisReport, diff: &ImportDiff) {
    println!();
    println!("  ==============================================================");
    println!("  STOCKWATCH  |  Pre-Import Impact Analysis");
    println!("  ==============================================================");
    println!();
    let s = &report.summary;
    println!(
        "  {} rows  |  {} new  |  {} updated  |  {} unchanged  |  {} significant  |  {} skipped",
        s.total_rows,
        s.new_products,
        s.updated_products,
        s.unchanged_products,
        s.significant_changes,
        s.skipped_rows,
    );
    println!();

    if !report.status_transitions.is_empty() {
        println!("  Status transitions:");
        for t in &report.status_transitions {
            let weeks = if t.projected_weeks_remaining >= 999.0 {
                "no usage data".to_string()
            } else {
                format!("{:.1} wks", t.projected_weeks_remaining)
            };
            println!("    {:14} {} -> {}  ({})", t.sku, t.before, t.after, weeks);
        }
        println!();
    }

    if !report.anomalies.is_empty() {
        println!("  Data anomalies:");
        for a in &report.anomalies {
            println!("    [{:?}] {:14} {}", a.severity, a.sku, a.detail);
        }
        println!();
    }

    let alerts = &report.alert_impact;
    if !alerts.projected_alerts.is_empty() || !alerts.projected_resolutions.is_empty() {
        println!(
            "  Alerts: {} would open, {} would resolve",
            alerts.projected_alerts.len(),
            alerts.projected_resolutions.len()
        );
        for a in &alerts.projected_alerts {
            println!("    + {:14} {:?}", a.sku, a.alert_type);
        }
        for r in &alerts.projected_resolutions {
            println!("    - {:14} {:?} resolved", r.sku, r.alert_type);
        }
        println!();
    }

    if !alerts.reorder_needed.is_empty() {
        println!("  Reorder needed:");
        for item in &alerts.reorder_needed {
            println!(
                "    {:14} {:24} {}  ({:.1} wks)",
                item.sku,
                truncate(&item.name, 24),
                item.status,
                item.projected_weeks_remaining,
            );
        }
        println!();
    }

    println!("  Recommendations:");
    for rec in &report.recommendations {
        println!("    * {}", rec);
    }
    println!();

    let changed: Vec<_> = diff
        .products
        .iter()
        .filter(|p| !p.fields.is_empty())
        .collect();
    if !changed.is_empty() {
        println!("  Field-level changes:");
        for p in &changed {
            for f in &p.fields {
                println!(
                    "    {:14} {:12} {:>10.1} -> {:<10.1} {:+.1}%  [{:?}]",
                    p.sku, f.field, f.before, f.after, f.percent_change, f.significance,
                );
            }
        }
        println!();
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}~", cut)
    }
}

/// Open alerts inferred from the current catalog: every product already in a
/// risky projected state is treated as having a live alert, so the analysis
/// can report resolutions when the import restocks it.
fn open_alerts_from_catalog(products: &[ProductSnapshot]) -> Vec<OpenAlert> {
    products
        .iter()
        .filter_map(|p| {
            let (status, _) = project_status(p, p.stock_units());
            if !status.is_risky() {
                return None;
            }
            let alert_type =
                if status == stockwatch_pipeline::import_analysis::ProjectedStatus::OutOfStock {
                    AlertType::OutOfStock
                } else {
                    AlertType::LowStock
                };
            Some(OpenAlert {
                sku: p.sku.clone(),
                alert_type,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn usage() -> ! {
    eprintln!("Usage: stockwatch-server <products.csv> <transactions.csv> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --import FILE   Analyze a proposed import CSV instead of running a review");
    eprintln!("  --top N         Number of top-risk products to return (default: 10)");
    eprintln!("  --min-score S   Minimum risk score for the review filter");
    eprintln!("  --as-of DATE    Reference date (YYYY-MM-DD, default: today)");
    eprintln!("  --config FILE   Engine configuration JSON");
    eprintln!("  --json          Output as JSON instead of formatted text");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  stockwatch-server fixtures/products.csv fixtures/transactions.csv");
    eprintln!("  stockwatch-server fixtures/products.csv fixtures/transactions.csv --top 5 --json");
    eprintln!("  stockwatch-server fixtures/products.csv fixtures/transactions.csv --import proposed.csv");
    process::exit(1);
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        usage();
    }

    let products_path = &args[1];
    let transactions_path = &args[2];

    let mut import_path: Option<String> = None;
    let mut top_k: usize = 10;
    let mut min_score: Option<f64> = None;
    let mut as_of: DateTime<Utc> = Utc::now();
    let mut config_path: Option<String> = None;
    let mut json_output = false;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--import" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --import requires a file path");
                    process::exit(1);
                }
                import_path = Some(args[i + 1].clone());
                i += 2;
            }
            "--top" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --top requires a number");
                    process::exit(1);
                }
                top_k = args[i + 1].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --top requires a positive integer");
                    process::exit(1);
                });
                i += 2;
            }
            "--min-score" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --min-score requires a number");
                    process::exit(1);
                }
                min_score = Some(args[i + 1].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --min-score requires a number");
                    process::exit(1);
                }));
                i += 2;
            }
            "--as-of" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --as-of requires a date (YYYY-MM-DD)");
                    process::exit(1);
                }
                let date = NaiveDate::parse_from_str(&args[i + 1], "%Y-%m-%d")
                    .unwrap_or_else(|_| {
                        eprintln!("Error: --as-of requires a date in YYYY-MM-DD form");
                        process::exit(1);
                    });
                as_of = date
                    .and_hms_opt(0, 0, 0)
                    .expect("midnight is a valid time")
                    .and_utc();
                i += 2;
            }
            "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    process::exit(1);
                }
                config_path = Some(args[i + 1].clone());
                i += 2;
            }
            "--json" => {
                json_output = true;
                i += 1;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                usage();
            }
        }
    }

    let config = match config_path {
        Some(ref path) => match EngineConfig::load(Path::new(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let load_start = Instant::now();
    let products = match load_catalog_file(products_path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error loading products CSV: {}", e);
            process::exit(1);
        }
    };
    let transactions = match load_transactions_file(transactions_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error loading transactions CSV: {}", e);
            process::exit(1);
        }
    };
    let load_ms = load_start.elapsed().as_millis();
    let catalog_size = products.len();

    if let Some(ref path) = import_path {
        let batch = match load_import_file(path) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("Error loading import CSV: {}", e);
                process::exit(1);
            }
        };
        let open_alerts = open_alerts_from_catalog(&products);
        let report = ImportImpactAnalyzer.analyze(&products, &batch, &open_alerts);
        let diff = generate_import_diff(&products, &batch.rows);

        if json_output {
            let out = ImportJson {
                generated_at: Utc::now().to_rfc3339(),
                analysis: report,
                diff,
            };
            println!("{}", serde_json::to_string_pretty(&out).unwrap());
        } else {
            print_import_human(&report, &diff);
        }
        return;
    }

    let pipeline_start = Instant::now();
    let pipeline =
        RiskReviewPipeline::with_config_and_size(products, transactions, &config, top_k);

    let mut query = ReviewQuery::for_client("review-001", "default", as_of);
    query.min_score = min_score;

    let result = match pipeline.execute(query.clone()).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error running review pipeline: {}", e);
            process::exit(1);
        }
    };
    let pipeline_ms = pipeline_start.elapsed().as_millis();

    if json_output {
        let review = build_review_json(&result, &query, catalog_size, pipeline_ms);
        println!("{}", serde_json::to_string_pretty(&review).unwrap());
    } else {
        print_review_human(&result, catalog_size, load_ms, pipeline_ms);
    }
}
