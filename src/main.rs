//! CLI entry point.
//!
//! Parses arguments, wires up logging and the shared analysis context, and
//! analyzes each URL in turn. Exit codes: 0 all analyzed and nothing High
//! Risk, 1 usage or analysis failure, 2 at least one High Risk verdict.

use clap::Parser;
use futures::future::join_all;
use log::error;

use riskprobe::aggregate::RiskLabel;
use riskprobe::initialization::{init_crypto_provider, init_logger_with};
use riskprobe::{run_analysis, AnalysisContext, Config};

#[tokio::main]
async fn main() {
    std::process::exit(run().await);
}

async fn run() -> i32 {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return i32::from(e.use_stderr());
        }
    };

    if let Err(e) = init_logger_with(config.log_level.into(), config.log_format) {
        eprintln!("failed to initialize logger: {}", e);
        return 1;
    }
    init_crypto_provider();

    let ctx = match AnalysisContext::new(&config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("initialization failed: {}", e);
            return 1;
        }
    };

    let mut any_failed = false;
    let mut any_high_risk = false;

    // Analyses run concurrently; output stays in input order
    let outcomes = join_all(config.urls.iter().map(|url| run_analysis(&ctx, url))).await;

    for (url, outcome) in config.urls.iter().zip(outcomes) {
        match outcome {
            Ok(report) => {
                if report.risk_label == RiskLabel::HighRisk {
                    any_high_risk = true;
                }
                if config.json {
                    match serde_json::to_string_pretty(&report) {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            error!("failed to serialize report for {}: {}", url, e);
                            any_failed = true;
                        }
                    }
                } else {
                    println!("{}", report.render_plain());
                }
            }
            Err(e) => {
                error!("analysis failed for {}: {:#}", url, e);
                any_failed = true;
            }
        }
    }

    if any_high_risk {
        2
    } else if any_failed {
        1
    } else {
        0
    }
}
