//! riskprobe analyzes URLs and hostnames for phishing and trustworthiness
//! risk.
//!
//! Each input runs through independent checkers (TLS certificate posture,
//! domain registration history, Unicode confusability, security headers,
//! keyword and brand rules, and an optional ML scorer). The aggregator folds
//! their outputs into one score, label, and reason list; results are cached
//! per normalized URL for a bounded window.
//!
//! Checkers are total: network and parse failures become entries in the
//! record's `errors` vector, never an `Err` to the pipeline, so a verdict
//! can always be formed from whatever succeeded.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod confusability;
pub mod domain;
pub mod error_handling;
pub mod headers;
pub mod initialization;
pub mod keywords;
pub mod ml;
pub mod normalize;
pub mod registration;
pub mod report;
pub mod rules;
pub mod tls;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::{debug, info, warn};
use tldextract::{TldExtractor, TldOption};
use url::Url;

pub use config::Config;
pub use report::AnalysisReport;

use cache::ResultCache;
use error_handling::{check_error, CheckErrorKind, InitializationError};
use ml::LinearModel;
use registration::RegistrationRecord;
use report::{CheckResults, CheckerTimings};
use tls::CertificateRecord;

/// Shared resources for the lifetime of the process: HTTP clients, the PSL
/// extractor, the result cache, and the optional ML model.
pub struct AnalysisContext {
    pub client: Arc<reqwest::Client>,
    pub rdap_client: Arc<reqwest::Client>,
    pub extractor: TldExtractor,
    pub cache: ResultCache,
    pub model: Option<LinearModel>,
    pub checker_timeout: Duration,
}

impl AnalysisContext {
    /// Builds the context from the parsed configuration.
    ///
    /// # Errors
    ///
    /// Returns an [`InitializationError`] when an HTTP client cannot be
    /// constructed.
    pub fn new(config: &Config) -> Result<Self, InitializationError> {
        Ok(AnalysisContext {
            client: initialization::init_client(config)?,
            rdap_client: initialization::init_rdap_client(config)?,
            extractor: TldOption::default().build(),
            cache: ResultCache::new(Duration::from_secs(config.cache_ttl_secs)),
            model: (!config.no_ml).then(LinearModel::calibrated),
            checker_timeout: Duration::from_secs(config.timeout_seconds),
        })
    }
}

/// Analyzes one URL or hostname end to end.
///
/// The pure checkers (confusability, keywords, rules) run inline; the
/// network checkers run concurrently, each bounded by the configured
/// timeout. A checker that times out contributes its default record with a
/// timeout entry in `errors` instead of stalling the verdict.
///
/// # Errors
///
/// Returns an error only when the input fails normalization; every other
/// failure is carried inside the report.
pub async fn run_analysis(ctx: &AnalysisContext, input: &str) -> Result<AnalysisReport> {
    let target = normalize::normalize_target(input);
    if !target.valid {
        anyhow::bail!("invalid input {:?}: {}", input, target.errors.join("; "));
    }

    if let Some(cached) = ctx.cache.get(&target.url) {
        debug!("returning cached verdict for {}", target.url);
        return Ok(cached);
    }

    // Failure to derive a registrable domain (IP literals, bare suffixes)
    // skips the registration lookup rather than failing the analysis.
    let registrable: Result<String, String> = if target.is_ip {
        Err("IP addresses have no registration".to_string())
    } else {
        domain::registrable_domain(&ctx.extractor, &target.host).map_err(|e| e.to_string())
    };
    let base_label = domain::base_label(&ctx.extractor, &target.host);

    let started = Instant::now();
    let idn = confusability::analyze(&target.host, Some(&target.url));
    let idn_ms = elapsed_ms(started);

    let started = Instant::now();
    let keywords = keywords::check_keywords(&target.url);
    let keywords_ms = elapsed_ms(started);

    let started = Instant::now();
    let path = Url::parse(&target.url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| "/".to_string());
    let rules = rules::check_rules(&target.host, &path, base_label.as_deref());
    let rules_ms = elapsed_ms(started);

    let limit = ctx.checker_timeout;

    let ssl_task = async {
        let started = Instant::now();
        let record = match tokio::time::timeout(limit, tls::inspect_certificate(&target.host))
            .await
        {
            Ok(record) => record,
            Err(_) => {
                let mut record = CertificateRecord::default();
                record.errors.push(check_error(
                    CheckErrorKind::CheckerTimeout,
                    "certificate inspection",
                ));
                record
            }
        };
        (record, elapsed_ms(started))
    };

    let registration_task = async {
        let started = Instant::now();
        let record = match &registrable {
            Ok(domain) => {
                match tokio::time::timeout(
                    limit,
                    registration::check_registration(&ctx.rdap_client, domain),
                )
                .await
                {
                    Ok(record) => record,
                    Err(_) => {
                        let mut record = RegistrationRecord::new(domain);
                        record.errors.push(check_error(
                            CheckErrorKind::CheckerTimeout,
                            "registration lookup",
                        ));
                        record
                    }
                }
            }
            Err(reason) => {
                let mut record = RegistrationRecord::new(&target.host);
                record
                    .errors
                    .push(check_error(CheckErrorKind::InvalidInput, reason));
                record
            }
        };
        (record, elapsed_ms(started))
    };

    let headers_task = async {
        let started = Instant::now();
        let record = match tokio::time::timeout(
            limit,
            headers::check_headers(&ctx.client, &target.url),
        )
        .await
        {
            Ok(record) => record,
            Err(_) => {
                let mut record = headers::HeaderReport {
                    url: target.url.clone(),
                    ..Default::default()
                };
                record
                    .errors
                    .push(check_error(CheckErrorKind::CheckerTimeout, "header fetch"));
                record
            }
        };
        (record, elapsed_ms(started))
    };

    let ((ssl, ssl_ms), (registration, registration_ms), (headers, headers_ms)) =
        tokio::join!(ssl_task, registration_task, headers_task);

    let started = Instant::now();
    let ml = match &ctx.model {
        Some(model) => {
            match ml::score_url(
                &target.url,
                Some(&rules),
                registrable.as_deref().ok(),
                Some(model),
            ) {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!("ML scoring skipped for {}: {}", target.url, e);
                    None
                }
            }
        }
        None => None,
    };
    let ml_ms = elapsed_ms(started);

    let verdict = aggregate::aggregate(&ssl, &registration, &idn, &rules);
    info!(
        "{} scored {} ({})",
        target.url,
        verdict.score,
        verdict.label.as_str()
    );

    let results = CheckResults {
        ssl,
        registration,
        idn,
        rules,
        keywords,
        headers,
        ml,
    };
    let timings = CheckerTimings {
        ssl_ms,
        registration_ms,
        idn_ms,
        rules_ms,
        keywords_ms,
        headers_ms,
        ml_ms,
    };

    let report = AnalysisReport::assemble(&target.url, results, timings, verdict);
    ctx.cache.set(&target.url, report.clone());
    Ok(report)
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
