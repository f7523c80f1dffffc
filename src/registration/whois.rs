//! Port-43 WHOIS fallback tier.
//!
//! Used when RDAP produces nothing or leaves key fields empty. The TLD's
//! WHOIS server is discovered through a referral query against
//! whois.iana.org and cached per process; one registrar-level referral is
//! followed when the registry response names a more specific server.

use std::collections::HashMap;
use std::time::Duration;

use log::debug;
use rand::Rng;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::Retry;

use crate::config::{IANA_WHOIS_HOST, WHOIS_QUERY_TIMEOUT_SECS, WHOIS_RETRY_ATTEMPTS};
use crate::error_handling::{check_error, CheckErrorKind};

use super::parse::parse_whois_text;
use super::types::RegistrationRecord;

static SERVER_CACHE: Mutex<Option<HashMap<String, String>>> = Mutex::const_new(None);

/// Queries WHOIS for a domain over port 43.
///
/// `Err` carries a formatted error string when no response could be
/// obtained; a response that parses to an empty record is still `Ok`.
pub(crate) async fn lookup_whois(domain: &str) -> Result<RegistrationRecord, String> {
    let tld = domain.rsplit('.').next().unwrap_or_default().to_lowercase();

    let server = discover_server(&tld)
        .await
        .map_err(|e| check_error(CheckErrorKind::WhoisQueryError, &e))?;

    debug!("WHOIS query for {} via {}", domain, server);
    let mut text = Retry::spawn(retry_strategy(), || query_server(&server, domain))
        .await
        .map_err(|e| check_error(CheckErrorKind::WhoisQueryError, &e))?;

    // Thin registries (notably .com/.net) answer with a stub that points at
    // the registrar's own server. One hop is enough.
    if let Some(referral) = referral_server(&text) {
        if !referral.eq_ignore_ascii_case(&server) {
            debug!("WHOIS referral for {}: {}", domain, referral);
            match query_server(&referral, domain).await {
                Ok(registrar_text) => text = registrar_text,
                Err(e) => debug!("WHOIS referral to {} failed: {}", referral, e),
            }
        }
    }

    if text.trim().is_empty() {
        return Err(check_error(
            CheckErrorKind::WhoisParseError,
            &format!("{} returned an empty response", server),
        ));
    }

    Ok(parse_whois_text(domain, &text))
}

/// Exponential backoff with a little jitter so retries against a throttling
/// registry do not land in lockstep.
fn retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(250)
        .map(|delay| delay + Duration::from_millis(rand::rng().random_range(0..100)))
        .take(WHOIS_RETRY_ATTEMPTS)
}

/// Resolves the WHOIS server responsible for a TLD, caching hits.
async fn discover_server(tld: &str) -> Result<String, String> {
    {
        let cache = SERVER_CACHE.lock().await;
        if let Some(server) = cache.as_ref().and_then(|m| m.get(tld)) {
            return Ok(server.clone());
        }
    }

    let response = query_server(IANA_WHOIS_HOST, tld).await?;
    let server = iana_whois_server(&response)
        .ok_or_else(|| format!("IANA lists no WHOIS server for .{}", tld))?;

    let mut cache = SERVER_CACHE.lock().await;
    cache
        .get_or_insert_with(HashMap::new)
        .insert(tld.to_string(), server.clone());
    Ok(server)
}

/// One WHOIS exchange: connect, send the query line, read to EOF.
async fn query_server(server: &str, query: &str) -> Result<String, String> {
    let deadline = Duration::from_secs(WHOIS_QUERY_TIMEOUT_SECS);

    let mut stream = timeout(deadline, TcpStream::connect((server, 43)))
        .await
        .map_err(|_| format!("connection to {} timed out", server))?
        .map_err(|e| format!("connection to {} failed: {}", server, e))?;

    stream
        .write_all(format!("{}\r\n", query).as_bytes())
        .await
        .map_err(|e| format!("write to {} failed: {}", server, e))?;

    let mut buf = Vec::new();
    timeout(deadline, stream.read_to_end(&mut buf))
        .await
        .map_err(|_| format!("read from {} timed out", server))?
        .map_err(|e| format!("read from {} failed: {}", server, e))?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Extracts the "whois:" server from an IANA TLD referral response.
fn iana_whois_server(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let line = line.trim();
        line.strip_prefix("whois:")
            .map(|rest| rest.trim().to_lowercase())
            .filter(|s| !s.is_empty())
    })
}

/// Extracts the registrar WHOIS server from a thin-registry response.
fn referral_server(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let line = line.trim();
        let rest = line
            .strip_prefix("Registrar WHOIS Server:")
            .or_else(|| line.strip_prefix("Whois Server:"))?;
        let server = rest
            .trim()
            .trim_start_matches("whois://")
            .trim_end_matches('/')
            .to_lowercase();
        if server.is_empty() {
            None
        } else {
            Some(server)
        }
    })
}
