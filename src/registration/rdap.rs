//! RDAP lookup tier.
//!
//! RDAP is the primary registration source: structured JSON, consistent
//! field names, and an IANA-published bootstrap registry mapping each TLD to
//! its RDAP base URLs. The bootstrap document is fetched once per process
//! and held for the lifetime of the run.

use std::collections::HashMap;

use log::debug;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::config::RDAP_BOOTSTRAP_URL;
use crate::error_handling::{check_error, CheckErrorKind};

use super::parse::parse_date_string;
use super::types::RegistrationRecord;

static BOOTSTRAP: OnceCell<HashMap<String, String>> = OnceCell::const_new();

/// Queries RDAP for a domain. The returned record carries whatever the
/// registry exposed; `Err` holds a formatted error string when the tier
/// produced nothing at all.
pub(crate) async fn lookup_rdap(
    client: &reqwest::Client,
    domain: &str,
) -> Result<RegistrationRecord, String> {
    let tld = domain.rsplit('.').next().unwrap_or_default().to_lowercase();

    let base_urls = BOOTSTRAP
        .get_or_try_init(|| fetch_bootstrap(client))
        .await
        .map_err(|e| check_error(CheckErrorKind::RdapBootstrapError, &e))?;

    let base = base_urls.get(&tld).ok_or_else(|| {
        check_error(
            CheckErrorKind::RdapBootstrapError,
            &format!("no RDAP service registered for .{}", tld),
        )
    })?;

    let url = format!("{}domain/{}", base, domain);
    debug!("RDAP query: {url}");

    let response = client
        .get(&url)
        .header("Accept", "application/rdap+json")
        .send()
        .await
        .map_err(|e| check_error(CheckErrorKind::RdapQueryError, &e.to_string()))?;

    if !response.status().is_success() {
        return Err(check_error(
            CheckErrorKind::RdapQueryError,
            &format!("{} returned {}", url, response.status()),
        ));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| check_error(CheckErrorKind::RdapQueryError, &e.to_string()))?;

    Ok(parse_rdap_response(domain, &body))
}

async fn fetch_bootstrap(client: &reqwest::Client) -> Result<HashMap<String, String>, String> {
    let response = client
        .get(RDAP_BOOTSTRAP_URL)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let body: Value = response.json().await.map_err(|e| e.to_string())?;

    let mut map = HashMap::new();
    if let Some(services) = body.get("services").and_then(Value::as_array) {
        for service in services {
            let Some(entry) = service.as_array() else {
                continue;
            };
            let (Some(tlds), Some(urls)) = (
                entry.first().and_then(Value::as_array),
                entry.get(1).and_then(Value::as_array),
            ) else {
                continue;
            };
            let Some(base) = urls.iter().filter_map(Value::as_str).next() else {
                continue;
            };
            let base = if base.ends_with('/') {
                base.to_string()
            } else {
                format!("{}/", base)
            };
            for tld in tlds.iter().filter_map(Value::as_str) {
                map.insert(tld.to_lowercase(), base.clone());
            }
        }
    }

    if map.is_empty() {
        return Err("bootstrap registry contained no services".to_string());
    }
    debug!("RDAP bootstrap loaded: {} TLDs", map.len());
    Ok(map)
}

/// Walks an RDAP domain response into a [`RegistrationRecord`].
pub(crate) fn parse_rdap_response(domain: &str, body: &Value) -> RegistrationRecord {
    let mut record = RegistrationRecord::new(domain);

    record.registry_domain_id = body
        .get("handle")
        .and_then(Value::as_str)
        .map(|s| s.to_string());

    if let Some(events) = body.get("events").and_then(Value::as_array) {
        for event in events {
            let action = event.get("eventAction").and_then(Value::as_str);
            let date = event
                .get("eventDate")
                .and_then(Value::as_str)
                .and_then(parse_date_string);
            match action {
                Some("registration") => record.creation_date = record.creation_date.or(date),
                Some("expiration") => record.expiration_date = record.expiration_date.or(date),
                Some("last changed") | Some("last update of RDAP database") => {
                    record.updated_date = record.updated_date.or(date)
                }
                _ => {}
            }
        }
    }

    if let Some(statuses) = body.get("status").and_then(Value::as_array) {
        record.statuses = statuses
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.to_string())
            .collect();
    }

    if let Some(nameservers) = body.get("nameservers").and_then(Value::as_array) {
        record.nameservers = nameservers
            .iter()
            .filter_map(|ns| ns.get("ldhName").and_then(Value::as_str))
            .map(|s| s.to_lowercase())
            .collect();
    }

    record.dnssec = body
        .get("secureDNS")
        .and_then(|s| s.get("delegationSigned"))
        .and_then(Value::as_bool)
        .map(|signed| {
            if signed {
                "signedDelegation".to_string()
            } else {
                "unsigned".to_string()
            }
        });

    if let Some(entities) = body.get("entities").and_then(Value::as_array) {
        for entity in entities {
            apply_entity(&mut record, entity);
        }
    }

    record
}

/// Applies one RDAP entity (and its nested entities) to the record based on
/// its roles.
fn apply_entity(record: &mut RegistrationRecord, entity: &Value) {
    let roles: Vec<&str> = entity
        .get("roles")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if roles.contains(&"registrar") {
        if record.registrar.is_none() {
            record.registrar = vcard_text(entity, "fn");
        }
        if record.registrar_iana_id.is_none() {
            record.registrar_iana_id = entity
                .get("publicIds")
                .and_then(Value::as_array)
                .and_then(|ids| {
                    ids.iter().find_map(|id| {
                        let id_type = id.get("type").and_then(Value::as_str)?;
                        if id_type.contains("IANA") {
                            id.get("identifier").and_then(Value::as_str)
                        } else {
                            None
                        }
                    })
                })
                .map(|s| s.to_string());
        }
    }

    if roles.contains(&"registrant") {
        if record.registrant_org.is_none() {
            record.registrant_org = vcard_text(entity, "org").or_else(|| vcard_text(entity, "fn"));
        }
        if record.registrant_country.is_none() {
            record.registrant_country = vcard_country(entity);
        }
    }

    if roles.contains(&"abuse") {
        if record.registrar_abuse_email.is_none() {
            record.registrar_abuse_email = vcard_text(entity, "email");
            record.abuse_email = record.registrar_abuse_email.clone();
        }
        if record.registrar_abuse_phone.is_none() {
            record.registrar_abuse_phone =
                vcard_text(entity, "tel").map(|t| t.trim_start_matches("tel:").to_string());
        }
    }

    if roles.contains(&"administrative") && record.admin_email.is_none() {
        record.admin_email = vcard_text(entity, "email");
    }

    if roles.contains(&"technical") && record.tech_email.is_none() {
        record.tech_email = vcard_text(entity, "email");
    }

    if let Some(nested) = entity.get("entities").and_then(Value::as_array) {
        for child in nested {
            apply_entity(record, child);
        }
    }
}

/// Pulls the value of a named vCard property from an entity's vcardArray.
fn vcard_text(entity: &Value, property: &str) -> Option<String> {
    let items = entity
        .get("vcardArray")
        .and_then(Value::as_array)?
        .get(1)
        .and_then(Value::as_array)?;

    items.iter().find_map(|item| {
        let item = item.as_array()?;
        if item.first()?.as_str()? != property {
            return None;
        }
        item.get(3)?
            .as_str()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Country lives in slot 6 of the vCard adr structured value.
fn vcard_country(entity: &Value) -> Option<String> {
    let items = entity
        .get("vcardArray")
        .and_then(Value::as_array)?
        .get(1)
        .and_then(Value::as_array)?;

    items.iter().find_map(|item| {
        let item = item.as_array()?;
        if item.first()?.as_str()? != "adr" {
            return None;
        }
        item.get(3)?
            .as_array()?
            .get(6)?
            .as_str()
            .map(|s| s.to_string())
            .filter(|s| !s.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_response() -> Value {
        json!({
            "handle": "2336799_DOMAIN_COM-VRSN",
            "events": [
                {"eventAction": "registration", "eventDate": "1995-08-14T04:00:00Z"},
                {"eventAction": "expiration", "eventDate": "2026-08-13T04:00:00Z"},
                {"eventAction": "last changed", "eventDate": "2024-08-14T07:01:44Z"}
            ],
            "status": ["client delete prohibited", "client transfer prohibited"],
            "nameservers": [
                {"ldhName": "A.IANA-SERVERS.NET"},
                {"ldhName": "B.IANA-SERVERS.NET"}
            ],
            "secureDNS": {"delegationSigned": true},
            "entities": [
                {
                    "roles": ["registrar"],
                    "vcardArray": ["vcard", [
                        ["version", {}, "text", "4.0"],
                        ["fn", {}, "text", "Example Registrar LLC"]
                    ]],
                    "publicIds": [
                        {"type": "IANA Registrar ID", "identifier": "376"}
                    ],
                    "entities": [
                        {
                            "roles": ["abuse"],
                            "vcardArray": ["vcard", [
                                ["fn", {}, "text", "Abuse Desk"],
                                ["email", {}, "text", "abuse@registrar.example"],
                                ["tel", {"type": "voice"}, "uri", "tel:+1.5555551234"]
                            ]]
                        }
                    ]
                },
                {
                    "roles": ["registrant"],
                    "vcardArray": ["vcard", [
                        ["fn", {}, "text", "Example Org"],
                        ["adr", {}, "text", ["", "", "", "", "", "", "US"]]
                    ]]
                }
            ]
        })
    }

    #[test]
    fn test_parse_rdap_events() {
        let record = parse_rdap_response("example.com", &sample_response());
        assert!(record
            .creation_date
            .unwrap()
            .format("%Y")
            .to_string()
            .starts_with("1995"));
        assert!(record.expiration_date.is_some());
        assert!(record.updated_date.is_some());
    }

    #[test]
    fn test_parse_rdap_registrar_entity() {
        let record = parse_rdap_response("example.com", &sample_response());
        assert_eq!(record.registrar.as_deref(), Some("Example Registrar LLC"));
        assert_eq!(record.registrar_iana_id.as_deref(), Some("376"));
    }

    #[test]
    fn test_parse_rdap_nested_abuse_entity() {
        let record = parse_rdap_response("example.com", &sample_response());
        assert_eq!(
            record.registrar_abuse_email.as_deref(),
            Some("abuse@registrar.example")
        );
        assert_eq!(
            record.registrar_abuse_phone.as_deref(),
            Some("+1.5555551234")
        );
    }

    #[test]
    fn test_parse_rdap_registrant_country_from_adr() {
        let record = parse_rdap_response("example.com", &sample_response());
        assert_eq!(record.registrant_org.as_deref(), Some("Example Org"));
        assert_eq!(record.registrant_country.as_deref(), Some("US"));
    }

    #[test]
    fn test_parse_rdap_dnssec_and_nameservers() {
        let record = parse_rdap_response("example.com", &sample_response());
        assert_eq!(record.dnssec.as_deref(), Some("signedDelegation"));
        assert_eq!(
            record.nameservers,
            vec!["a.iana-servers.net", "b.iana-servers.net"]
        );
        assert_eq!(record.statuses.len(), 2);
    }

    #[test]
    fn test_parse_rdap_empty_response() {
        let record = parse_rdap_response("example.com", &json!({}));
        assert!(record.registrar.is_none());
        assert!(record.creation_date.is_none());
        assert!(record.statuses.is_empty());
    }
}
