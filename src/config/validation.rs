//! Handler record validation.
//!
//! # Responsibilities
//! - Reject records that name both a file and a directory target
//! - Drop records that cannot route anything (no url, no target)
//! - Preserve source order, which is also match precedence
//!
//! # Design Decisions
//! - A conflict anywhere rejects the whole document, so a misconfigured
//!   file never yields a partial rule set
//! - Incomplete records are skipped silently (logged at debug), the way the
//!   hosting platform ignores script handlers and other non-static entries

use crate::config::loader::ConfigError;
use crate::config::schema::{HandlerRecord, Rule, RuleTarget};

/// Validate raw records into rules.
pub fn validate_records(records: Vec<HandlerRecord>) -> Result<Vec<Rule>, ConfigError> {
    let mut rules = Vec::with_capacity(records.len());

    for record in records {
        let static_files = record.static_files.filter(|s| !s.is_empty());
        let static_dir = record.static_dir.filter(|s| !s.is_empty());

        let target = match (static_files, static_dir) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ConflictingTargets { url: record.url });
            }
            (Some(files), None) => RuleTarget::Files(files),
            (None, Some(dir)) => RuleTarget::Dir(dir),
            (None, None) => {
                tracing::debug!(url = %record.url, "Skipping handler without static target");
                continue;
            }
        };

        if record.url.is_empty() {
            tracing::debug!("Skipping static handler without url");
            continue;
        }

        rules.push(Rule {
            url_pattern: record.url,
            target,
            mime_type: record.mime_type.filter(|m| !m.is_empty()),
            headers: record.http_headers,
        });
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, files: Option<&str>, dir: Option<&str>) -> HandlerRecord {
        HandlerRecord {
            url: url.to_string(),
            static_files: files.map(str::to_string),
            static_dir: dir.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_conflicting_targets_rejected() {
        let records = vec![
            record("/ok", None, Some("static")),
            record("/both", Some("a.txt"), Some("static")),
        ];
        let err = validate_records(records).unwrap_err();
        assert!(matches!(err, ConfigError::ConflictingTargets { ref url } if url == "/both"));
    }

    #[test]
    fn test_incomplete_records_dropped_in_order() {
        let records = vec![
            record("/a", None, Some("a")),
            record("/script", None, None),
            record("", Some("x.txt"), None),
            record("/b", Some("b.txt"), None),
        ];
        let rules = validate_records(records).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].url_pattern, "/a");
        assert_eq!(rules[0].target, RuleTarget::Dir("a".into()));
        assert_eq!(rules[1].url_pattern, "/b");
        assert_eq!(rules[1].target, RuleTarget::Files("b.txt".into()));
    }

    #[test]
    fn test_empty_strings_count_as_unset() {
        let records = vec![record("/a", Some(""), Some("dir"))];
        let rules = validate_records(records).unwrap();
        assert_eq!(rules[0].target, RuleTarget::Dir("dir".into()));
    }
}
