// src/crawl/outcome.rs
// =============================================================================
// What a crawl task reports back about one address.
//
// Each task that gets as far as a fetch sends exactly one Outcome. Tasks
// that stop early (cancelled, too deep, address already claimed) send none.
//
// JSON shape (one object per line with --json):
//   {"outcome":"success","address":"...","title":"...","depth":1}
//   {"outcome":"failure","address":"...","depth":2,"cause":"HTTP 404 Not Found"}
// =============================================================================

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::FetchError;

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Success {
        address: String,
        title: String,
        depth: usize,
    },
    Failure {
        address: String,
        depth: usize,
        #[serde(serialize_with = "serialize_display")]
        cause: FetchError,
    },
}

impl Outcome {
    pub fn address(&self) -> &str {
        match self {
            Outcome::Success { address, .. } | Outcome::Failure { address, .. } => address,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success { address, title, .. } => write!(f, "{address} -> {title}"),
            Outcome::Failure { address, cause, .. } => write!(f, "{address} !! {cause}"),
        }
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_json() {
        let outcome = Outcome::Success {
            address: "https://a.test/".to_string(),
            title: "A".to_string(),
            depth: 0,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "outcome": "success",
                "address": "https://a.test/",
                "title": "A",
                "depth": 0,
            })
        );
    }

    #[test]
    fn test_failure_json_carries_cause_text() {
        let outcome = Outcome::Failure {
            address: "https://a.test/gone".to_string(),
            depth: 2,
            cause: FetchError::other("connection reset"),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "failure");
        assert_eq!(json["cause"], "connection reset");
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_display() {
        let outcome = Outcome::Success {
            address: "https://a.test/".to_string(),
            title: "A".to_string(),
            depth: 0,
        };
        assert_eq!(outcome.to_string(), "https://a.test/ -> A");
        assert_eq!(outcome.address(), "https://a.test/");
    }
}
