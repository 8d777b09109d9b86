//! Service health snapshot types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Status code reported for a service nobody has heard from yet.
pub const UNKNOWN_CODE: i64 = 0;

/// Health record for a single service.
///
/// `code` is an HTTP-style status code. Any other fields the reporter sent
/// alongside it are kept and echoed back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceHealth {
    #[serde(default)]
    pub code: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServiceHealth {
    pub fn new(code: i64) -> Self {
        Self {
            code,
            extra: Map::new(),
        }
    }

    /// Build a record from an arbitrary JSON value without rejecting it.
    ///
    /// Objects keep their non-`code` keys; a `code` given as a number or a
    /// numeric string is accepted. Anything else yields [`UNKNOWN_CODE`].
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::new(UNKNOWN_CODE);
        };

        let code = obj.get("code").map_or(UNKNOWN_CODE, |c| {
            c.as_i64()
                .or_else(|| c.as_f64().map(|f| f as i64))
                .or_else(|| c.as_str().and_then(|s| s.trim().parse().ok()))
                .unwrap_or(UNKNOWN_CODE)
        });

        let extra = obj
            .iter()
            .filter(|(k, _)| k.as_str() != "code")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self { code, extra }
    }
}

/// Current health of every reported service plus the time it was last replaced.
///
/// Serializes as `{ "services": { name: { "code": .. } }, "lastUpdated": .. }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealthSnapshot {
    pub services: BTreeMap<String, ServiceHealth>,
    pub last_updated: DateTime<Utc>,
}

impl ServiceHealthSnapshot {
    /// Snapshot with every known service at [`UNKNOWN_CODE`].
    pub fn with_services<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            services: names
                .into_iter()
                .map(|n| (n.into(), ServiceHealth::new(UNKNOWN_CODE)))
                .collect(),
            last_updated: Utc::now(),
        }
    }

    pub fn code_of(&self, service: &str) -> Option<i64> {
        self.services.get(service).map(|h| h.code)
    }
}
