//! Config validation: unknown-key detection with "did you mean?" suggestions.
//!
//! The raw TOML is walked before serde sees it. Keys that do not belong to
//! [`super::SentinelConfig`] produce warnings only; a typo never stops the
//! relay from starting, it just falls back to the default for that field.

use std::collections::HashSet;

/// A non-fatal config warning.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

/// Tables whose keys are user-defined names rather than fixed fields.
const OPEN_TABLES: &[&str] = &["relay.services"];

/// Every fixed dotted key path in `SentinelConfig`.
///
/// Must be kept in step with the structs in `sentinel_config.rs`.
pub fn known_config_keys() -> HashSet<&'static str> {
    [
        "server",
        "server.addr",
        "retention",
        "retention.activity_capacity",
        "retention.insight_capacity",
        "relay",
        "relay.timeout_secs",
        "relay.target_template",
        "relay.services",
    ]
    .into_iter()
    .collect()
}

/// Collect all dotted key paths in a TOML tree.
///
/// `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let Some(table) = value.as_table() else {
        return Vec::new();
    };

    let mut keys = Vec::new();
    for (k, v) in table {
        let path = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };
        if v.is_table() {
            let nested = walk_toml_keys(v, &path);
            keys.push(path);
            keys.extend(nested);
        } else {
            keys.push(path);
        }
    }
    keys
}

/// Edit distance between two keys.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return a.len().max(b.len());
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ca != cb);
            row[j + 1] = substitution.min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Closest known key within three edits, if any.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (*k, edit_distance(unknown, k)))
        .filter(|(_, d)| *d <= 3)
        .min_by(|(ka, da), (kb, db)| da.cmp(db).then_with(|| ka.cmp(kb)))
        .map(|(k, _)| k.to_string())
}

/// Warnings for every unknown key in a raw TOML document.
///
/// Unparseable input yields no warnings; serde reports the parse error.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .filter(|key| {
            !OPEN_TABLES
                .iter()
                .any(|t| key.strip_prefix(t).is_some_and(|rest| rest.starts_with('.')))
        })
        .map(|key| ValidationWarning {
            message: format!("Unknown config key '{key}'"),
            suggestion: suggest_correction(&key, &known),
            field: key,
        })
        .collect()
}
