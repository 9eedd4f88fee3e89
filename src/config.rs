// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Database file; `None` means the platform data dir.
    pub db_path: Option<PathBuf>,
    /// Artificial delay applied before every facade call.
    pub latency: Duration,
    /// `EnvFilter` directive, e.g. `info` or `billbook=debug`.
    pub log_level: String,
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            latency: Duration::ZERO,
            log_level: "warn".to_string(),
            json_logs: false,
        }
    }
}

impl Config {
    /// # Environment Variables
    ///
    /// - `BILLBOOK_DB`: database file path
    /// - `BILLBOOK_LATENCY_MS`: facade delay in milliseconds (default: 0)
    /// - `BILLBOOK_LOG` or `RUST_LOG`: log filter (default: warn)
    /// - `BILLBOOK_JSON_LOGS`: emit JSON log lines (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|k| env::var(k).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        Self {
            db_path: get("BILLBOOK_DB")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            latency: get("BILLBOOK_LATENCY_MS")
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(d.latency),
            log_level: get("BILLBOOK_LOG")
                .or_else(|| get("RUST_LOG"))
                .unwrap_or(d.log_level),
            json_logs: get("BILLBOOK_JSON_LOGS")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(d.json_logs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_nothing_set() {
        let c = Config::from_lookup(|_| None);
        assert_eq!(c, Config::default());
    }

    #[test]
    fn reads_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BILLBOOK_DB", "/tmp/b.sqlite"),
            ("BILLBOOK_LATENCY_MS", "250"),
            ("RUST_LOG", "debug"),
            ("BILLBOOK_JSON_LOGS", "TRUE"),
        ]
        .into_iter()
        .collect();
        let c = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(c.db_path, Some(PathBuf::from("/tmp/b.sqlite")));
        assert_eq!(c.latency, Duration::from_millis(250));
        assert_eq!(c.log_level, "debug");
        assert!(c.json_logs);
    }

    #[test]
    fn bad_latency_falls_back() {
        let c = Config::from_lookup(|k| (k == "BILLBOOK_LATENCY_MS").then(|| "soon".to_string()));
        assert_eq!(c.latency, Duration::ZERO);
    }
}
