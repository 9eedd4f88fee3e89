// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Installs the global subscriber, writing to stderr so table and JSON
/// output on stdout stay clean. Calling it twice is harmless.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    let res = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
