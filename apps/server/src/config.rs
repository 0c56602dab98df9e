// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Directory holding uploaded models, part tags and saved builds.
    pub data_dir: String,
    /// Maximum upload size in MB.
    pub max_file_size_mb: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Allowed CORS origins (comma-separated, or "*" for all in development).
    pub cors_origins: Vec<String>,
    /// Parsed models kept in memory.
    pub asset_cache_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .unwrap_or(8080),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| {
                // Docker: /app/data (created in the image); local dev: ./.data
                if std::path::Path::new("/.dockerenv").exists() {
                    "/app/data".into()
                } else {
                    std::env::current_dir()
                        .ok()
                        .and_then(|dir| dir.join(".data").to_str().map(|s| s.to_string()))
                        .unwrap_or_else(|| "./.data".into())
                }
            }),
            max_file_size_mb: std::env::var("MAX_FILE_SIZE_MB")
                .unwrap_or_else(|_| "200".into())
                .parse()
                .unwrap_or(200),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".into())
                .parse()
                .unwrap_or(120),
            cors_origins: parse_origins(&std::env::var("CORS_ORIGINS").unwrap_or_else(|_| {
                "http://localhost:3000,http://localhost:5173,http://127.0.0.1:3000,http://127.0.0.1:5173"
                    .into()
            })),
            asset_cache_size: std::env::var("ASSET_CACHE_SIZE")
                .unwrap_or_else(|_| "32".into())
                .parse()
                .unwrap_or(32),
        }
    }

    /// Upload limit in bytes.
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    /// `*` anywhere in the origin list allows every origin.
    pub fn cors_permissive(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
