// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Environment-backed configuration.
//!
//! Every value has a default; malformed numeric values fall back rather than
//! abort. CLI flags (see `main.rs`) override the environment.

use std::env;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_KROKI_BASE_URL: &str = "https://kroki.io";
pub const DEFAULT_SYNTAX_DIR: &str = "syntax";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("production") => Self::Production,
            _ => Self::Development,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub kroki_base_url: String,
    pub syntax_dir: String,
    pub environment: Environment,
}

impl ServerConfig {
    /// Reads `PORT`, `KROKI_BASE_URL`, `NAIAD_SYNTAX_DIR` and `ENV`.
    pub fn from_env() -> Self {
        Self {
            port: parse_port(env::var("PORT").ok().as_deref()),
            kroki_base_url: non_empty(env::var("KROKI_BASE_URL").ok())
                .unwrap_or_else(|| DEFAULT_KROKI_BASE_URL.to_owned()),
            syntax_dir: non_empty(env::var("NAIAD_SYNTAX_DIR").ok())
                .unwrap_or_else(|| DEFAULT_SYNTAX_DIR.to_owned()),
            environment: Environment::parse(env::var("ENV").ok().as_deref()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn parse_port(value: Option<&str>) -> u16 {
    value.and_then(|value| value.parse().ok()).unwrap_or(DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, DEFAULT_PORT)]
    #[case(Some("8080"), 8080)]
    #[case(Some(""), DEFAULT_PORT)]
    #[case(Some("not-a-port"), DEFAULT_PORT)]
    #[case(Some("70000"), DEFAULT_PORT)]
    fn port_parsing_falls_back_on_bad_input(#[case] raw: Option<&str>, #[case] expected: u16) {
        assert_eq!(parse_port(raw), expected);
    }

    #[rstest]
    #[case(None, Environment::Development)]
    #[case(Some("development"), Environment::Development)]
    #[case(Some("production"), Environment::Production)]
    #[case(Some("staging"), Environment::Development)]
    fn environment_defaults_to_development(
        #[case] raw: Option<&str>,
        #[case] expected: Environment,
    ) {
        assert_eq!(Environment::parse(raw), expected);
    }

    #[test]
    fn empty_env_values_fall_back_to_defaults() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("https://kroki.local".to_owned())).as_deref(), Some("https://kroki.local"));
        assert_eq!(non_empty(None), None);
    }
}
