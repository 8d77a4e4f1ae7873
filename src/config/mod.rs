// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Environment-derived settings for the orchestrator and agent binaries.
//!
//! Every knob falls back to a documented default when the variable is
//! missing, unparsable, or below 1; a warning is logged so a bad deployment
//! is visible without failing startup.

use tracing::warn;

use crate::engine::task::Operation;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_OPERATION_TIME_MS: u64 = 2000;
pub const DEFAULT_ORCHESTRATOR_URL: &str = "http://localhost:8080";
pub const DEFAULT_COMPUTING_POWER: usize = 10;

/// Modeled per-operation latency in milliseconds, handed to workers with
/// each claimed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTimes {
    pub addition: u64,
    pub subtraction: u64,
    pub multiplication: u64,
    pub division: u64,
}

impl OperationTimes {
    pub fn for_operation(&self, operation: Operation) -> u64 {
        match operation {
            Operation::Add => self.addition,
            Operation::Sub => self.subtraction,
            Operation::Mul => self.multiplication,
            Operation::Div => self.division,
        }
    }
}

impl Default for OperationTimes {
    fn default() -> Self {
        Self {
            addition: DEFAULT_OPERATION_TIME_MS,
            subtraction: DEFAULT_OPERATION_TIME_MS,
            multiplication: DEFAULT_OPERATION_TIME_MS,
            division: DEFAULT_OPERATION_TIME_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub port: u16,
    pub operation_times: OperationTimes,
}

impl OrchestratorConfig {
    pub fn from_env() -> Self {
        Self {
            port: positive_or_default("PORT", std::env::var("PORT").ok(), DEFAULT_PORT as u64)
                as u16,
            operation_times: OperationTimes {
                addition: positive_or_default(
                    "TIME_ADDITION",
                    std::env::var("TIME_ADDITION").ok(),
                    DEFAULT_OPERATION_TIME_MS,
                ),
                subtraction: positive_or_default(
                    "TIME_SUBTRACTION",
                    std::env::var("TIME_SUBTRACTION").ok(),
                    DEFAULT_OPERATION_TIME_MS,
                ),
                multiplication: positive_or_default(
                    "TIME_MULTIPLICATION",
                    std::env::var("TIME_MULTIPLICATION").ok(),
                    DEFAULT_OPERATION_TIME_MS,
                ),
                division: positive_or_default(
                    "TIME_DIVISION",
                    std::env::var("TIME_DIVISION").ok(),
                    DEFAULT_OPERATION_TIME_MS,
                ),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub orchestrator_url: String,
    pub computing_power: usize,
}

impl AgentConfig {
    pub fn from_env() -> Self {
        let orchestrator_url = std::env::var("ORCHESTRATOR_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ORCHESTRATOR_URL.to_owned());
        let computing_power = positive_or_default(
            "COMPUTING_POWER",
            std::env::var("COMPUTING_POWER").ok(),
            DEFAULT_COMPUTING_POWER as u64,
        ) as usize;
        Self {
            orchestrator_url,
            computing_power,
        }
    }
}

/// Parse an integer setting, falling back to `default` when the value is
/// absent, unparsable, or below 1.
fn positive_or_default(key: &str, raw: Option<String>, default: u64) -> u64 {
    match raw {
        None => default,
        Some(value) => match value.trim().parse::<u64>() {
            Ok(parsed) if parsed >= 1 => parsed,
            Ok(_) => {
                warn!(%key, %value, default, "setting below 1, using default");
                default
            }
            Err(_) => {
                warn!(%key, %value, default, "unparsable setting, using default");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_uses_default() {
        assert_eq!(positive_or_default("PORT", None, 8080), 8080);
    }

    #[test]
    fn valid_value_is_used() {
        assert_eq!(
            positive_or_default("TIME_ADDITION", Some("150".into()), 2000),
            150
        );
    }

    #[test]
    fn zero_and_negative_fall_back() {
        assert_eq!(
            positive_or_default("TIME_DIVISION", Some("0".into()), 2000),
            2000
        );
        assert_eq!(
            positive_or_default("TIME_DIVISION", Some("-5".into()), 2000),
            2000
        );
    }

    #[test]
    fn unparsable_value_falls_back() {
        assert_eq!(
            positive_or_default("COMPUTING_POWER", Some("many".into()), 10),
            10
        );
    }

    #[test]
    fn operation_times_map_by_operation() {
        let times = OperationTimes {
            addition: 1,
            subtraction: 2,
            multiplication: 3,
            division: 4,
        };
        assert_eq!(times.for_operation(Operation::Add), 1);
        assert_eq!(times.for_operation(Operation::Sub), 2);
        assert_eq!(times.for_operation(Operation::Mul), 3);
        assert_eq!(times.for_operation(Operation::Div), 4);
    }
}
