use std::path::Path;

use serde::Deserialize;

use crate::AuthlensError;

/// Failed attempts at or above this mark an account as high-risk.
pub const HIGH_RISK_ATTEMPT_THRESHOLD: i64 = 5;

/// Reason substrings that mark a login event as suspicious. Matching is
/// plain lowercase containment, not regex; `--` will also hit benign
/// comment markers, which is a known and accepted false-positive source.
pub const SUSPICIOUS_REASON_PATTERNS: &[&str] = &[
    "sql_injection_possible",
    "' or 1=1",
    "--",
    "/*",
    "union select",
];

fn default_threshold() -> i64 {
    HIGH_RISK_ATTEMPT_THRESHOLD
}

fn default_patterns() -> Vec<String> {
    SUSPICIOUS_REASON_PATTERNS
        .iter()
        .map(|p| (*p).to_owned())
        .collect()
}

/// Tunables for the risk classifier. Patterns are matched against the
/// reason text case-insensitively.
#[derive(Clone, Debug, Deserialize)]
pub struct RiskConfig {
    #[serde(default = "default_threshold")]
    pub failed_attempt_threshold: i64,
    #[serde(default = "default_patterns")]
    pub suspicious_patterns: Vec<String>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            failed_attempt_threshold: default_threshold(),
            suspicious_patterns: default_patterns(),
        }
    }
}

impl RiskConfig {
    pub fn load(path: &Path) -> Result<Self, AuthlensError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }
}
