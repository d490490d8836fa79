use std::{fmt, str::FromStr};

use crate::error::ConfigError;

/// Which of the two deployments is being served: numeric CSV for the
/// regression model, one-instance-per-line text for the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    NumericCsv,
    TextLines,
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" | "csv" => Ok(Variant::NumericCsv),
            "text" | "lines" => Ok(Variant::TextLines),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::NumericCsv => f.write_str("numeric"),
            Variant::TextLines => f.write_str("text"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppCfg {
    pub api_url: String,
    pub variant: Variant,
}

#[derive(Clone, Debug)]
pub struct RelayCfg {
    pub upstream_url: String,
    pub variant: Variant,
    pub bind_addr: String,
    pub workers: usize,
}
