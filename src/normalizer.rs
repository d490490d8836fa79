use crate::app_cfg::Variant;
use crate::error::ParseError;
use crate::models::{InstanceValue, RequestPayload};

impl Variant {
    /// Turn already-trimmed user input into the request payload.
    pub fn normalize(&self, raw: &str) -> Result<RequestPayload, ParseError> {
        match self {
            Variant::NumericCsv => parse_csv_input(raw),
            Variant::TextLines => parse_text_input(raw),
        }
    }
}

/// All numbers form one instance: `{"instances": [[n1, n2, ...]]}`.
pub fn parse_csv_input(raw: &str) -> Result<RequestPayload, ParseError> {
    let numbers = raw
        .split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| ParseError::InvalidNumber(token.to_string()))
        })
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(RequestPayload {
        instances: vec![InstanceValue::Numbers(numbers)],
    })
}

/// Every non-blank line is its own instance.
pub fn parse_text_input(raw: &str) -> Result<RequestPayload, ParseError> {
    let instances: Vec<InstanceValue> = raw
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| InstanceValue::Text(line.to_string()))
        .collect();

    if instances.is_empty() {
        return Err(ParseError::NoInstances);
    }
    Ok(RequestPayload { instances })
}
