use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// One unit of input: a numeric vector or a line of text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum InstanceValue {
    Numbers(Vec<f64>),
    Text(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RequestPayload {
    pub instances: Vec<InstanceValue>,
}

/// Body accepted by the relay, once any `body` wrapper has been removed.
#[derive(Deserialize, Debug, Validate)]
pub struct InstancesBody {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub instances: Vec<Value>,
}

/// A single classifier result. Both fields are optional and loosely typed:
/// BlazingText answers with `{"label": ["__label__positive"], "prob": [0.97]}`
/// while other endpoints use plain strings and numbers.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Prediction {
    #[serde(default)]
    pub label: Option<Value>,
    #[serde(default)]
    pub prob: Option<Value>,
}

impl Prediction {
    /// Anything that is not an object carries neither label nor probability.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => Prediction::deserialize(value).unwrap_or_default(),
            _ => Prediction::default(),
        }
    }

    /// Trimmed label text, `None` when the label is absent or falsy.
    pub fn label_text(&self) -> Option<String> {
        let label = self.label.as_ref()?;
        if !is_truthy(label) {
            return None;
        }
        Some(display_value(label).trim().to_string())
    }

    /// Probability in `0..=1`. A list contributes its first element. Only a
    /// bare numeric zero counts as absent; `"0"` and `[0]` are truthy values
    /// and display as `0.00%`.
    pub fn probability(&self) -> Option<f64> {
        let (prob, truthy_container) = match self.prob.as_ref()? {
            Value::Array(items) => (items.first()?, true),
            other => (other, false),
        };
        let p = match prob {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        if !p.is_finite() {
            return None;
        }
        let bare_string = matches!(prob, Value::String(_));
        (p != 0.0 || truthy_container || bare_string).then_some(p)
    }
}

/// The `{statusCode, body}` object produced by the relay. `body` is JSON text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub status_code: u16,
    pub body: String,
}

impl Envelope {
    pub fn predictions(predictions: Value) -> Self {
        Self {
            status_code: 200,
            body: serde_json::json!({ "predictions": predictions }).to_string(),
        }
    }

    pub fn error(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }
}

/// Truthiness as a browser script sees it: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Plain-text form of a JSON value: strings unquoted, integral numbers
/// without a fraction, arrays comma-joined, objects as compact JSON.
/// Very large or small floats print positionally, never as `1e21`/`1e-7`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) if f.fract() == 0.0 => format!("{f:.0}"),
            (_, _, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}
