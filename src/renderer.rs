use serde_json::Value;

use crate::app_cfg::Variant;
use crate::models::{display_value, is_truthy, Prediction};

pub const BODY_PARSE_ERROR: &str = "<p>Error parsing response body.</p>";
const NO_PREDICTIONS_ROW: &str = "<tr><td colspan='2'>No predictions found</td></tr>";

impl Variant {
    /// Render a decoded endpoint response as an HTML table.
    pub fn render(&self, response: &Value) -> String {
        render(*self, response)
    }

    fn render_row(&self, prediction: &Value, label: &str) -> String {
        match self {
            Variant::NumericCsv => format!(
                "<tr><td>Prediction</td><td>{}</td></tr>",
                escape_html(&display_value(prediction))
            ),
            Variant::TextLines => {
                let prediction = Prediction::from_value(prediction);
                log::debug!("Prediction object: {prediction:?}");
                format!(
                    "<tr><td>{}</td><td>{} (Confidence: {})</td></tr>",
                    escape_html(label),
                    escape_html(&friendly_label(prediction.label_text().as_deref())),
                    confidence(prediction.probability()),
                )
            }
        }
    }
}

pub fn render(variant: Variant, response: &Value) -> String {
    let decoded: Value;
    let payload = match response.get("body") {
        Some(Value::String(body)) if !body.is_empty() => match serde_json::from_str::<Value>(body) {
            Ok(v) => {
                decoded = v;
                &decoded
            }
            Err(err) => {
                log::error!("Failed to parse response body: {err}");
                return BODY_PARSE_ERROR.to_string();
            }
        },
        Some(body) if is_truthy(body) => body,
        _ => response,
    };

    let mut table = String::from("<table>");
    match payload.get("predictions") {
        Some(Value::Array(predictions)) => {
            for (index, item) in predictions.iter().enumerate() {
                match item {
                    Value::Array(nested) => {
                        for (sub_index, prediction) in nested.iter().enumerate() {
                            let label = format!("Input #{} - {}", index + 1, sub_index + 1);
                            table.push_str(&variant.render_row(prediction, &label));
                        }
                    }
                    prediction => {
                        let label = format!("Input #{}", index + 1);
                        table.push_str(&variant.render_row(prediction, &label));
                    }
                }
            }
        }
        _ => table.push_str(NO_PREDICTIONS_ROW),
    }
    table.push_str("</table>");
    table
}

/// Map a raw classifier label onto `Positive`/`Negative`, first match wins.
/// `LABEL_1`/`LABEL_0` are the generic binary sentiment classes.
pub fn friendly_label(label: Option<&str>) -> String {
    let raw = label.map(str::trim).unwrap_or("Unknown");
    let lowered = raw.to_lowercase();
    if lowered == "label_1" || lowered.contains("positive") {
        "Positive".to_string()
    } else if lowered == "label_0" || lowered.contains("negative") {
        "Negative".to_string()
    } else {
        raw.to_string()
    }
}

pub fn confidence(prob: Option<f64>) -> String {
    match prob {
        Some(p) => format!("{:.2}%", p * 100.0),
        None => "N/A".to_string(),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_rows() {
        let html = Variant::NumericCsv.render(&json!({ "predictions": [0.5, 0.7] }));
        assert_eq!(
            html,
            "<table><tr><td>Prediction</td><td>0.5</td></tr>\
             <tr><td>Prediction</td><td>0.7</td></tr></table>"
        );
    }

    #[test]
    fn test_numeric_rows_from_wrapped_body() {
        let html = Variant::NumericCsv.render(&json!({
            "statusCode": 200,
            "body": "{\"predictions\": [12.25]}"
        }));
        assert_eq!(html, "<table><tr><td>Prediction</td><td>12.25</td></tr></table>");
    }

    #[test]
    fn test_text_row_positive() {
        let html = Variant::TextLines.render(&json!({
            "predictions": [{ "label": "LABEL_1_positive", "prob": 0.97 }]
        }));
        assert_eq!(
            html,
            "<table><tr><td>Input #1</td><td>Positive (Confidence: 97.00%)</td></tr></table>"
        );
    }

    #[test]
    fn test_text_row_generic_label_1() {
        let html = Variant::TextLines.render(&json!({
            "predictions": [{ "label": "LABEL_1", "prob": 0.97 }]
        }));
        assert_eq!(
            html,
            "<table><tr><td>Input #1</td><td>Positive (Confidence: 97.00%)</td></tr></table>"
        );
    }

    #[test]
    fn test_nested_predictions_get_sub_labels() {
        let html = Variant::TextLines.render(&json!({
            "predictions": [[
                { "label": "NEGATIVE", "prob": 0.6 },
                { "label": "POS", "prob": 0.4 }
            ]]
        }));
        assert_eq!(
            html,
            "<table>\
             <tr><td>Input #1 - 1</td><td>Negative (Confidence: 60.00%)</td></tr>\
             <tr><td>Input #1 - 2</td><td>POS (Confidence: 40.00%)</td></tr>\
             </table>"
        );
    }

    #[test]
    fn test_blazingtext_predictions() {
        let html = Variant::TextLines.render(&json!({
            "body": "{\"predictions\": [{\"label\": [\"__label__positive\"], \"prob\": [0.97]}]}"
        }));
        assert!(html.contains("Positive (Confidence: 97.00%)"));
    }

    #[test]
    fn test_unparseable_body() {
        for variant in [Variant::NumericCsv, Variant::TextLines] {
            assert_eq!(
                variant.render(&json!({ "body": "not json" })),
                "<p>Error parsing response body.</p>"
            );
        }
    }

    #[test]
    fn test_object_body_used_directly() {
        let html = Variant::NumericCsv.render(&json!({ "body": { "predictions": [1] } }));
        assert_eq!(html, "<table><tr><td>Prediction</td><td>1</td></tr></table>");
    }

    #[test]
    fn test_empty_body_falls_back_to_response() {
        let html = Variant::NumericCsv.render(&json!({ "body": "", "predictions": [2] }));
        assert_eq!(html, "<table><tr><td>Prediction</td><td>2</td></tr></table>");
    }

    #[test]
    fn test_falsy_body_falls_back_to_response() {
        for body in [json!(null), json!(0), json!(false)] {
            let html = Variant::NumericCsv.render(&json!({ "body": body, "predictions": [4] }));
            assert_eq!(html, "<table><tr><td>Prediction</td><td>4</td></tr></table>");
        }
    }

    #[test]
    fn test_non_object_truthy_body_has_no_predictions() {
        let expected = "<table><tr><td colspan='2'>No predictions found</td></tr></table>";
        for body in [json!(true), json!([1]), json!(7)] {
            assert_eq!(
                Variant::NumericCsv.render(&json!({ "body": body, "predictions": [4] })),
                expected
            );
        }
    }

    #[test]
    fn test_top_k_lists_use_first_entry() {
        let html = Variant::TextLines.render(&json!({
            "predictions": [{
                "label": ["__label__positive", "__label__negative"],
                "prob": [0.7, 0.3]
            }]
        }));
        assert_eq!(
            html,
            "<table><tr><td>Input #1</td><td>Positive (Confidence: 70.00%)</td></tr></table>"
        );
    }

    #[test]
    fn test_string_zero_probability_is_shown() {
        let html = Variant::TextLines.render(&json!({
            "predictions": [{ "label": "neutral", "prob": "0" }]
        }));
        assert!(html.contains("neutral (Confidence: 0.00%)"));
    }

    #[test]
    fn test_missing_predictions() {
        let expected = "<table><tr><td colspan='2'>No predictions found</td></tr></table>";
        assert_eq!(Variant::TextLines.render(&json!({ "error": "boom" })), expected);
        assert_eq!(Variant::NumericCsv.render(&json!({ "predictions": 3 })), expected);
        assert_eq!(Variant::NumericCsv.render(&json!([1, 2])), expected);
    }

    #[test]
    fn test_missing_label_and_prob() {
        let html = Variant::TextLines.render(&json!({ "predictions": [{}] }));
        assert!(html.contains("Unknown (Confidence: N/A)"));
    }

    #[test]
    fn test_zero_probability_shows_na() {
        let html = Variant::TextLines.render(&json!({
            "predictions": [{ "label": "negative", "prob": 0.0 }]
        }));
        assert!(html.contains("Negative (Confidence: N/A)"));
    }

    #[test]
    fn test_friendly_label_positive_checked_first() {
        assert_eq!(friendly_label(Some("negative-not-positive")), "Positive");
        assert_eq!(friendly_label(Some("  NEGATIVE ")), "Negative");
        assert_eq!(friendly_label(Some(" neutral ")), "neutral");
        assert_eq!(friendly_label(Some("label_0")), "Negative");
        assert_eq!(friendly_label(Some("LABEL_10")), "LABEL_10");
        assert_eq!(friendly_label(None), "Unknown");
    }

    #[test]
    fn test_confidence_format() {
        assert_eq!(confidence(Some(0.5)), "50.00%");
        assert_eq!(confidence(Some(0.12345)), "12.35%");
        assert_eq!(confidence(None), "N/A");
    }

    #[test]
    fn test_response_text_is_escaped() {
        let html = Variant::TextLines.render(&json!({
            "predictions": [{ "label": "<b>odd</b>", "prob": 0.5 }]
        }));
        assert!(html.contains("&lt;b&gt;odd&lt;/b&gt;"));
        let html = Variant::NumericCsv.render(&json!({ "predictions": ["a&b"] }));
        assert!(html.contains("<td>a&amp;b</td>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let response = json!({ "predictions": [[0.1, 0.2], 0.3] });
        assert_eq!(
            Variant::NumericCsv.render(&response),
            Variant::NumericCsv.render(&response)
        );
    }
}
