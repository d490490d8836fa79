use crate::app_cfg::{RelayCfg, Variant};
use crate::error::{RelayError, TransportError};
use crate::models::{display_value, RequestPayload};
use csv::WriterBuilder;
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Instant;

/// Delivers one payload to the inference endpoint and hands back its JSON.
#[async_trait::async_trait]
pub trait Transport {
    async fn submit(&self, url: &str, payload: &RequestPayload) -> Result<Value, TransportError>;
}

#[derive(Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn submit(&self, url: &str, payload: &RequestPayload) -> Result<Value, TransportError> {
        let req = self
            .client
            .request(Method::POST, url)
            .header("Content-Type", "application/json")
            .json(payload);

        let now = Instant::now();
        let res = req.send().await.map_err(TransportError::Request)?;
        let status = res.status();
        if !status.is_success() {
            log::error!("Inference endpoint {url} answered with status {status}");
            return Err(TransportError::Status(status.as_u16()));
        }
        let body = res.json::<Value>().await.map_err(TransportError::Decode)?;

        let elapsed = now.elapsed();
        log::info!(
            "Request with {} instance(s) to {url} executed in {elapsed:?} time",
            payload.instances.len()
        );
        Ok(body)
    }
}

/// One CSV row per instance; the regression endpoint consumes `text/csv`.
/// Fields holding the delimiter or quotes are quoted, nested lists stay one cell.
pub fn to_csv(instances: &[Value]) -> Result<String, RelayError> {
    let mut wtr = WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .flexible(true)
        .from_writer(vec![]);

    for row in instances {
        let record: Vec<String> = match row {
            Value::Array(values) => values.iter().map(csv_field).collect(),
            other => vec![csv_field(other)],
        };
        wtr.write_record(&record)
            .map_err(|e| RelayError::Encode(e.to_string()))?;
    }
    let buf = wtr
        .into_inner()
        .map_err(|e| RelayError::Encode(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| RelayError::Encode(e.to_string()))
}

fn csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(csv_field).collect::<Vec<_>>().join(", ")
        ),
        other => display_value(other),
    }
}

/// Relay side: pass validated instances on to the upstream model endpoint.
pub async fn forward(
    ip: &str,
    cfg: &RelayCfg,
    instances: Vec<Value>,
    client: &Client,
) -> Result<Value, RelayError> {
    let mut forwarded_req = client.request(Method::POST, cfg.upstream_url.as_str());
    forwarded_req = forwarded_req.header("x-forwarded-for", ip);

    let count = instances.len();
    forwarded_req = match cfg.variant {
        Variant::NumericCsv => forwarded_req
            .header("Content-Type", "text/csv")
            .body(to_csv(&instances)?),
        Variant::TextLines => {
            let payload = serde_json::json!({ "instances": instances });
            forwarded_req
                .header("Content-Type", "application/json")
                .json(&payload)
        }
    };

    let now = Instant::now();
    let res = forwarded_req
        .send()
        .await
        .map_err(|e| RelayError::Upstream(e.to_string()))?;
    let status = res.status();
    if !status.is_success() {
        return Err(RelayError::Upstream(format!("upstream answered with status {status}")));
    }
    let result = res
        .json::<Value>()
        .await
        .map_err(|e| RelayError::Upstream(e.to_string()))?;

    let elapsed = now.elapsed();
    log::info!("Relayed {count} instance(s) from {ip} executed in {elapsed:?} time");
    Ok(result)
}
