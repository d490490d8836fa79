use crate::app_cfg::{RelayCfg, Variant};
use crate::error::RelayError;
use crate::forward_req::forward;
use crate::models::{Envelope, InstancesBody};
use actix_web::{dev::PeerAddr, web, HttpResponse};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Instant;
use validator::Validate;

/// Accept `{"instances": [...]}`, optionally wrapped as `{"body": ...}`,
/// forward it upstream and answer with a `{statusCode, body}` envelope.
pub async fn handle_req(
    payload: web::Bytes,
    peer_addr: Option<PeerAddr>,
    http_client: web::Data<Client>,
    relay_cfg: web::Data<RelayCfg>,
) -> Result<HttpResponse, RelayError> {
    let now = Instant::now();
    let ip = peer_addr
        .map(|addr| addr.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let instances = match extract_instances(&payload, relay_cfg.variant) {
        Ok(instances) => instances,
        Err(err) => {
            log::error!("Rejected request from {ip}: {err}");
            return Err(err);
        }
    };
    log::debug!("Payload prepared for {ip}: {} instance(s)", instances.len());

    let result = match forward(&ip, &relay_cfg, instances, &http_client).await {
        Ok(result) => result,
        Err(err) => {
            log::error!("Failed to relay request from {ip}. Reason: {err}");
            return Err(err);
        }
    };

    let elapsed = now.elapsed();
    log::info!("Request from {ip} executed in {elapsed:?} time");
    Ok(HttpResponse::Ok().json(Envelope::predictions(result)))
}

/// Unwrap an optional `body` layer (JSON text or object) and check the
/// instance list against what the configured model accepts.
pub fn extract_instances(raw: &[u8], variant: Variant) -> Result<Vec<Value>, RelayError> {
    let mut event: Value = serde_json::from_slice(raw).map_err(|_| RelayError::InvalidBody)?;
    if let Some(body) = event.get_mut("body").map(Value::take) {
        event = match body {
            Value::String(text) => {
                serde_json::from_str(&text).map_err(|_| RelayError::InvalidBody)?
            }
            other => other,
        };
    }
    if !event.is_object() {
        return Err(RelayError::InvalidBody);
    }

    let body = InstancesBody::deserialize(&event)
        .map_err(|_| RelayError::InvalidInstances(expected_instances(variant)))?;
    body.validate().map_err(|_| RelayError::NoInstances)?;

    if variant == Variant::NumericCsv && !body.instances.iter().all(Value::is_array) {
        return Err(RelayError::InvalidInstances(expected_instances(variant)));
    }
    Ok(body.instances)
}

fn expected_instances(variant: Variant) -> &'static str {
    match variant {
        Variant::NumericCsv => "Expected a list of lists.",
        Variant::TextLines => "Expected a list.",
    }
}
