//! Lambda entry point: the same pipeline driven by a JSON event.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lambda_runtime::LambdaEvent;
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::error::ImportError;
use crate::import::{ImportReport, import_pdf, import_text, import_url};
use crate::plan::SubscriptionPlan;

pub fn parse_payload<T>(event: &LambdaEvent<Value>, key: &str) -> Option<T>
where
    T: for<'de> serde::Deserialize<'de>,
{
    event
        .payload
        .get(key)
        .or_else(|| {
            event
                .payload
                .get("queryStringParameters")
                .and_then(|qs| qs.get(key))
        })
        .or_else(|| {
            event
                .payload
                .get("pathParameters")
                .and_then(|pp| pp.get(key))
        })
        .and_then(|v| {
            // Query string values arrive as strings even for non-string types.
            if let Some(s) = v.as_str() {
                if let Ok(result) = serde_json::from_str::<T>(s) {
                    return Some(result);
                }
            }
            serde_json::from_value(v.clone()).ok()
        })
}

/// Runs one import, preferring `text`, then `pdf_base64`, then `url`.
pub async fn run_import(
    client: &Client,
    event: &LambdaEvent<Value>,
) -> Result<ImportReport, ImportError> {
    let plan = match parse_payload::<String>(event, "plan") {
        Some(raw) => raw
            .parse::<SubscriptionPlan>()
            .map_err(|_| ImportError::InvalidPlan(raw.clone()))?,
        None => SubscriptionPlan::Base,
    };

    if let Some(text) = parse_payload::<String>(event, "text") {
        info!(request_id = %event.context.request_id, "importing text payload");
        return import_text(&text, plan);
    }
    if let Some(encoded) = parse_payload::<String>(event, "pdf_base64") {
        info!(request_id = %event.context.request_id, "importing pdf payload");
        let bytes = STANDARD.decode(encoded.trim())?;
        return import_pdf(bytes, plan).await;
    }
    if let Some(url) = parse_payload::<String>(event, "url") {
        info!(request_id = %event.context.request_id, %url, "importing pdf from url");
        return import_url(client, &url, plan).await;
    }
    Err(ImportError::EmptyText)
}

pub async fn handle_event(
    client: &Client,
    event: LambdaEvent<Value>,
) -> Result<Value, lambda_runtime::Error> {
    let report = run_import(client, &event).await?;
    Ok(serde_json::to_value(report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_runtime::Context;
    use serde_json::json;

    fn event(payload: Value) -> LambdaEvent<Value> {
        LambdaEvent::new(payload, Context::default())
    }

    #[test]
    fn payload_lookup_falls_back_to_query_and_path() {
        let ev = event(json!({
            "queryStringParameters": { "plan": "premium" },
            "pathParameters": { "text": "DOLCI" }
        }));
        assert_eq!(parse_payload::<String>(&ev, "plan").as_deref(), Some("premium"));
        assert_eq!(parse_payload::<String>(&ev, "text").as_deref(), Some("DOLCI"));
        assert_eq!(parse_payload::<String>(&ev, "url"), None);
    }

    #[test]
    fn numeric_query_values_are_decoded() {
        let ev = event(json!({ "queryStringParameters": { "limit": "12" } }));
        assert_eq!(parse_payload::<u32>(&ev, "limit"), Some(12));
    }

    #[tokio::test]
    async fn imports_text_event() {
        crate::install_crypto_provider();
        let client = Client::new();
        let ev = event(json!({ "text": "SECONDI\nTagliata di manzo 18", "plan": "full" }));

        let report = run_import(&client, &ev).await.unwrap();

        assert_eq!(report.plan, SubscriptionPlan::Full);
        assert_eq!(report.menu.categories[0].items[0].price_cents, 1800);
    }

    #[tokio::test]
    async fn rejects_bad_base64() {
        crate::install_crypto_provider();
        let client = Client::new();
        let ev = event(json!({ "pdf_base64": "%%%" }));
        let err = run_import(&client, &ev).await.unwrap_err();
        assert!(matches!(err, ImportError::InvalidEncoding(_)));
    }

    #[tokio::test]
    async fn unknown_plan_is_rejected() {
        crate::install_crypto_provider();
        let client = Client::new();
        let ev = event(json!({ "text": "DOLCI\nTiramisù 6", "plan": "gold" }));
        let err = run_import(&client, &ev).await.unwrap_err();
        assert!(matches!(err, ImportError::InvalidPlan(ref raw) if raw == "gold"));
    }

    #[tokio::test]
    async fn empty_event_is_rejected() {
        crate::install_crypto_provider();
        let client = Client::new();
        let err = run_import(&client, &event(json!({}))).await.unwrap_err();
        assert!(matches!(err, ImportError::EmptyText));
    }
}
