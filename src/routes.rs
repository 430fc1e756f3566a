use axum::{
    Json,
    body::Bytes,
    extract::{
        Query, State,
        rejection::{BytesRejection, JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::decipher::decipher_text;
use crate::error::{AppError, ImportError};
use crate::import::{ImportReport, import_pdf, import_text, import_url};
use crate::pdf::discover_menu_pdfs;
use crate::plan::SubscriptionPlan;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PlanParams {
    pub plan: Option<String>,
}

impl PlanParams {
    fn plan(&self) -> Result<SubscriptionPlan, AppError> {
        match self.plan.as_deref() {
            None => Ok(SubscriptionPlan::default()),
            Some(raw) => raw
                .parse()
                .map_err(|_| ImportError::InvalidPlan(raw.to_string()).into()),
        }
    }
}

#[derive(Deserialize, Serialize)]
pub struct TextPayload {
    pub text: String,
}

#[derive(Deserialize)]
pub struct UrlPayload {
    pub url: String,
}

#[derive(Deserialize)]
pub struct DiscoverParams {
    pub page: String,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest("Richiesta JSON non valida".to_string())
        }
    })
}

fn raw_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, AppError> {
    body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest("Impossibile leggere il corpo della richiesta".to_string())
        }
    })
}

fn plan_query(params: Result<Query<PlanParams>, QueryRejection>) -> Result<SubscriptionPlan, AppError> {
    let Query(params) = params
        .map_err(|_| AppError::BadRequest("Parametri della richiesta non validi".to_string()))?;
    params.plan()
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn import_pdf_handler(
    params: Result<Query<PlanParams>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ImportReport>, AppError> {
    let plan = plan_query(params)?;
    let body = raw_body(body)?;
    let report = import_pdf(body.to_vec(), plan).await?;
    Ok(Json(report))
}

pub async fn import_text_handler(
    params: Result<Query<PlanParams>, QueryRejection>,
    payload: Result<Json<TextPayload>, JsonRejection>,
) -> Result<Json<ImportReport>, AppError> {
    let plan = plan_query(params)?;
    let payload = json_body(payload)?;
    let report = import_text(&payload.text, plan)?;
    Ok(Json(report))
}

pub async fn import_url_handler(
    State(state): State<AppState>,
    params: Result<Query<PlanParams>, QueryRejection>,
    payload: Result<Json<UrlPayload>, JsonRejection>,
) -> Result<Json<ImportReport>, AppError> {
    let plan = plan_query(params)?;
    let payload = json_body(payload)?;
    let report = import_url(&state.client, &payload.url, plan).await?;
    Ok(Json(report))
}

pub async fn discover_handler(
    State(state): State<AppState>,
    params: Result<Query<DiscoverParams>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(params) = params
        .map_err(|_| AppError::BadRequest("Parametro 'page' mancante o non valido".to_string()))?;
    let links = discover_menu_pdfs(&state.client, &params.page).await?;
    let pdfs: Vec<String> = links.into_iter().map(String::from).collect();
    Ok(Json(json!({ "pdfs": pdfs })))
}

pub async fn decipher_handler(
    payload: Result<Json<TextPayload>, JsonRejection>,
) -> Result<Json<TextPayload>, AppError> {
    let payload = json_body(payload)?;
    Ok(Json(TextPayload {
        text: decipher_text(&payload.text),
    }))
}
