use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::plan::SubscriptionPlan;

/// Failures of the import pipeline. Messages are shown to restaurant owners.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Il file caricato non è un PDF valido")]
    NotAPdf,

    #[error("Impossibile leggere il testo dal PDF")]
    Pdf(#[from] pdf_extract::OutputError),

    #[error("Contenuto PDF codificato in modo non valido")]
    InvalidEncoding(#[from] base64::DecodeError),

    #[error("Piano di abbonamento sconosciuto: {0}")]
    InvalidPlan(String),

    #[error("URL non valido: {0}")]
    InvalidUrl(String),

    #[error("Impossibile scaricare il documento")]
    Download(#[from] reqwest::Error),

    #[error("Nessun testo da importare")]
    EmptyText,

    #[error("Il piano {plan} consente al massimo {limit} piatti, il documento ne contiene {found}")]
    PlanLimit {
        plan: SubscriptionPlan,
        limit: usize,
        found: usize,
    },

    #[error("Elaborazione del documento interrotta")]
    Join(#[from] tokio::task::JoinError),
}

/// Error returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Il documento supera la dimensione massima consentita")]
    PayloadTooLarge,

    #[error(transparent)]
    Import(#[from] ImportError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Import(err) => match err {
                ImportError::NotAPdf
                | ImportError::InvalidEncoding(_)
                | ImportError::InvalidPlan(_)
                | ImportError::InvalidUrl(_)
                | ImportError::EmptyText => StatusCode::BAD_REQUEST,
                // pdf-extract only fails on documents it cannot read.
                ImportError::Pdf(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ImportError::PlanLimit { .. } => StatusCode::FORBIDDEN,
                ImportError::Download(_) => StatusCode::BAD_GATEWAY,
                ImportError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = ?self, "request failed");
            "Errore interno del server".to_string()
        } else {
            if status.is_server_error() {
                warn!(error = ?self, "upstream request failed");
            }
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
