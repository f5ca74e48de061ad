//! Handlers for the JSON API.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::errors::PipelineError;
use crate::wire::{
    AskRequest, AskResponse, DiagnosticResponse, DuaList, ErrorBody, GenerateRequest,
    GenerateResponse, Invocation, InvocationView, RelatedList,
};

/// Error response for every route: `{success:false, message, error}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self { status, message: message.into(), error: error.into() }
    }

    /// `invalid` is shown for validation errors, `failed` for everything else.
    fn from_pipeline(e: PipelineError, invalid: &str, failed: &str) -> Self {
        let message = match e {
            PipelineError::Validation(_) => invalid,
            _ => failed,
        };
        Self::new(status_for(&e), message, e.to_string())
    }

    fn bad_body(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "Erreur lors du traitement de la demande",
            rejection.body_text(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { success: false, message: self.message, error: self.error };
        (self.status, Json(body)).into_response()
    }
}

pub fn status_for(e: &PipelineError) -> StatusCode {
    match e {
        PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
        PipelineError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        PipelineError::Service(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
    }
}

pub async fn generate_dua(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(req) = payload.map_err(ApiError::bad_body)?;
    let intention = req.intention().unwrap_or_default().trim().to_string();
    log::info!("generate-dua: request for {:?}", intention);

    let dua = state
        .pipeline
        .generate_invocation(&intention)
        .await
        .map_err(|e| {
            ApiError::from_pipeline(
                e,
                "Une intention ou requête est requise pour générer une dua",
                "Échec de la génération de la dua",
            )
        })?;

    Ok(Json(GenerateResponse { success: true, dua: InvocationView::new(dua, &intention) }))
}

pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(req) = payload.map_err(ApiError::bad_body)?;
    let question = req.question.unwrap_or_default();

    let data = state.pipeline.answer(&question).await.map_err(|e| {
        ApiError::from_pipeline(
            e,
            "Une question est requise",
            "Échec de la génération de la réponse",
        )
    })?;
    Ok(Json(AskResponse { success: true, data }))
}

/// Any failure of the diagnostic round-trip is a 500.
pub async fn test_gemini(
    State(state): State<AppState>,
) -> Result<Json<DiagnosticResponse>, ApiError> {
    match state.pipeline.diagnose().await {
        Ok(response) => Ok(Json(DiagnosticResponse {
            success: true,
            message: "Test de l'API Gemini réussi".to_string(),
            response,
        })),
        Err(e) => Err(ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Échec du test de l'API Gemini",
            e.to_string(),
        )),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
}

pub async fn list_duas(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<DuaList> {
    let duas: Vec<Invocation> = state
        .catalog
        .search(params.q.as_deref().unwrap_or_default())
        .into_iter()
        .cloned()
        .collect();
    Json(DuaList { total: duas.len(), duas })
}

pub async fn get_dua(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Invocation>, ApiError> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "Dua introuvable", format!("no dua with id {id}")))
}

pub async fn daily_dua(State(state): State<AppState>) -> Json<Invocation> {
    let today = chrono::Local::now().date_naive();
    Json(state.catalog.daily_for(today).clone())
}

#[derive(Debug, Default, Deserialize)]
pub struct RelatedParams {
    #[serde(default)]
    pub theme: Option<String>,
}

pub async fn related_duas(
    State(state): State<AppState>,
    Query(params): Query<RelatedParams>,
) -> Json<RelatedList> {
    let theme = params.theme.unwrap_or_default();
    let duas = state.catalog.related(&theme);
    Json(RelatedList { theme, duas })
}
