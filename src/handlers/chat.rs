use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{derive_status, render_tile, BookingStatus, TileView, Turn};
use crate::services::conversation;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct BookingActionRequest {
    pub reference: String,
}

#[derive(Deserialize)]
pub struct PaymentRequest {
    pub reference: String,
    pub payment: Value,
}

/// A turn as the widget sees it: the turn itself plus, for intent-bearing
/// assistant turns, the derived status and rendered tile.
#[derive(Serialize)]
pub struct TurnView {
    #[serde(flatten)]
    pub turn: Turn,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tile: Option<TileView>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub turns: Vec<TurnView>,
}

fn decorate(turns: &[Turn], turn: Turn) -> TurnView {
    let (status, tile) = match &turn.intent {
        Some(intent) => {
            let status = derive_status(turns, &intent.reference);
            (Some(status), Some(render_tile(intent, status)))
        }
        None => (None, None),
    };
    TurnView { turn, status, tile }
}

fn reply_view(state: &Arc<AppState>, patient_id: i64, reply: Turn) -> TurnView {
    let sessions = state.sessions.lock().unwrap();
    let turns = sessions
        .get(&patient_id)
        .map(|c| c.turns())
        .unwrap_or_default();
    decorate(turns, reply)
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<i64>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<TurnView>, AppError> {
    let text = req.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("message text is empty".to_string()));
    }

    let reply = conversation::submit(&state, patient_id, text).await?;
    Ok(Json(reply_view(&state, patient_id, reply)))
}

pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<i64>,
    Json(req): Json<BookingActionRequest>,
) -> Result<Json<TurnView>, AppError> {
    let reply = conversation::confirm_booking(&state, patient_id, &req.reference).await?;
    Ok(Json(reply_view(&state, patient_id, reply)))
}

pub async fn process_payment(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<i64>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<TurnView>, AppError> {
    let reply =
        conversation::process_payment(&state, patient_id, &req.reference, &req.payment).await?;
    Ok(Json(reply_view(&state, patient_id, reply)))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<i64>,
    Json(req): Json<BookingActionRequest>,
) -> Result<Json<TurnView>, AppError> {
    let reply = conversation::cancel_booking(&state, patient_id, &req.reference).await?;
    Ok(Json(reply_view(&state, patient_id, reply)))
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<i64>,
) -> Result<Json<HistoryResponse>, AppError> {
    let sessions = state.sessions.lock().unwrap();
    let conv = sessions
        .get(&patient_id)
        .ok_or_else(|| AppError::NotFound(format!("no conversation for patient {patient_id}")))?;

    // Derive each reference's status once instead of re-folding the log per
    // intent-bearing turn.
    let mut statuses: HashMap<&str, BookingStatus> = HashMap::new();
    for turn in conv.turns() {
        if let Some(intent) = &turn.intent {
            statuses
                .entry(&intent.reference)
                .or_insert_with(|| derive_status(conv.turns(), &intent.reference));
        }
    }

    let turns = conv
        .turns()
        .iter()
        .map(|t| {
            let (status, tile) = match &t.intent {
                Some(intent) => {
                    let status = statuses[intent.reference.as_str()];
                    (Some(status), Some(render_tile(intent, status)))
                }
                None => (None, None),
            };
            TurnView {
                turn: t.clone(),
                status,
                tile,
            }
        })
        .collect();

    Ok(Json(HistoryResponse { turns }))
}
