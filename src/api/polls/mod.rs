use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ts_rs::TS;
use uuid::Uuid;

use crate::{
    api::{SuccessResponse, owner_id, presentations::VoteRequest},
    deck::{
        DeckManager,
        error::DeckError,
        model::{Poll, PollResults, Presentation},
        store::Store,
    },
};

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatePollRequest {
    pub title: String,
    pub options: Vec<String>,
}

/// POST /api/polls
pub async fn create_poll<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    headers: HeaderMap,
    Json(payload): Json<CreatePollRequest>,
) -> Result<(StatusCode, Json<Poll>), DeckError> {
    let poll = deck
        .create_poll(payload.title, payload.options, owner_id(&headers))
        .await?;
    Ok((StatusCode::CREATED, Json(poll)))
}

/// GET /api/polls
pub async fn list_polls<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Poll>>, DeckError> {
    let owner = owner_id(&headers);
    Ok(Json(deck.list_polls(owner.as_deref()).await?))
}

/// GET /api/polls/{id}
pub async fn get_poll<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Poll>, DeckError> {
    Ok(Json(deck.poll_view(id).await?))
}

/// GET /api/polls/{id}/results
pub async fn poll_results<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<PollResults>, DeckError> {
    Ok(Json(deck.poll_results(id).await?))
}

/// DELETE /api/polls/{id}
pub async fn delete_poll<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, DeckError> {
    deck.delete_poll(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/polls/{id}/votes
pub async fn submit_vote<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<SuccessResponse>, DeckError> {
    deck.submit_poll_vote(id, &payload.option_id).await?;
    Ok(Json(SuccessResponse::ok()))
}
