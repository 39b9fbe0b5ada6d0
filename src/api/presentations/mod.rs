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
    api::{SuccessResponse, owner_id},
    deck::{
        DeckManager,
        editor::SlideUpdate,
        error::DeckError,
        model::{Poll, Presentation, Slide},
        presenter::AudienceView,
        store::Store,
    },
};

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreatePresentationRequest {
    pub title: String,
    pub theme: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdvanceRequest {
    pub slide_index: i64,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VoteRequest {
    pub option_id: String,
}

/// POST /api/presentations
pub async fn create_presentation<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    headers: HeaderMap,
    Json(payload): Json<CreatePresentationRequest>,
) -> Result<(StatusCode, Json<Presentation>), DeckError> {
    let presentation = deck
        .create_presentation(payload.title, payload.theme, owner_id(&headers))
        .await?;
    Ok((StatusCode::CREATED, Json(presentation)))
}

/// GET /api/presentations
/// Lists the caller's presentations, or all of them for anonymous callers.
pub async fn list_presentations<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Presentation>>, DeckError> {
    let owner = owner_id(&headers);
    Ok(Json(deck.list_presentations(owner.as_deref()).await?))
}

/// GET /api/presentations/{id}
pub async fn get_presentation<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Presentation>, DeckError> {
    Ok(Json(deck.editor_view(id).await?))
}

/// DELETE /api/presentations/{id}
pub async fn delete_presentation<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, DeckError> {
    deck.delete_presentation(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/presentations/{id}/slides
pub async fn add_slide<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Slide>), DeckError> {
    let slide = deck.add_slide(id).await?;
    Ok((StatusCode::CREATED, Json(slide)))
}

/// PATCH /api/presentations/{id}/slides/{slide_id}
pub async fn update_slide<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path((id, slide_id)): Path<(Uuid, String)>,
    Json(update): Json<SlideUpdate>,
) -> Result<Json<Slide>, DeckError> {
    Ok(Json(deck.update_slide(id, &slide_id, update).await?))
}

/// DELETE /api/presentations/{id}/slides/{slide_id}
pub async fn remove_slide<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path((id, slide_id)): Path<(Uuid, String)>,
) -> Result<Json<SuccessResponse>, DeckError> {
    deck.remove_slide(id, &slide_id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/presentations/{id}/advance
/// Always answers 204, whether or not the presentation exists.
pub async fn advance<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdvanceRequest>,
) -> Result<StatusCode, DeckError> {
    deck.advance(id, payload.slide_index).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/presentations/{id}/live
pub async fn live_view<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AudienceView>, DeckError> {
    Ok(Json(deck.audience_view(id).await?))
}

/// GET /api/presentations/{id}/present
pub async fn presenter_view<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path(id): Path<Uuid>,
) -> Result<Json<AudienceView>, DeckError> {
    Ok(Json(deck.presenter_view(id).await?))
}

/// POST /api/presentations/{id}/slides/{slide_id}/votes
pub async fn submit_vote<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path((id, slide_id)): Path<(Uuid, String)>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<SuccessResponse>, DeckError> {
    deck.submit_vote(id, &slide_id, &payload.option_id).await?;
    Ok(Json(SuccessResponse::ok()))
}
