use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use crate::deck::{
    DeckManager,
    error::DeckError,
    join_code::JoinTarget,
    model::{Poll, Presentation},
    store::Store,
};

/// GET /api/join/{code}
/// Resolves an audience join code to the presentation or poll it opens.
pub async fn resolve_code<PS: Store<Presentation>, QS: Store<Poll>>(
    State(deck): State<Arc<DeckManager<PS, QS>>>,
    Path(code): Path<String>,
) -> Result<Json<JoinTarget>, DeckError> {
    Ok(Json(deck.resolve(&code).await?))
}
