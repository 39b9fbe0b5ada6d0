use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use live_deck::{
    api::{
        USER_ID_HEADER, join,
        polls::{self, CreatePollRequest},
        presentations::{self, AdvanceRequest, CreatePresentationRequest, VoteRequest},
    },
    deck::{InMemoryDeck, editor::SlideUpdate, join_code::JoinTarget, notifier::ViewPath},
};
use serde_json::json;

fn user(id: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_ID_HEADER, HeaderValue::from_static(id));
    headers
}

#[tokio::test]
async fn test_presentation_flow_through_handlers() {
    let deck = Arc::new(InMemoryDeck::default());

    let (status, Json(created)) = presentations::create_presentation(
        State(deck.clone()),
        user("alice"),
        Json(CreatePresentationRequest {
            title: "Retro".into(),
            theme: None,
        }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.owner_id.as_deref(), Some("alice"));
    let slide_id = created.slides[0].id.clone();

    let payload = json!({"question": "Mood?", "options": [{"id": "up", "text": "Good"}]}).to_string();
    presentations::update_slide(
        State(deck.clone()),
        Path((created.id, slide_id.clone())),
        Json(SlideUpdate {
            content: Some(json!([{"type": "poll-template", "content": payload}]).to_string()),
            ..Default::default()
        }),
    )
    .await
    .unwrap();

    let Json(target) = join::resolve_code(State(deck.clone()), Path(created.short_code.clone()))
        .await
        .unwrap();
    assert_eq!(target, JoinTarget::Presentation(created.id));

    let Json(ok) = presentations::submit_vote(
        State(deck.clone()),
        Path((created.id, slide_id.clone())),
        Json(VoteRequest {
            option_id: "up".into(),
        }),
    )
    .await
    .unwrap();
    assert!(ok.success);

    let err = presentations::submit_vote(
        State(deck.clone()),
        Path((created.id, slide_id.clone())),
        Json(VoteRequest {
            option_id: "down".into(),
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

    let status = presentations::advance(
        State(deck.clone()),
        Path(created.id),
        Json(AdvanceRequest { slide_index: 9 }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);

    let Json(view) = presentations::live_view(State(deck.clone()), Path(created.id))
        .await
        .unwrap();
    assert_eq!(view.current_slide_index, 9);
    assert!(view.slide.is_none());

    let Json(mine) = presentations::list_presentations(State(deck.clone()), user("alice"))
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    let Json(theirs) = presentations::list_presentations(State(deck.clone()), user("bob"))
        .await
        .unwrap();
    assert!(theirs.is_empty());
}

#[tokio::test]
async fn test_advance_unknown_presentation_succeeds() {
    let deck = Arc::new(InMemoryDeck::default());
    let status = presentations::advance(
        State(deck),
        Path(uuid::Uuid::new_v4()),
        Json(AdvanceRequest { slide_index: 1 }),
    )
    .await
    .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_standalone_poll_flow_through_handlers() {
    let deck = Arc::new(InMemoryDeck::default());
    let (_, Json(poll)) = polls::create_poll(
        State(deck.clone()),
        HeaderMap::new(),
        Json(CreatePollRequest {
            title: "Friday lunch".into(),
            options: vec!["Tacos".into(), "Ramen".into()],
        }),
    )
    .await
    .unwrap();

    for _ in 0..3 {
        polls::submit_vote(
            State(deck.clone()),
            Path(poll.id),
            Json(VoteRequest {
                option_id: poll.options[1].id.clone(),
            }),
        )
        .await
        .unwrap();
    }

    let Json(results) = polls::poll_results(State(deck.clone()), Path(poll.id))
        .await
        .unwrap();
    assert_eq!(results.question, "Friday lunch");
    assert_eq!(results.total_votes, 3);
    assert_eq!(results.options[1].percentage, 100);

    polls::delete_poll(State(deck.clone()), Path(poll.id))
        .await
        .unwrap();
    let err = polls::get_poll(State(deck.clone()), Path(poll.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "NotFound");
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let deck = Arc::new(InMemoryDeck::default());
    let err = join::resolve_code(State(deck), Path("12".to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_fetching_a_view_clears_its_stale_flag() {
    let deck = Arc::new(InMemoryDeck::default());
    let (_, Json(created)) = presentations::create_presentation(
        State(deck.clone()),
        HeaderMap::new(),
        Json(CreatePresentationRequest {
            title: "Standup".into(),
            theme: None,
        }),
    )
    .await
    .unwrap();
    let notifier = deck.notifier();
    notifier
        .invalidate(ViewPath::all_for_presentation(created.id))
        .await;

    presentations::get_presentation(State(deck.clone()), Path(created.id))
        .await
        .unwrap();
    presentations::presenter_view(State(deck.clone()), Path(created.id))
        .await
        .unwrap();
    presentations::live_view(State(deck.clone()), Path(created.id))
        .await
        .unwrap();
    assert!(notifier.stale_paths().await.is_empty());

    let (_, Json(poll)) = polls::create_poll(
        State(deck.clone()),
        HeaderMap::new(),
        Json(CreatePollRequest {
            title: "Coffee?".into(),
            options: vec!["Yes".into()],
        }),
    )
    .await
    .unwrap();
    polls::submit_vote(
        State(deck.clone()),
        Path(poll.id),
        Json(VoteRequest {
            option_id: poll.options[0].id.clone(),
        }),
    )
    .await
    .unwrap();
    assert!(notifier.is_stale(&ViewPath::PublicPoll(poll.id)).await);
    polls::get_poll(State(deck.clone()), Path(poll.id))
        .await
        .unwrap();
    assert!(!notifier.is_stale(&ViewPath::PublicPoll(poll.id)).await);
}
