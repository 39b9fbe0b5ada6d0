use crate::{
    api,
    config::Config,
    deck::{
        DeckManager,
        model::{Poll, Presentation},
        notifier::LiveSyncNotifier,
        store::{InMemoryStore, Store},
    },
};
use axum::{
    Router,
    http::{HeaderName, Method},
    routing::{get, patch, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info, warn};

pub type LiveDeck = DeckManager<InMemoryStore<Presentation>, InMemoryStore<Poll>>;

pub struct App {
    pub deck: Arc<LiveDeck>,
    pub config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        let notifier = Arc::new(LiveSyncNotifier::new(config.notify_capacity));
        let deck = Arc::new(LiveDeck::new(
            InMemoryStore::new(),
            InMemoryStore::new(),
            notifier.clone(),
        ));

        // Renderers pick up stale paths on their next fetch; this only traces them.
        let mut invalidations = notifier.subscribe();
        tokio::spawn(async move {
            loop {
                match invalidations.recv().await {
                    Ok(signal) => {
                        for path in &signal.paths {
                            debug!(%path, at = %signal.at, "View marked stale");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Invalidation listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self { deck, config }
    }

    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::DELETE,
                Method::PATCH,
            ])
            .allow_headers([
                HeaderName::from_static("content-type"),
                HeaderName::from_static(api::USER_ID_HEADER),
            ])
            .allow_origin(Any);

        let app = router(self.deck.clone()).layer(cors);

        let addr = SocketAddr::new(self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("Server running on http://{}", addr);
        match axum::serve(listener, app).await {
            Ok(_) => info!("Server shut down gracefully"),
            Err(e) => error!("Server error: {}", e),
        }

        Ok(())
    }
}

pub fn router<PS, QS>(deck: Arc<DeckManager<PS, QS>>) -> Router
where
    PS: Store<Presentation>,
    QS: Store<Poll>,
{
    use api::{join, polls, presentations};

    Router::new()
        .route(
            "/api/presentations",
            get(presentations::list_presentations::<PS, QS>)
                .post(presentations::create_presentation::<PS, QS>),
        )
        .route(
            "/api/presentations/{id}",
            get(presentations::get_presentation::<PS, QS>)
                .delete(presentations::delete_presentation::<PS, QS>),
        )
        .route(
            "/api/presentations/{id}/slides",
            post(presentations::add_slide::<PS, QS>),
        )
        .route(
            "/api/presentations/{id}/slides/{slide_id}",
            patch(presentations::update_slide::<PS, QS>)
                .delete(presentations::remove_slide::<PS, QS>),
        )
        .route(
            "/api/presentations/{id}/slides/{slide_id}/votes",
            post(presentations::submit_vote::<PS, QS>),
        )
        .route(
            "/api/presentations/{id}/advance",
            post(presentations::advance::<PS, QS>),
        )
        .route(
            "/api/presentations/{id}/live",
            get(presentations::live_view::<PS, QS>),
        )
        .route(
            "/api/presentations/{id}/present",
            get(presentations::presenter_view::<PS, QS>),
        )
        .route(
            "/api/polls",
            get(polls::list_polls::<PS, QS>).post(polls::create_poll::<PS, QS>),
        )
        .route(
            "/api/polls/{id}",
            get(polls::get_poll::<PS, QS>).delete(polls::delete_poll::<PS, QS>),
        )
        .route(
            "/api/polls/{id}/results",
            get(polls::poll_results::<PS, QS>),
        )
        .route("/api/polls/{id}/votes", post(polls::submit_vote::<PS, QS>))
        .route("/api/join/{code}", get(join::resolve_code::<PS, QS>))
        .with_state(deck)
}
