pub mod editor;
pub mod element;
pub mod error;
pub mod join_code;
pub mod lock;
pub mod model;
pub mod notifier;
pub mod poll_data;
pub mod presenter;
pub mod store;
pub mod vote;

use std::sync::Arc;

use uuid::Uuid;

use error::DeckError;
use lock::AggregateLocks;
use model::{Poll, PollResults, Presentation};
use notifier::{LiveSyncNotifier, ViewPath};
use store::{InMemoryStore, Store};

pub type InMemoryDeck = DeckManager<InMemoryStore<Presentation>, InMemoryStore<Poll>>;

/// Owns the persistence collaborators and serializes every mutation of a
/// presentation or poll through its per-aggregate lock.
#[derive(Debug)]
pub struct DeckManager<PS, QS>
where
    PS: Store<Presentation>,
    QS: Store<Poll>,
{
    presentations: PS,
    polls: QS,
    locks: AggregateLocks,
    notifier: Arc<LiveSyncNotifier>,
}

impl<PS, QS> DeckManager<PS, QS>
where
    PS: Store<Presentation>,
    QS: Store<Poll>,
{
    pub fn new(presentations: PS, polls: QS, notifier: Arc<LiveSyncNotifier>) -> Self {
        Self {
            presentations,
            polls,
            locks: AggregateLocks::new(),
            notifier,
        }
    }

    pub fn notifier(&self) -> &Arc<LiveSyncNotifier> {
        &self.notifier
    }

    pub async fn create_presentation(
        &self,
        title: String,
        theme: Option<String>,
        owner_id: Option<String>,
    ) -> Result<Presentation, DeckError> {
        let presentation = Presentation::new(title, theme, owner_id);
        self.presentations.save(presentation.clone()).await?;
        tracing::info!(
            presentation_id = %presentation.id,
            short_code = %presentation.short_code,
            "Presentation created"
        );
        self.notifier
            .invalidate([ViewPath::Editor(presentation.id)])
            .await;
        Ok(presentation)
    }

    pub async fn get_presentation(&self, id: Uuid) -> Result<Presentation, DeckError> {
        self.presentations
            .get_by_id(id)
            .await?
            .ok_or_else(|| DeckError::NotFound(format!("Presentation '{id}'")))
    }

    pub async fn list_presentations(
        &self,
        owner_id: Option<&str>,
    ) -> Result<Vec<Presentation>, DeckError> {
        Ok(self.presentations.list(owner_id).await?)
    }

    /// Slides and elements are inlined, so nothing else needs cleaning up.
    pub async fn delete_presentation(&self, id: Uuid) -> Result<(), DeckError> {
        let removed = {
            let _guard = self.locks.acquire(id).await;
            self.presentations.delete(id).await?
        };
        if !removed {
            return Err(DeckError::NotFound(format!("Presentation '{id}'")));
        }
        tracing::info!(presentation_id = %id, "Presentation deleted");
        self.notifier
            .retire(ViewPath::all_for_presentation(id))
            .await;
        Ok(())
    }

    pub async fn create_poll(
        &self,
        title: String,
        option_texts: Vec<String>,
        owner_id: Option<String>,
    ) -> Result<Poll, DeckError> {
        let poll = Poll::new(title, option_texts, owner_id);
        self.polls.save(poll.clone()).await?;
        tracing::info!(poll_id = %poll.id, short_code = %poll.short_code, "Poll created");
        Ok(poll)
    }

    pub async fn get_poll(&self, id: Uuid) -> Result<Poll, DeckError> {
        self.polls
            .get_by_id(id)
            .await?
            .ok_or_else(|| DeckError::NotFound(format!("Poll '{id}'")))
    }

    /// Renders `/poll/{id}` and clears its stale flag.
    pub async fn poll_view(&self, id: Uuid) -> Result<Poll, DeckError> {
        self.notifier.mark_fresh(&ViewPath::PublicPoll(id)).await;
        self.get_poll(id).await
    }

    pub async fn poll_results(&self, id: Uuid) -> Result<PollResults, DeckError> {
        let poll = self.poll_view(id).await?;
        Ok(PollResults::tally(&poll.title, &poll.options))
    }

    pub async fn list_polls(&self, owner_id: Option<&str>) -> Result<Vec<Poll>, DeckError> {
        Ok(self.polls.list(owner_id).await?)
    }

    pub async fn delete_poll(&self, id: Uuid) -> Result<(), DeckError> {
        let removed = {
            let _guard = self.locks.acquire(id).await;
            self.polls.delete(id).await?
        };
        if !removed {
            return Err(DeckError::NotFound(format!("Poll '{id}'")));
        }
        tracing::info!(poll_id = %id, "Poll deleted");
        self.notifier.retire([ViewPath::PublicPoll(id)]).await;
        Ok(())
    }
}

impl<PS, QS> Default for DeckManager<PS, QS>
where
    PS: Store<Presentation> + Default,
    QS: Store<Poll> + Default,
{
    fn default() -> Self {
        Self::new(PS::default(), QS::default(), Arc::default())
    }
}
