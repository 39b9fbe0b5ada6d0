use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use super::{
    DeckManager,
    error::DeckError,
    model::{Poll, PollResults, Presentation, Slide},
    notifier::ViewPath,
    store::Store,
    vote::slide_poll,
};

/// What an audience member sees for a live presentation.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct AudienceView {
    pub presentation_id: Uuid,
    pub title: String,
    pub theme: String,
    pub current_slide_index: i64,
    pub slide_count: usize,
    /// `None` when the presenter cursor points past the deck.
    pub slide: Option<Slide>,
    pub poll: Option<PollResults>,
}

impl<PS, QS> DeckManager<PS, QS>
where
    PS: Store<Presentation>,
    QS: Store<Poll>,
{
    /// Moves the presenter cursor. Unknown presentations are ignored and the
    /// index is stored as given, even outside `0..slides.len()`.
    pub async fn advance(&self, presentation_id: Uuid, slide_index: i64) -> Result<(), DeckError> {
        {
            let _guard = self.locks.acquire(presentation_id).await;
            let Some(mut presentation) = self.presentations.get_by_id(presentation_id).await?
            else {
                tracing::debug!(%presentation_id, "Advance ignored for unknown presentation");
                return Ok(());
            };
            if usize::try_from(slide_index).map_or(true, |i| i >= presentation.slides.len()) {
                tracing::warn!(
                    %presentation_id,
                    slide_index,
                    slide_count = presentation.slides.len(),
                    "Presenter cursor outside the deck"
                );
            }
            presentation.current_slide_index = slide_index;
            presentation.touch();
            self.presentations.save(presentation).await?;
        }

        tracing::info!(%presentation_id, slide_index, "Presenter advanced");
        self.notifier
            .invalidate([ViewPath::AudienceLive(presentation_id)])
            .await;
        Ok(())
    }

    /// Renders `/live/{id}` and clears its stale flag.
    pub async fn audience_view(&self, presentation_id: Uuid) -> Result<AudienceView, DeckError> {
        // Cleared before the read: an invalidation racing the load stays set.
        self.notifier
            .mark_fresh(&ViewPath::AudienceLive(presentation_id))
            .await;
        self.live_view(presentation_id).await
    }

    /// The presenter sees the same slide and results as the audience.
    pub async fn presenter_view(&self, presentation_id: Uuid) -> Result<AudienceView, DeckError> {
        self.notifier
            .mark_fresh(&ViewPath::PresenterLive(presentation_id))
            .await;
        self.live_view(presentation_id).await
    }

    async fn live_view(&self, presentation_id: Uuid) -> Result<AudienceView, DeckError> {
        let presentation = self.get_presentation(presentation_id).await?;
        let slide = presentation.current_slide().cloned();
        let poll = match &slide {
            Some(slide) => slide_poll(&slide.content)?
                .map(|data| PollResults::tally(&data.question, &data.options)),
            None => None,
        };

        Ok(AudienceView {
            presentation_id,
            title: presentation.title,
            theme: presentation.theme,
            current_slide_index: presentation.current_slide_index,
            slide_count: presentation.slides.len(),
            slide,
            poll,
        })
    }
}
