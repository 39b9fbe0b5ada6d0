use serde::Deserialize;
use ts_rs::TS;
use uuid::Uuid;

use super::{
    DeckManager, element,
    error::DeckError,
    model::{Poll, Presentation, Slide},
    notifier::ViewPath,
    store::Store,
};

/// Partial slide update sent by the editor. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct SlideUpdate {
    pub content: Option<String>,
    pub background: Option<String>,
    pub layout: Option<String>,
}

impl<PS, QS> DeckManager<PS, QS>
where
    PS: Store<Presentation>,
    QS: Store<Poll>,
{
    async fn edit<T: Send>(
        &self,
        presentation_id: Uuid,
        apply: impl FnOnce(&mut Presentation) -> Result<T, DeckError> + Send,
    ) -> Result<T, DeckError> {
        let out = {
            let _guard = self.locks.acquire(presentation_id).await;
            let mut presentation = self.get_presentation(presentation_id).await?;
            let out = apply(&mut presentation)?;
            presentation.touch();
            self.presentations.save(presentation).await?;
            out
        };
        self.notifier
            .invalidate(ViewPath::all_for_presentation(presentation_id))
            .await;
        Ok(out)
    }

    /// Renders the editor's copy of a presentation and clears its stale flag.
    pub async fn editor_view(&self, presentation_id: Uuid) -> Result<Presentation, DeckError> {
        self.notifier
            .mark_fresh(&ViewPath::Editor(presentation_id))
            .await;
        self.get_presentation(presentation_id).await
    }

    /// Appends a blank slide.
    pub async fn add_slide(&self, presentation_id: Uuid) -> Result<Slide, DeckError> {
        let slide = self
            .edit(presentation_id, |presentation| {
                let slide = Slide::blank();
                presentation.slides.push(slide.clone());
                Ok(slide)
            })
            .await?;
        tracing::info!(%presentation_id, slide_id = %slide.id, "Slide added");
        Ok(slide)
    }

    /// Content that does not decode is rejected before anything is stored.
    pub async fn update_slide(
        &self,
        presentation_id: Uuid,
        slide_id: &str,
        update: SlideUpdate,
    ) -> Result<Slide, DeckError> {
        if let Some(content) = &update.content {
            element::decode(content)?;
        }
        let slide = self
            .edit(presentation_id, |presentation| {
                let slide = presentation
                    .slide_mut(slide_id)
                    .ok_or_else(|| DeckError::SlideNotFound(slide_id.to_string()))?;
                if let Some(content) = update.content {
                    slide.content = content;
                }
                if let Some(background) = update.background {
                    slide.background = background;
                }
                if let Some(layout) = update.layout {
                    slide.layout = layout;
                }
                Ok(slide.clone())
            })
            .await?;
        tracing::info!(%presentation_id, %slide_id, "Slide updated");
        Ok(slide)
    }

    pub async fn remove_slide(&self, presentation_id: Uuid, slide_id: &str) -> Result<(), DeckError> {
        self.edit(presentation_id, |presentation| {
            let index = presentation
                .slides
                .iter()
                .position(|s| s.id == slide_id)
                .ok_or_else(|| DeckError::SlideNotFound(slide_id.to_string()))?;
            presentation.slides.remove(index);
            Ok(())
        })
        .await?;
        tracing::info!(%presentation_id, %slide_id, "Slide removed");
        Ok(())
    }
}
