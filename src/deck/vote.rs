use uuid::Uuid;

use super::{
    DeckManager,
    element::{self, Element},
    error::DeckError,
    model::{Poll, Presentation},
    notifier::ViewPath,
    poll_data,
    store::Store,
};

/// Adds one vote to `option_id` inside the first poll element of an encoded
/// slide and returns the re-encoded content with the option's new count.
///
/// Later poll elements on the same slide are not reachable.
pub fn tally_slide_vote(content: &str, option_id: &str) -> Result<(String, u64), DeckError> {
    let mut elements = element::decode(content)?;
    let index = element::first_poll(&elements)
        .ok_or_else(|| DeckError::NotFound("Poll element on slide".into()))?;
    let Some(poll) = elements[index].as_poll_mut() else {
        return Err(DeckError::NotFound("Poll element on slide".into()));
    };

    let mut data = poll_data::decode(poll.payload()?)?;
    let votes = poll_data::record_vote(&mut data.options, option_id)?;
    poll.content = Some(poll_data::encode(&data)?);

    Ok((element::encode(&elements)?, votes))
}

/// Decoded view of the first poll on a slide, if it has one.
pub fn slide_poll(content: &str) -> Result<Option<poll_data::PollData>, DeckError> {
    let elements = element::decode(content)?;
    match elements.iter().find_map(Element::as_poll) {
        Some(poll) => Ok(Some(poll_data::decode(poll.payload()?)?)),
        None => Ok(None),
    }
}

impl<PS, QS> DeckManager<PS, QS>
where
    PS: Store<Presentation>,
    QS: Store<Poll>,
{
    /// Records one vote for an option of the poll embedded in a slide.
    ///
    /// Either the counter is incremented and the whole presentation persisted,
    /// or nothing is written.
    pub async fn submit_vote(
        &self,
        presentation_id: Uuid,
        slide_id: &str,
        option_id: &str,
    ) -> Result<(), DeckError> {
        let votes = {
            let _guard = self.locks.acquire(presentation_id).await;
            let mut presentation = self.get_presentation(presentation_id).await?;
            let slide = presentation
                .slide_mut(slide_id)
                .ok_or_else(|| DeckError::SlideNotFound(slide_id.to_string()))?;

            let (content, votes) = tally_slide_vote(&slide.content, option_id)?;
            slide.content = content;
            presentation.touch();
            self.presentations.save(presentation).await?;
            votes
        };

        tracing::info!(%presentation_id, %slide_id, %option_id, votes, "Vote recorded");
        self.notifier
            .invalidate([
                ViewPath::PresenterLive(presentation_id),
                ViewPath::AudienceLive(presentation_id),
            ])
            .await;
        Ok(())
    }

    /// Standalone counterpart of [`Self::submit_vote`].
    pub async fn submit_poll_vote(&self, poll_id: Uuid, option_id: &str) -> Result<(), DeckError> {
        let votes = {
            let _guard = self.locks.acquire(poll_id).await;
            let mut poll = self.get_poll(poll_id).await?;
            let votes = poll_data::record_vote(&mut poll.options, option_id)?;
            poll.touch();
            self.polls.save(poll).await?;
            votes
        };

        tracing::info!(%poll_id, %option_id, votes, "Poll vote recorded");
        self.notifier.invalidate([ViewPath::PublicPoll(poll_id)]).await;
        Ok(())
    }
}
