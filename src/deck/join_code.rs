use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::{
    DeckManager,
    error::DeckError,
    model::{Poll, Presentation},
    store::Store,
};

pub const CODE_MIN: u32 = 10_000;
pub const CODE_MAX: u32 = 99_999;

/// Five digit code an audience member types to join.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinCode(String);

impl JoinCode {
    /// Draws uniformly from `[10000, 99999]`. Codes already in use are not
    /// checked for.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        Self(rng.random_range(CODE_MIN..=CODE_MAX).to_string())
    }

    /// Accepts only five ASCII digits, surrounding whitespace ignored.
    pub fn parse(input: &str) -> Option<Self> {
        let code = input.trim();
        (code.len() == 5 && code.bytes().all(|b| b.is_ascii_digit())).then(|| Self(code.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<JoinCode> for String {
    fn from(code: JoinCode) -> Self {
        code.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a join code points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "id")]
pub enum JoinTarget {
    Presentation(Uuid),
    Poll(Uuid),
}

impl<PS, QS> DeckManager<PS, QS>
where
    PS: Store<Presentation>,
    QS: Store<Poll>,
{
    /// Maps a join code to the presentation or poll carrying it.
    /// Presentations take precedence when both carry the same code.
    pub async fn resolve(&self, input: &str) -> Result<JoinTarget, DeckError> {
        let not_found = || DeckError::NotFound(format!("Join code '{}'", input.trim()));
        let code = JoinCode::parse(input).ok_or_else(not_found)?;

        if let Some(presentation) = self.presentations.get_by_code(code.as_str()).await? {
            tracing::debug!(%code, presentation_id = %presentation.id, "Join code resolved");
            return Ok(JoinTarget::Presentation(presentation.id));
        }
        if let Some(poll) = self.polls.get_by_code(code.as_str()).await? {
            tracing::debug!(%code, poll_id = %poll.id, "Join code resolved");
            return Ok(JoinTarget::Poll(poll.id));
        }
        Err(not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::InMemoryDeck;

    #[test]
    fn test_generate_in_range() {
        for _ in 0..1_000 {
            let code = JoinCode::generate();
            let value: u32 = code.as_str().parse().unwrap();
            assert!((CODE_MIN..=CODE_MAX).contains(&value));
            assert_eq!(code.as_str().len(), 5);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!(JoinCode::parse(" 12345 ").unwrap().as_str(), "12345");
        assert!(JoinCode::parse("1234").is_none());
        assert!(JoinCode::parse("123456").is_none());
        assert!(JoinCode::parse("12a45").is_none());
        assert!(JoinCode::parse("").is_none());
    }

    #[tokio::test]
    async fn test_resolve_generated_codes() {
        let deck = InMemoryDeck::default();
        let presentation = deck.create_presentation("Deck".into(), None, None).await.unwrap();
        let poll = deck
            .create_poll("Lunch".into(), vec!["Pizza".into(), "Salad".into()], None)
            .await
            .unwrap();

        if presentation.short_code != poll.short_code {
            assert_eq!(
                deck.resolve(&poll.short_code).await.unwrap(),
                JoinTarget::Poll(poll.id)
            );
        }
        assert_eq!(
            deck.resolve(&presentation.short_code).await.unwrap(),
            JoinTarget::Presentation(presentation.id)
        );
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let deck = InMemoryDeck::default();
        let err = deck.resolve("00000").await.unwrap_err();
        assert_eq!(err.kind(), "NotFound");
        let err = deck.resolve("abc").await.unwrap_err();
        assert_eq!(err.kind(), "NotFound");
    }
}
