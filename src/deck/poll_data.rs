//! Poll payload carried inside a `poll-template` element.
//!
//! This layer evolves independently of the element list: the element codec
//! only ever sees the encoded string produced here.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use super::{element::CodecError, error::DeckError};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PollData {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<PollOption>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One selectable choice. Shared by slide-embedded polls and standalone polls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PollOption {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub votes: u64,
    /// Editor-owned keys, passed through untouched.
    #[serde(flatten)]
    #[ts(skip)]
    pub extra: Map<String, Value>,
}

fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

impl PollOption {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            votes: 0,
            extra: Map::new(),
        }
    }
}

pub fn decode(payload: &str) -> Result<PollData, CodecError> {
    serde_json::from_str(payload).map_err(CodecError::PollData)
}

pub fn encode(poll: &PollData) -> Result<String, CodecError> {
    serde_json::to_string(poll).map_err(CodecError::PollData)
}

/// Adds exactly one vote to the option with `option_id` and returns its new
/// count. Leaves every counter untouched when the option is absent.
pub fn record_vote(options: &mut [PollOption], option_id: &str) -> Result<u64, DeckError> {
    let option = options
        .iter_mut()
        .find(|o| o.id == option_id)
        .ok_or_else(|| DeckError::OptionNotFound(option_id.to_string()))?;
    option.votes = option.votes.saturating_add(1);
    Ok(option.votes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_keeps_extra_fields() {
        let raw = json!({
            "question": "Favourite colour?",
            "options": [
                {"id": "a", "text": "Red", "votes": 3, "color": "#f00"},
                {"id": "b", "text": "Blue"}
            ],
            "allowMultiple": false
        })
        .to_string();

        let poll = decode(&raw).unwrap();
        assert_eq!(poll.question, "Favourite colour?");
        assert_eq!(poll.options[0].votes, 3);
        assert_eq!(poll.options[0].extra["color"], json!("#f00"));
        assert_eq!(poll.options[1].votes, 0);
        assert_eq!(poll.extra["allowMultiple"], json!(false));

        assert_eq!(decode(&encode(&poll).unwrap()).unwrap(), poll);
    }

    #[test]
    fn test_null_votes_count_as_zero() {
        let poll = decode(r#"{"question":"Q","options":[{"id":"a","votes":null}]}"#).unwrap();
        assert_eq!(poll.options[0].votes, 0);
    }

    #[test]
    fn test_corrupt_payload() {
        assert!(matches!(decode("not json"), Err(CodecError::PollData(_))));
        assert!(matches!(
            decode(r#"{"options":[{"id":"a","votes":-1}]}"#),
            Err(CodecError::PollData(_))
        ));
        assert!(matches!(
            decode(r#"{"options":[{"text":"no id"}]}"#),
            Err(CodecError::PollData(_))
        ));
    }

    #[test]
    fn test_record_vote() {
        let mut options = vec![PollOption::new("a", "A"), PollOption::new("b", "B")];
        assert_eq!(record_vote(&mut options, "a").unwrap(), 1);
        assert_eq!(record_vote(&mut options, "a").unwrap(), 2);
        assert_eq!(options[1].votes, 0);
    }

    #[test]
    fn test_record_vote_unknown_option() {
        let mut options = vec![PollOption::new("a", "A")];
        let err = record_vote(&mut options, "z").unwrap_err();
        assert_eq!(err.kind(), "OptionNotFound");
        assert_eq!(options[0].votes, 0);
    }

    #[test]
    fn test_binding_leaves_out_passthrough_keys() {
        let decl = PollOption::decl();
        assert!(decl.contains("votes"));
        assert!(!decl.contains("extra"));
    }
}
