//! Slide content encoding.
//!
//! A slide stores its visual elements as one JSON array inside a string
//! field. Only `poll-template` elements are interpreted here; every other
//! variant is carried as its raw field map so re-encoding never drops data
//! owned by the editor. The poll payload inside a `poll-template` element is
//! itself a string and stays opaque at this layer (see [`super::poll_data`]).

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::Error as _,
    ser::SerializeMap,
};
use serde_json::{Map, Value};

pub const TYPE_TAG: &str = "type";
pub const CONTENT_FIELD: &str = "content";
pub const POLL_TEMPLATE: &str = "poll-template";

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("invalid element list: {0}")]
    Content(#[source] serde_json::Error),
    #[error("invalid poll data: {0}")]
    PollData(#[source] serde_json::Error),
    #[error("poll element carries no poll data")]
    MissingPollData,
}

/// One visual unit on a slide.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Poll(PollElement),
    /// Any variant this crate does not interpret, fields kept verbatim
    /// (including the type tag).
    Opaque(Map<String, Value>),
}

/// A `poll-template` element. `content` holds the encoded poll payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PollElement {
    pub content: Option<String>,
    pub rest: Map<String, Value>,
}

impl Element {
    pub fn poll(content: String) -> Self {
        Element::Poll(PollElement {
            content: Some(content),
            rest: Map::new(),
        })
    }

    pub fn type_tag(&self) -> Option<&str> {
        match self {
            Element::Poll(_) => Some(POLL_TEMPLATE),
            Element::Opaque(fields) => fields.get(TYPE_TAG).and_then(Value::as_str),
        }
    }

    pub fn as_poll(&self) -> Option<&PollElement> {
        match self {
            Element::Poll(poll) => Some(poll),
            Element::Opaque(_) => None,
        }
    }

    pub fn as_poll_mut(&mut self) -> Option<&mut PollElement> {
        match self {
            Element::Poll(poll) => Some(poll),
            Element::Opaque(_) => None,
        }
    }
}

impl PollElement {
    pub fn payload(&self) -> Result<&str, CodecError> {
        self.content.as_deref().ok_or(CodecError::MissingPollData)
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Element::Opaque(fields) => fields.serialize(serializer),
            Element::Poll(poll) => {
                let extra = 1 + usize::from(poll.content.is_some());
                let mut map = serializer.serialize_map(Some(poll.rest.len() + extra))?;
                map.serialize_entry(TYPE_TAG, POLL_TEMPLATE)?;
                if let Some(content) = &poll.content {
                    map.serialize_entry(CONTENT_FIELD, content)?;
                }
                for (key, value) in &poll.rest {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;
        let is_poll = match fields.get(TYPE_TAG) {
            Some(Value::String(tag)) => tag == POLL_TEMPLATE,
            Some(_) => return Err(D::Error::custom("element type tag must be a string")),
            None => return Err(D::Error::missing_field(TYPE_TAG)),
        };
        if !is_poll {
            return Ok(Element::Opaque(fields));
        }

        fields.remove(TYPE_TAG);
        let content = match fields.remove(CONTENT_FIELD) {
            None => None,
            Some(Value::String(content)) => Some(content),
            Some(_) => return Err(D::Error::custom("poll element content must be a string")),
        };
        Ok(Element::Poll(PollElement {
            content,
            rest: fields,
        }))
    }
}

/// Decodes a slide's content field. Blank content is an empty slide.
pub fn decode(content: &str) -> Result<Vec<Element>, CodecError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(content).map_err(CodecError::Content)
}

pub fn encode(elements: &[Element]) -> Result<String, CodecError> {
    serde_json::to_string(elements).map_err(CodecError::Content)
}

/// Index of the first `poll-template` element. Later poll elements on the
/// same slide are never targeted.
pub fn first_poll(elements: &[Element]) -> Option<usize> {
    elements.iter().position(|e| e.as_poll().is_some())
}
