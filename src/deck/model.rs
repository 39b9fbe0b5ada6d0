use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::{join_code::JoinCode, poll_data::PollOption, store::Aggregate};

pub const DEFAULT_THEME: &str = "default";
pub const BLANK_CONTENT: &str = "[]";
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_LAYOUT: &str = "blank";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Slide {
    pub id: String,
    /// Encoded element list, see [`super::element`].
    pub content: String,
    pub background: String,
    pub layout: String,
}

impl Slide {
    pub fn blank() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: BLANK_CONTENT.to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
            layout: DEFAULT_LAYOUT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Presentation {
    pub id: Uuid,
    pub short_code: String,
    pub title: String,
    pub theme: String,
    /// Slide currently shown to the audience. Not bounded by `slides.len()`.
    pub current_slide_index: i64,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// A fresh deck with one blank slide and a newly drawn join code.
    pub fn new(title: String, theme: Option<String>, owner_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            short_code: JoinCode::generate().into(),
            title,
            theme: theme.unwrap_or_else(|| DEFAULT_THEME.to_string()),
            current_slide_index: 0,
            owner_id,
            created_at: now,
            updated_at: now,
            slides: vec![Slide::blank()],
        }
    }

    pub fn slide(&self, slide_id: &str) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == slide_id)
    }

    pub fn slide_mut(&mut self, slide_id: &str) -> Option<&mut Slide> {
        self.slides.iter_mut().find(|s| s.id == slide_id)
    }

    /// The slide under the presenter cursor, if the cursor is in range.
    pub fn current_slide(&self) -> Option<&Slide> {
        usize::try_from(self.current_slide_index)
            .ok()
            .and_then(|index| self.slides.get(index))
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A poll reached through its own join code rather than through a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Poll {
    pub id: Uuid,
    pub short_code: String,
    pub title: String,
    pub options: Vec<PollOption>,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Poll {
    pub fn new(title: String, option_texts: Vec<String>, owner_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            short_code: JoinCode::generate().into(),
            title,
            options: option_texts
                .into_iter()
                .map(|text| PollOption::new(Uuid::new_v4().to_string(), text))
                .collect(),
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Aggregate for Presentation {
    fn id(&self) -> Uuid {
        self.id
    }

    fn short_code(&self) -> &str {
        &self.short_code
    }

    fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }
}

impl Aggregate for Poll {
    fn id(&self) -> Uuid {
        self.id
    }

    fn short_code(&self) -> &str {
        &self.short_code
    }

    fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptionResult {
    pub id: String,
    pub text: String,
    pub votes: u64,
    /// Rounded down share of all votes, 0 when nobody voted.
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PollResults {
    pub question: String,
    pub total_votes: u64,
    pub options: Vec<OptionResult>,
}

impl PollResults {
    pub fn tally(question: &str, options: &[PollOption]) -> Self {
        let total_votes = options.iter().map(|o| o.votes).sum::<u64>();
        let options = options
            .iter()
            .map(|o| OptionResult {
                id: o.id.clone(),
                text: o.text.clone(),
                votes: o.votes,
                percentage: if total_votes == 0 {
                    0
                } else {
                    (u128::from(o.votes) * 100 / u128::from(total_votes)) as u8
                },
            })
            .collect();
        Self {
            question: question.to_string(),
            total_votes,
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_presentation_has_one_blank_slide() {
        let p = Presentation::new("Deck".into(), None, Some("user-1".into()));
        assert_eq!(p.slides.len(), 1);
        assert_eq!(p.slides[0].content, BLANK_CONTENT);
        assert_eq!(p.theme, DEFAULT_THEME);
        assert_eq!(p.current_slide_index, 0);
        assert_eq!(p.short_code.len(), 5);
        assert_eq!(p.created_at, p.updated_at);
    }

    #[test]
    fn test_current_slide_out_of_range() {
        let mut p = Presentation::new("Deck".into(), None, None);
        assert!(p.current_slide().is_some());
        p.current_slide_index = 4;
        assert!(p.current_slide().is_none());
        p.current_slide_index = -1;
        assert!(p.current_slide().is_none());
    }

    #[test]
    fn test_tally() {
        let mut options = vec![
            PollOption::new("a", "A"),
            PollOption::new("b", "B"),
            PollOption::new("c", "C"),
        ];
        options[0].votes = 2;
        options[1].votes = 1;
        let results = PollResults::tally("Q", &options);
        assert_eq!(results.total_votes, 3);
        assert_eq!(results.options[0].percentage, 66);
        assert_eq!(results.options[1].percentage, 33);
        assert_eq!(results.options[2].percentage, 0);

        let empty = PollResults::tally("Q", &options[2..]);
        assert_eq!(empty.total_votes, 0);
        assert_eq!(empty.options[0].percentage, 0);
    }
}
