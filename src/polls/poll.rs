//! Poll data model.

use serde::{Deserialize, Serialize};

/// A single answer choice and its running tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    /// Option text/label
    pub text: String,
    /// Number of votes received
    #[serde(default)]
    pub votes: u64,
}

impl PollOption {
    /// Create an option with zero votes
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            votes: 0,
        }
    }
}

/// A question with an ordered, fixed set of options.
///
/// The options list never changes length or text after creation; only the
/// vote counts do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    /// Poll ID (unique identifier)
    pub id: String,
    /// The question being asked
    pub question: String,
    /// Answer choices, in creation order
    pub options: Vec<PollOption>,
    /// Bumped once per recorded vote; orders snapshots of this poll
    #[serde(default)]
    pub version: u64,
    /// When the poll was created (Unix ms)
    pub created_at: i64,
}

impl Poll {
    /// Total votes across all options
    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(|o| o.votes).sum()
    }
}
