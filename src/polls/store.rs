//! In-memory poll store.
//!
//! Sole owner of poll state: creation and lookup arrive over the REST
//! surface, vote mutation is funneled through the live hub. Entries live for
//! the lifetime of the process; nothing is ever deleted.

use super::{Poll, PollOption};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Poll store error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Poll question is required")]
    EmptyQuestion,
    #[error("Poll must have at least 2 options")]
    NotEnoughOptions,
    #[error("Poll '{0}' not found")]
    NotFound(String),
}

/// Store for managing polls
#[derive(Debug, Default)]
pub struct PollStore {
    /// Stored polls by ID
    polls: RwLock<HashMap<String, Poll>>,
}

impl PollStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self {
            polls: RwLock::new(HashMap::new()),
        }
    }

    /// Validate input, allocate an id, and store a new poll with all counts
    /// at zero. The question and each option are trimmed; options left empty
    /// after trimming are discarded before the ≥2 check.
    pub fn create_poll(&self, question: &str, options: &[String]) -> Result<Poll, StoreError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(StoreError::EmptyQuestion);
        }

        let options: Vec<PollOption> = options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(PollOption::new)
            .collect();
        if options.len() < 2 {
            return Err(StoreError::NotEnoughOptions);
        }

        let poll = Poll {
            id: Uuid::new_v4().simple().to_string(),
            question: question.to_string(),
            options,
            version: 0,
            created_at: Utc::now().timestamp_millis(),
        };

        let mut polls = self.polls.write();
        polls.insert(poll.id.clone(), poll.clone());
        Ok(poll)
    }

    /// Get a poll by ID
    pub fn get_poll(&self, id: &str) -> Result<Poll, StoreError> {
        self.polls
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Record one vote.
    ///
    /// Returns the updated snapshot, or `None` when the poll is unknown or
    /// the index is out of range; the vote channel is fire-and-forget, so
    /// invalid votes are dropped rather than answered. The increment and the
    /// snapshot clone happen under the write lock.
    pub fn cast_vote(&self, id: &str, option_index: usize) -> Option<Poll> {
        let mut polls = self.polls.write();
        let poll = polls.get_mut(id)?;
        let option = poll.options.get_mut(option_index)?;
        option.votes += 1;
        poll.version += 1;
        Some(poll.clone())
    }

    /// Number of polls created so far
    pub fn poll_count(&self) -> usize {
        self.polls.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_create_poll() {
        let store = PollStore::new();
        let poll = store
            .create_poll("Pizza?", &options(&["Yes", "No"]))
            .unwrap();

        assert_eq!(poll.question, "Pizza?");
        assert_eq!(poll.options.len(), 2);
        assert!(poll.options.iter().all(|o| o.votes == 0));
        assert_eq!(poll.version, 0);
        assert_eq!(store.poll_count(), 1);
    }

    #[test]
    fn test_create_poll_trims_input() {
        let store = PollStore::new();
        let poll = store
            .create_poll("  Pizza?  ", &options(&[" Yes ", "", "  ", "No"]))
            .unwrap();

        assert_eq!(poll.question, "Pizza?");
        let texts: Vec<&str> = poll.options.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(texts, vec!["Yes", "No"]);
    }

    #[test]
    fn test_create_poll_allows_duplicate_options() {
        let store = PollStore::new();
        let poll = store
            .create_poll("Same?", &options(&["Yes", "Yes"]))
            .unwrap();
        assert_eq!(poll.options.len(), 2);
    }

    #[test]
    fn test_create_poll_rejects_empty_question() {
        let store = PollStore::new();
        let result = store.create_poll("   ", &options(&["Yes", "No"]));
        assert!(matches!(result, Err(StoreError::EmptyQuestion)));
        assert_eq!(store.poll_count(), 0);
    }

    #[test]
    fn test_create_poll_rejects_too_few_options() {
        let store = PollStore::new();
        let result = store.create_poll("Pizza?", &options(&["Yes", "  "]));
        assert!(matches!(result, Err(StoreError::NotEnoughOptions)));

        let result = store.create_poll("Pizza?", &[]);
        assert!(matches!(result, Err(StoreError::NotEnoughOptions)));
    }

    #[test]
    fn test_ids_are_unique() {
        let store = PollStore::new();
        let a = store.create_poll("A?", &options(&["1", "2"])).unwrap();
        let b = store.create_poll("B?", &options(&["1", "2"])).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.poll_count(), 2);
    }

    #[test]
    fn test_get_poll() {
        let store = PollStore::new();
        let created = store.create_poll("Pizza?", &options(&["Yes", "No"])).unwrap();

        let fetched = store.get_poll(&created.id).unwrap();
        assert_eq!(fetched, created);

        assert!(matches!(
            store.get_poll("nonexistent"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_cast_vote_accumulates() {
        let store = PollStore::new();
        let poll = store
            .create_poll("Pizza?", &options(&["Yes", "No"]))
            .unwrap();

        store.cast_vote(&poll.id, 0).unwrap();
        store.cast_vote(&poll.id, 0).unwrap();
        let updated = store.cast_vote(&poll.id, 1).unwrap();

        assert_eq!(updated.options[0].votes, 2);
        assert_eq!(updated.options[1].votes, 1);
        assert_eq!(updated.version, 3);
    }

    #[test]
    fn test_cast_vote_leaves_other_options_alone() {
        let store = PollStore::new();
        let poll = store
            .create_poll("Pick one", &options(&["a", "b", "c"]))
            .unwrap();

        let updated = store.cast_vote(&poll.id, 1).unwrap();
        assert_eq!(updated.options[0].votes, 0);
        assert_eq!(updated.options[1].votes, 1);
        assert_eq!(updated.options[2].votes, 0);
    }

    #[test]
    fn test_cast_vote_out_of_range_is_noop() {
        let store = PollStore::new();
        let poll = store
            .create_poll("Pizza?", &options(&["Yes", "No"]))
            .unwrap();

        assert!(store.cast_vote(&poll.id, 2).is_none());
        assert!(store.cast_vote(&poll.id, usize::MAX).is_none());

        let unchanged = store.get_poll(&poll.id).unwrap();
        assert_eq!(unchanged.total_votes(), 0);
        assert_eq!(unchanged.version, 0);
    }

    #[test]
    fn test_cast_vote_unknown_poll_is_noop() {
        let store = PollStore::new();
        assert!(store.cast_vote("nonexistent", 0).is_none());
    }
}
