//! Per-session score keeping.
//!
//! A correct answer earns [`FIRST_CORRECT_POINTS`] if nobody else answered the question correctly
//! before, otherwise [`CORRECT_POINTS`]. A participant may change their answer while the question is
//! open: the latest submission replaces the earlier one, so each (participant, question) pair
//! contributes exactly one outcome to the score.

use crate::{quiz::Question, UserId};
use alloc::{collections::BTreeMap, vec::Vec};

pub const FIRST_CORRECT_POINTS: u32 = 2;
pub const CORRECT_POINTS: u32 = 1;

/// The latest answer a participant gave to one question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnswerRecord {
    pub choice: u8,
    pub points: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParticipantRecord {
    pub score: u32,
    /// Keyed by question id.
    pub answers: BTreeMap<u32, AnswerRecord>,
}

/// Participants sharing the same score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tier {
    pub score: u32,
    pub users: Vec<UserId>,
}

#[derive(Debug)]
pub struct Ledger {
    /// The session creator, who never participates.
    host: UserId,
    participants: BTreeMap<UserId, ParticipantRecord>,
    /// Holder of the first-correct bonus for each question id.
    first_correct: BTreeMap<u32, UserId>,
}

impl Ledger {
    pub fn new(host: UserId) -> Self {
        Self { host, participants: BTreeMap::new(), first_correct: BTreeMap::new() }
    }

    /// Records `choice` as the latest answer of `user` to `question`. Returns the points that the
    /// answer is worth, or `None` if the user is the session creator.
    pub fn record_answer(&mut self, user: &str, question: &Question, choice: u8) -> Option<u32> {
        if user == self.host {
            return None;
        }

        let points = if choice == question.answer {
            match self.first_correct.get(&question.id) {
                None => {
                    self.first_correct.insert(question.id, user.into());
                    FIRST_CORRECT_POINTS
                }
                Some(holder) if holder == user => FIRST_CORRECT_POINTS,
                Some(_) => CORRECT_POINTS,
            }
        } else {
            0
        };

        let record = self.participants.entry(user.into()).or_default();
        let previous = record.answers.insert(question.id, AnswerRecord { choice, points });
        record.score = record.score + points - previous.map_or(0, |prev| prev.points);
        Some(points)
    }

    pub fn participant(&self, user: &str) -> Option<&ParticipantRecord> {
        self.participants.get(user)
    }

    pub fn participants(&self) -> impl ExactSizeIterator<Item = (&UserId, &ParticipantRecord)> {
        self.participants.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Groups participants into tiers of descending score. Whole tiers are admitted while fewer than
    /// `max_places` winners have been admitted, so ties at the boundary all qualify. Tiers without
    /// a positive score never qualify.
    pub fn top_scorers(&self, max_places: usize) -> Vec<Tier> {
        let mut by_score = BTreeMap::<u32, Vec<UserId>>::new();
        for (user, record) in &self.participants {
            by_score.entry(record.score).or_default().push(user.clone());
        }

        let mut admitted = 0;
        let mut tiers = Vec::new();
        for (score, users) in by_score.into_iter().rev() {
            if admitted >= max_places || score == 0 {
                break;
            }
            admitted += users.len();
            tiers.push(Tier { score, users });
        }
        tiers
    }
}
