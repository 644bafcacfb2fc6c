use crate::{quiz::Question, Ledger, UserId};
use alloc::{collections::BTreeMap, string::String, vec::Vec};
use serde::{Deserialize, Serialize};

/// File name of the structured results attachment.
pub const EXPORT_NAME: &str = "results.json";

/// One participant's line in the results export.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub user_id: UserId,
    pub name: String,
    pub score: u32,
    pub answers: Vec<ResultAnswer>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultAnswer {
    /// Text of the choice the participant settled on.
    pub answer_given: String,
    pub points_given: u32,
    /// Question id the answer belongs to.
    pub question: u32,
}

/// Builds the export for every participant who answered at least once, sorted by display name.
/// Users missing from `names` are listed under their id.
pub fn export(ledger: &Ledger, catalog: &[Question], names: &BTreeMap<UserId, String>) -> Vec<ResultEntry> {
    let mut entries: Vec<_> = ledger
        .participants()
        .map(|(user, record)| ResultEntry {
            user_id: user.clone(),
            name: names.get(user).unwrap_or(user).clone(),
            score: record.score,
            answers: record
                .answers
                .iter()
                .map(|(&question, answer)| ResultAnswer {
                    answer_given: catalog
                        .iter()
                        .find(|q| q.id == question)
                        .and_then(|q| q.choices.get(usize::from(answer.choice)))
                        .cloned()
                        .unwrap_or_default(),
                    points_given: answer.points,
                    question,
                })
                .collect(),
        })
        .collect();
    entries.sort_unstable_by(|a, b| a.name.cmp(&b.name).then_with(|| a.user_id.cmp(&b.user_id)));
    entries
}
