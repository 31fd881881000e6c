use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One selectable frequency level, shared by every question in a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerOption {
    pub id: String,
    pub label: String,
    pub multiplier: u32,
}

impl AnswerOption {
    pub fn new(id: &str, label: &str, multiplier: u32) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            multiplier,
        }
    }

    /// Find an option by id within a fixed option list.
    pub fn by_id<'a>(options: &'a [AnswerOption], id: &str) -> Option<&'a AnswerOption> {
        options.iter().find(|o| o.id == id)
    }
}

/// Question id → selected option id for one questionnaire attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct AnswerSet(BTreeMap<String, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection, replacing any earlier one for the same question.
    pub fn select(&mut self, question_id: impl Into<String>, option_id: impl Into<String>) {
        self.0.insert(question_id.into(), option_id.into());
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn remove(&mut self, question_id: &str) -> Option<String> {
        self.0.remove(question_id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(q, o)| (q.as_str(), o.as_str()))
    }
}

impl<Q: Into<String>, O: Into<String>> FromIterator<(Q, O)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (Q, O)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(q, o)| (q.into(), o.into()))
                .collect(),
        )
    }
}
