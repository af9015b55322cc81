//! Question records.

use serde::Serialize;
use uuid::Uuid;

/// One generated question about a solved module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    pub id: Uuid,

    /// Module type id, e.g. "LetterDisplay".
    pub module_id: String,

    /// Name shown to the player for this module instance.
    pub module_name: String,

    pub question: String,

    pub correct: Vec<String>,

    /// Wrong answers to prefer over random ones when building choices.
    pub preferred_wrong: Vec<String>,
}

impl QuestionRecord {
    pub fn new(
        module_id: impl Into<String>,
        module_name: impl Into<String>,
        question: impl Into<String>,
        correct: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            module_id: module_id.into(),
            module_name: module_name.into(),
            question: question.into(),
            correct,
            preferred_wrong: Vec::new(),
        }
    }

    pub fn with_preferred_wrong(mut self, preferred_wrong: Vec<String>) -> Self {
        self.preferred_wrong = preferred_wrong;
        self
    }
}
