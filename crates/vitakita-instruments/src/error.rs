use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstrumentError {
    #[error("unknown question bank: {0}")]
    UnknownBank(String),

    #[error("question bank has no questions")]
    EmptyBank,

    #[error("unanswered questions: {}", missing.join(", "))]
    IncompleteAnswers { missing: Vec<String> },

    #[error("unknown option '{option_id}' for question '{question_id}'")]
    UnknownOption {
        question_id: String,
        option_id: String,
    },

    #[error("unknown question '{question_id}'")]
    UnknownQuestion { question_id: String },
}
