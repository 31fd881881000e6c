pub mod answer;
pub mod condition;
pub mod diagnostic;
pub mod profile;
