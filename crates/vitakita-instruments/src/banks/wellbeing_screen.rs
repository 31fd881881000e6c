use std::collections::BTreeMap;

use vitakita_core::models::condition::ConditionLabel;

use crate::QuestionBank;
use crate::scoring::Question;

/// Five-item wellbeing screen used at onboarding and on retake.
/// Each item is weighted towards Depression, Anxiety, or Stress; answers use
/// the two-week frequency scale (0–3).
pub struct WellbeingScreen;

impl QuestionBank for WellbeingScreen {
    fn id(&self) -> &str {
        "wellbeing_screen"
    }

    fn name(&self) -> &str {
        "Wellbeing Screen"
    }

    fn questions(&self) -> &[Question] {
        static QUESTIONS: std::sync::LazyLock<Vec<Question>> = std::sync::LazyLock::new(|| {
            vec![
                question(
                    "q1",
                    "Over the past 2 weeks, how often have you felt down, depressed, or hopeless?",
                    (2, 1, 1),
                ),
                question(
                    "q2",
                    "Over the past 2 weeks, how often have you felt nervous, anxious, or on edge?",
                    (1, 2, 1),
                ),
                question(
                    "q3",
                    "Over the past 2 weeks, how often have you found it hard to relax?",
                    (1, 1, 2),
                ),
                question(
                    "q4",
                    "Have you experienced loss of interest or pleasure in doing things?",
                    (2, 0, 1),
                ),
                question(
                    "q5",
                    "Have you experienced restlessness or constant worrying?",
                    (0, 2, 1),
                ),
            ]
        });
        &QUESTIONS
    }
}

fn question(id: &str, prompt: &str, (depression, anxiety, stress): (u32, u32, u32)) -> Question {
    Question {
        id: id.to_string(),
        prompt: prompt.to_string(),
        weights: BTreeMap::from([
            (ConditionLabel::Depression, depression),
            (ConditionLabel::Anxiety, anxiety),
            (ConditionLabel::Stress, stress),
        ]),
    }
}
