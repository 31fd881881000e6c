use std::collections::BTreeMap;

use vitakita_core::models::answer::AnswerSet;
use vitakita_core::models::condition::ConditionLabel;
use vitakita_instruments::error::InstrumentError;
use vitakita_instruments::scoring::{
    Question, all_answered, condition_totals, frequency_options, missing_answers, score,
    winning_condition,
};
use vitakita_instruments::{QuestionBank, get_bank};

fn bank() -> Box<dyn QuestionBank> {
    get_bank("wellbeing_screen").expect("wellbeing_screen is registered")
}

fn uniform(option_id: &str) -> AnswerSet {
    bank()
        .questions()
        .iter()
        .map(|q| (q.id.clone(), option_id.to_string()))
        .collect()
}

#[test]
fn every_complete_answer_set_yields_one_label() {
    let bank = bank();
    for option in frequency_options() {
        let label = score(bank.questions(), &uniform(&option.id)).unwrap();
        assert!(ConditionLabel::ALL.contains(&label));
    }
}

#[test]
fn all_zero_answers_tie_and_resolve_to_depression() {
    let bank = bank();
    let answers = uniform("0");

    let totals = bank.condition_totals(&answers).unwrap();
    assert!(totals.values().all(|t| *t == 0));
    assert_eq!(bank.score(&answers).unwrap(), ConditionLabel::Depression);
}

#[test]
fn all_several_days_is_a_three_way_tie_resolved_to_depression() {
    let bank = bank();
    let totals = bank.condition_totals(&uniform("1")).unwrap();

    assert_eq!(totals[&ConditionLabel::Depression], 6);
    assert_eq!(totals[&ConditionLabel::Anxiety], 6);
    assert_eq!(totals[&ConditionLabel::Stress], 6);
    assert_eq!(winning_condition(&totals), ConditionLabel::Depression);
}

#[test]
fn nervousness_and_worry_items_at_maximum_score_anxiety() {
    let bank = bank();
    let mut answers = uniform("0");
    answers.select("q2", "3");
    answers.select("q5", "3");

    let totals = bank.condition_totals(&answers).unwrap();
    assert_eq!(totals[&ConditionLabel::Depression], 3);
    assert_eq!(totals[&ConditionLabel::Anxiety], 12);
    assert_eq!(totals[&ConditionLabel::Stress], 6);
    assert_eq!(bank.score(&answers).unwrap(), ConditionLabel::Anxiety);
}

#[test]
fn single_anxiety_only_item_at_maximum_wins_anxiety() {
    let questions = vec![
        Question {
            id: "worry".to_string(),
            prompt: "Constant worrying".to_string(),
            weights: BTreeMap::from([(ConditionLabel::Anxiety, 2)]),
        },
        Question {
            id: "unweighted".to_string(),
            prompt: "Filler".to_string(),
            weights: BTreeMap::new(),
        },
        Question {
            id: "low_mood".to_string(),
            prompt: "Low mood".to_string(),
            weights: BTreeMap::from([(ConditionLabel::Depression, 3)]),
        },
    ];
    let answers: AnswerSet = [("worry", "3"), ("unweighted", "3"), ("low_mood", "0")]
        .into_iter()
        .collect();

    assert_eq!(score(&questions, &answers).unwrap(), ConditionLabel::Anxiety);
}

#[test]
fn oversized_weights_saturate_instead_of_overflowing() {
    let questions = vec![
        Question {
            id: "a".to_string(),
            prompt: "Heavy item".to_string(),
            weights: BTreeMap::from([(ConditionLabel::Stress, u32::MAX)]),
        },
        Question {
            id: "b".to_string(),
            prompt: "Second heavy item".to_string(),
            weights: BTreeMap::from([(ConditionLabel::Stress, u32::MAX / 2)]),
        },
    ];
    let answers: AnswerSet = [("a", "3"), ("b", "3")].into_iter().collect();

    let totals = condition_totals(&questions, frequency_options(), &answers).unwrap();
    assert_eq!(totals[&ConditionLabel::Stress], u32::MAX);
    assert_eq!(totals[&ConditionLabel::Depression], 0);
    assert_eq!(winning_condition(&totals), ConditionLabel::Stress);
}

#[test]
fn tie_between_anxiety_and_stress_keeps_anxiety() {
    let totals = BTreeMap::from([
        (ConditionLabel::Depression, 1),
        (ConditionLabel::Anxiety, 4),
        (ConditionLabel::Stress, 4),
    ]);
    assert_eq!(winning_condition(&totals), ConditionLabel::Anxiety);
}

#[test]
fn scoring_twice_gives_the_same_label() {
    let bank = bank();
    let mut answers = uniform("2");
    answers.select("q3", "3");

    let first = bank.score(&answers).unwrap();
    let second = bank.score(&answers).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, ConditionLabel::Stress);
}

/// Missing answers are rejected rather than counted as zero, which would
/// report a label the user never earned.
#[test]
fn partial_answer_set_is_rejected_not_zero_filled() {
    let bank = bank();
    let mut answers = uniform("3");
    answers.remove("q4");

    assert_eq!(
        bank.score(&answers),
        Err(InstrumentError::IncompleteAnswers {
            missing: vec!["q4".to_string()],
        })
    );
}

/// Unrecognised option ids fail loudly rather than scoring as multiplier 0.
#[test]
fn unknown_option_is_rejected() {
    let bank = bank();
    let mut answers = uniform("1");
    answers.select("q2", "7");

    assert_eq!(
        bank.score(&answers),
        Err(InstrumentError::UnknownOption {
            question_id: "q2".to_string(),
            option_id: "7".to_string(),
        })
    );
}

#[test]
fn answer_for_question_outside_the_bank_is_rejected() {
    let bank = bank();
    let mut answers = uniform("1");
    answers.select("q99", "1");

    assert!(matches!(
        bank.score(&answers),
        Err(InstrumentError::UnknownQuestion { question_id }) if question_id == "q99"
    ));
}

#[test]
fn empty_bank_is_rejected() {
    assert_eq!(
        condition_totals(&[], frequency_options(), &AnswerSet::new()),
        Err(InstrumentError::EmptyBank)
    );
}

#[test]
fn all_answered_requires_every_question() {
    let bank = bank();
    let questions = bank.questions();
    let mut answers = AnswerSet::new();

    for q in questions {
        assert!(!all_answered(&answers, questions));
        answers.select(q.id.clone(), "0");
    }
    assert!(all_answered(&answers, questions));

    answers.remove("q1");
    assert!(!all_answered(&answers, questions));
    assert_eq!(missing_answers(&answers, questions), vec!["q1".to_string()]);
}
