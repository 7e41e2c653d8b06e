use rand::Rng;
use rand::seq::SliceRandom;

use tutor_core::model::Task;

/// One answer as shown to the user, tagged with its index in the task's fixed
/// choice order (see [`Task::choice`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Choice {
    pub index: usize,
    pub text: String,
}

/// Answer set for a task: the correct answer and every distractor, shuffled.
///
/// Uses a Fisher-Yates shuffle, so every ordering is equally likely.
#[must_use]
pub fn build_answer_set<R: Rng + ?Sized>(task: &Task, rng: &mut R) -> Vec<Choice> {
    let mut choices: Vec<Choice> = (0..task.choice_count())
        .filter_map(|index| {
            task.choice(index).map(|text| Choice {
                index,
                text: text.to_owned(),
            })
        })
        .collect();
    choices.shuffle(rng);
    choices
}

/// Exact match against the canonical answer. No trimming or case folding.
#[must_use]
pub fn validate(task: &Task, submitted: &str) -> bool {
    task.answer() == submitted
}
