//! Picking the next quiz question.
//!
//! The eligible set is computed before anything random happens, so a
//! category whose questions have all been served ends the quiz instead of
//! re-rolling forever.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::db::Question;

/// Category id meaning "questions from every category".
pub const ANY_CATEGORY: i64 = 0;

/// Questions from `candidates` that were not served yet and belong to
/// `category` (any category for [`ANY_CATEGORY`]).
pub fn eligible_questions(
    candidates: Vec<Question>,
    category: i64,
    previous: &[i64],
) -> Vec<Question> {
    let served: HashSet<i64> = previous.iter().copied().collect();
    candidates
        .into_iter()
        .filter(|q| category == ANY_CATEGORY || q.category == category)
        .filter(|q| !served.contains(&q.id))
        .collect()
}

/// Uniform pick from `eligible`, `None` once it is exhausted.
pub fn pick_question<R: Rng + ?Sized>(eligible: &[Question], rng: &mut R) -> Option<Question> {
    eligible.choose(rng).cloned()
}
