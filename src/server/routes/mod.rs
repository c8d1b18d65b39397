mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

use crate::db::Category;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use super::error::{ApiError, ApiResponse};

/// `{id: type}` as served to clients.
fn category_map(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}
