use axum::extract::{FromRequestParts, Query};
use serde::Deserialize;

use super::error::ApiError;

pub const QUESTIONS_PER_PAGE: usize = 10;

/// `?page=N`, 1-based, defaulting to the first page.
#[derive(Debug, Deserialize, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct PageQuery {
    #[serde(default = "first_page")]
    pub page: i64,
}

fn first_page() -> i64 {
    1
}

/// Slice `[(page - 1) * 10, page * 10)` out of `items`. Pages before the
/// first or past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: i64) -> Vec<T> {
    let start = page
        .checked_sub(1)
        .and_then(|p| usize::try_from(p).ok())
        .and_then(|p| p.checked_mul(QUESTIONS_PER_PAGE));
    match start {
        Some(start) => items
            .into_iter()
            .skip(start)
            .take(QUESTIONS_PER_PAGE)
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_sizes_follow_item_count() {
        for n in 0..35i64 {
            let items: Vec<i64> = (0..n).collect();
            for k in 1..6i64 {
                let expected = (n - 10 * (k - 1)).clamp(0, 10) as usize;
                assert_eq!(paginate(items.clone(), k).len(), expected, "n={n} k={k}");
            }
        }
    }

    #[test]
    fn second_page_of_nineteen() {
        let items: Vec<i64> = (1..=19).collect();
        assert_eq!(paginate(items, 2), (11..=19).collect::<Vec<_>>());
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items: Vec<i64> = (0..25).collect();
        assert!(paginate(items.clone(), 0).is_empty());
        assert!(paginate(items.clone(), -3).is_empty());
        assert!(paginate(items.clone(), 10_000_000).is_empty());
        assert!(paginate(items.clone(), i64::MAX).is_empty());
        assert!(paginate(items, i64::MIN).is_empty());
    }
}
