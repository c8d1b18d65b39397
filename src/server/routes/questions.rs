use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        NewQuestion, Question,
    },
    server::{app::AppState, pagination::paginate, pagination::PageQuery},
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::{category_map, ApiError, ApiResponse};

#[derive(Deserialize)]
struct CreateQuestion {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
}

impl CreateQuestion {
    /// All four fields present, with non-blank question and answer text.
    fn validate(self) -> Option<NewQuestion> {
        let question = self.question.filter(|q| !q.trim().is_empty())?;
        let answer = self.answer.filter(|a| !a.trim().is_empty())?;
        Some(NewQuestion {
            question,
            answer,
            difficulty: self.difficulty?,
            category: self.category?,
        })
    }
}

#[derive(Deserialize)]
struct SearchRequest {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: BTreeMap<i64, String>,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
    message: &'static str,
    total_questions: i64,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
    message: &'static str,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    PageQuery { page }: PageQuery,
) -> ApiResponse<Json<QuestionsPage>> {
    let questions = questions::get_all_questions(&pool).await?;
    let total_questions = questions.len();
    let questions = paginate(questions, page);
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    let categories = categories::get_all_categories(&pool).await?;
    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions,
        categories: category_map(categories),
        current_category: None,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<Deleted>> {
    let Path(id) = path?;
    questions::delete_question(&pool, id)
        .await
        .map_err(ApiError::unprocessable)?;
    QUESTIONS_DELETED.inc();
    tracing::info!("Deleted question {id}");

    Ok(Json(Deleted {
        success: true,
        deleted: id,
        message: "successfully deleted",
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    payload: Result<Json<CreateQuestion>, JsonRejection>,
) -> ApiResponse<(StatusCode, Json<Created>)> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!("Bad question body: {rejection}");
        ApiError::Unprocessable
    })?;
    let new_question = body.validate().ok_or(ApiError::Unprocessable)?;

    let id = questions::create_question(&pool, &new_question)
        .await
        .map_err(ApiError::unprocessable)?;
    QUESTIONS_CREATED.inc();
    tracing::info!("Created question {id} in category {}", new_question.category);

    Ok((
        StatusCode::CREATED,
        Json(Created {
            success: true,
            created: id,
            message: "successfully created!",
            total_questions: questions::count_questions(&pool).await?,
        }),
    ))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    PageQuery { page }: PageQuery,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResponse<Json<SearchResults>> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!("Bad search body: {rejection}");
        ApiError::Unprocessable
    })?;
    let term = body
        .search_term
        .filter(|t| !t.trim().is_empty())
        .ok_or(ApiError::Unprocessable)?;

    let found = questions::search_questions(&pool, &term).await?;
    let total_questions = found.len();
    let questions = paginate(found, page);
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(SearchResults {
        success: true,
        questions,
        total_questions,
        current_category: None,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
