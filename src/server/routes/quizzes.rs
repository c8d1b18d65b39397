use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Question,
    },
    quiz::{self, ANY_CATEGORY},
    server::app::AppState,
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::{ApiError, ApiResponse};

#[derive(Deserialize)]
struct QuizRequest {
    previous_questions: Option<Vec<i64>>,
    quiz_category: Option<QuizCategory>,
}

// clients also send the category `type`, which is not needed here
#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<Question>,
}

async fn play_quiz(
    State(pool): State<SqlitePool>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<QuizResponse>> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!("Bad quiz body: {rejection}");
        ApiError::BadRequest
    })?;
    let (previous, category) = match (body.previous_questions, body.quiz_category) {
        (Some(previous), Some(category)) => (previous, category.id),
        _ => return Err(ApiError::BadRequest),
    };

    let candidates = if category == ANY_CATEGORY {
        questions::get_all_questions(&pool).await?
    } else {
        categories::get_category(&pool, category)
            .await?
            .ok_or(ApiError::Unprocessable)?;
        questions::get_questions_for_category(&pool, category).await?
    };

    let eligible = quiz::eligible_questions(candidates, category, &previous);
    let question = quiz::pick_question(&eligible, &mut rand::thread_rng());
    match &question {
        Some(q) => {
            let label = category.to_string();
            QUIZ_QUESTIONS_SERVED
                .with_label_values(&[label.as_str()])
                .inc();
            tracing::debug!("Serving question {} from {} eligible", q.id, eligible.len());
        }
        None => tracing::debug!("Quiz exhausted for category {category}"),
    }

    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
