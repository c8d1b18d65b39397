use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Questions whose text contains `term`, ignoring case. Folding happens here
/// rather than in SQLite, whose `LIKE` only folds ASCII letters.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let needle = term.to_lowercase();
    let questions = get_all_questions(pool).await?;
    Ok(questions
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&needle))
        .collect())
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn create_question(pool: &SqlitePool, question: &NewQuestion) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&question.question)
    .bind(&question.answer)
    .bind(question.category)
    .bind(question.difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns `RowNotFound` when no question has this id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<()> {
    let deleted = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();

    if deleted == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}

/// Inserts or overwrites questions by id, keeping the ids from the import.
pub async fn import_questions(
    conn: &mut SqliteConnection,
    questions: &[Question],
) -> sqlx::Result<()> {
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::pool_with_categories;

    fn new_question(question: &str, category: i64) -> NewQuestion {
        NewQuestion {
            question: question.to_owned(),
            answer: "answer".to_owned(),
            category,
            difficulty: 1,
        }
    }

    #[tokio::test]
    async fn create_then_delete() {
        let pool = pool_with_categories(&[(1, "Science")]).await;
        let id = create_question(&pool, &new_question("What is H2O?", 1))
            .await
            .unwrap();

        let stored = get_question(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.question, "What is H2O?");
        assert_eq!(count_questions(&pool).await.unwrap(), 1);

        delete_question(&pool, id).await.unwrap();
        assert!(get_question(&pool, id).await.unwrap().is_none());
        assert!(matches!(
            delete_question(&pool, id).await,
            Err(sqlx::Error::RowNotFound)
        ));
    }

    #[tokio::test]
    async fn create_with_unknown_category_fails() {
        let pool = pool_with_categories(&[(1, "Science")]).await;
        assert!(create_question(&pool, &new_question("orphan", 9)).await.is_err());
        assert_eq!(count_questions(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let pool = pool_with_categories(&[(1, "Science")]).await;
        for q in ["Who discovered Penicillin?", "What is 50% of 10?", "Largest planet"] {
            create_question(&pool, &new_question(q, 1)).await.unwrap();
        }

        let found = search_questions(&pool, "penicillin").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Who discovered Penicillin?");

        let found = search_questions(&pool, "0%").await.unwrap();
        assert_eq!(found.len(), 1);

        assert!(search_questions(&pool, "%").await.unwrap().len() == 1);
        assert!(search_questions(&pool, "nothing like it").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let pool = pool_with_categories(&[(2, "Art")]).await;
        create_question(&pool, &new_question("Who painted ÉTÉ À PARIS?", 2))
            .await
            .unwrap();
        create_question(&pool, &new_question("Who painted the Mona Lisa?", 2))
            .await
            .unwrap();

        let found = search_questions(&pool, "été à paris").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].question, "Who painted ÉTÉ À PARIS?");
        assert_eq!(search_questions(&pool, "WHO PAINTED").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn questions_filtered_by_category() {
        let pool = pool_with_categories(&[(1, "Science"), (2, "Art")]).await;
        create_question(&pool, &new_question("s1", 1)).await.unwrap();
        create_question(&pool, &new_question("a1", 2)).await.unwrap();
        create_question(&pool, &new_question("s2", 1)).await.unwrap();

        let science = get_questions_for_category(&pool, 1).await.unwrap();
        let texts: Vec<&str> = science.iter().map(|q| q.question.as_str()).collect();
        assert_eq!(texts, vec!["s1", "s2"]);
        assert_eq!(get_all_questions(&pool).await.unwrap().len(), 3);
    }
}
