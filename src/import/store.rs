use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Postgres, Transaction};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewQuestion, Question, Section};

/// Failure of a single row insert
#[derive(Debug, Error)]
pub enum InsertError {
    /// The store refused this row (constraint, bad value); siblings carry on
    #[error("{0}")]
    Rejected(String),

    /// The store itself failed; the whole import is abandoned
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Storage the importer needs: section lookup and a unit of work per upload
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn find_section(&self, section_id: Uuid) -> Result<Option<Section>, DatabaseError>;

    /// Open the unit of work for one upload. Concurrent imports into the same
    /// section are serialized from here until commit or rollback.
    async fn begin_import(&self, section_id: Uuid) -> Result<Box<dyn ImportTransaction>, DatabaseError>;

    async fn questions_in_section(&self, section_id: Uuid) -> Result<Vec<Question>, DatabaseError>;
}

#[async_trait]
pub trait ImportTransaction: Send {
    /// Highest display order in the section, read inside this unit of work
    async fn max_order(&mut self) -> Result<Option<i32>, DatabaseError>;

    async fn insert_question(&mut self, question: &NewQuestion) -> Result<Question, InsertError>;

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError>;

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError>;
}

pub struct PgQuestionStore {
    pool: PgPool,
}

impl PgQuestionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionStore for PgQuestionStore {
    async fn find_section(&self, section_id: Uuid) -> Result<Option<Section>, DatabaseError> {
        let section = sqlx::query_as::<_, Section>(
            r#"SELECT id, insurance_provider_id, title, description, "order", is_active, created_at
               FROM sections WHERE id = $1"#,
        )
        .bind(section_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(section)
    }

    async fn begin_import(&self, section_id: Uuid) -> Result<Box<dyn ImportTransaction>, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(section_id.to_string())
            .execute(&mut *tx)
            .await?;

        Ok(Box::new(PgImportTransaction { tx, section_id }))
    }

    async fn questions_in_section(&self, section_id: Uuid) -> Result<Vec<Question>, DatabaseError> {
        let questions = sqlx::query_as::<_, Question>(
            r#"SELECT * FROM questions WHERE section_id = $1 ORDER BY "order" ASC"#,
        )
        .bind(section_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }
}

struct PgImportTransaction {
    tx: Transaction<'static, Postgres>,
    section_id: Uuid,
}

#[async_trait]
impl ImportTransaction for PgImportTransaction {
    async fn max_order(&mut self) -> Result<Option<i32>, DatabaseError> {
        let max = sqlx::query_scalar::<_, Option<i32>>(
            r#"SELECT MAX("order") FROM questions WHERE section_id = $1"#,
        )
        .bind(self.section_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(max)
    }

    async fn insert_question(&mut self, question: &NewQuestion) -> Result<Question, InsertError> {
        // A failed statement aborts the whole Postgres transaction, so each row
        // gets its own savepoint
        sqlx::query("SAVEPOINT import_row")
            .execute(&mut *self.tx)
            .await
            .map_err(DatabaseError::from)?;

        let inserted = sqlx::query_as::<_, Question>(
            r#"INSERT INTO questions (id, section_id, type, label, placeholder, required, options, "order")
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING *"#,
        )
        .bind(question.id)
        .bind(question.section_id)
        .bind(question.question_type.as_str())
        .bind(&question.label)
        .bind(&question.placeholder)
        .bind(question.required)
        .bind(question.options.clone().map(Json))
        .bind(question.order)
        .fetch_one(&mut *self.tx)
        .await;

        match inserted {
            Ok(row) => {
                sqlx::query("RELEASE SAVEPOINT import_row")
                    .execute(&mut *self.tx)
                    .await
                    .map_err(DatabaseError::from)?;
                Ok(row)
            }
            Err(sqlx::Error::Database(db_err)) => {
                debug!("Row insert rejected for question {}: {}", question.id, db_err.message());
                sqlx::query("ROLLBACK TO SAVEPOINT import_row")
                    .execute(&mut *self.tx)
                    .await
                    .map_err(DatabaseError::from)?;
                Err(InsertError::Rejected(db_err.message().to_string()))
            }
            Err(e) => Err(InsertError::Database(e.into())),
        }
    }

    async fn commit(self: Box<Self>) -> Result<(), DatabaseError> {
        let PgImportTransaction { tx, .. } = *self;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DatabaseError> {
        let PgImportTransaction { tx, .. } = *self;
        tx.rollback().await?;
        Ok(())
    }
}
