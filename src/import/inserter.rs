use thiserror::Error;
use tracing::{debug, warn};

use crate::database::manager::DatabaseError;
use crate::database::models::{NewQuestion, Question};

use super::store::{ImportTransaction, InsertError};
use super::validator::RowError;

/// Result of a committed batch
#[derive(Debug)]
pub struct BatchOutcome {
    pub inserted: Vec<Question>,
    pub failed: Vec<RowError>,
}

#[derive(Debug, Error)]
pub enum BatchError {
    /// Every eligible row was refused; the unit of work was rolled back
    #[error("All rows failed to insert")]
    AllRowsFailed(Vec<RowError>),

    /// Infrastructure failure; the unit of work was rolled back
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Insert rows one by one inside `tx`, then commit or roll back once.
///
/// Rows are `(source row number, question)`. A refused row is recorded and the
/// loop continues. Nothing is committed when every row was refused.
pub async fn insert_batch(
    mut tx: Box<dyn ImportTransaction>,
    rows: Vec<(usize, NewQuestion)>,
) -> Result<BatchOutcome, BatchError> {
    let eligible = rows.len();
    let mut results: Vec<Result<Question, RowError>> = Vec::with_capacity(eligible);

    for (row_number, question) in &rows {
        match tx.insert_question(question).await {
            Ok(inserted) => results.push(Ok(inserted)),
            Err(InsertError::Rejected(message)) => {
                debug!("Row {} rejected by store: {}", row_number, message);
                results.push(Err(RowError::new(*row_number, message)));
            }
            Err(InsertError::Database(e)) => {
                abandon(tx).await;
                return Err(BatchError::Database(e));
            }
        }
    }

    let (inserted, failed) = results.into_iter().fold(
        (Vec::new(), Vec::new()),
        |(mut inserted, mut failed), result| {
            match result {
                Ok(q) => inserted.push(q),
                Err(e) => failed.push(e),
            }
            (inserted, failed)
        },
    );

    if inserted.is_empty() && eligible > 0 {
        tx.rollback().await?;
        return Err(BatchError::AllRowsFailed(failed));
    }

    tx.commit().await?;
    Ok(BatchOutcome { inserted, failed })
}

async fn abandon(tx: Box<dyn ImportTransaction>) {
    if let Err(e) = tx.rollback().await {
        warn!("Rollback after failed import also failed: {}", e);
    }
}
