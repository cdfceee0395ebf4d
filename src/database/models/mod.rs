pub mod provider;
pub mod question;
pub mod response;
pub mod section;
pub mod user;

use std::str::FromStr;

use sqlx::{postgres::PgRow, Row};

use crate::types::UnknownVariant;

pub use provider::InsuranceProvider;
pub use question::{NewQuestion, Question, QuestionOption};
pub use response::{FormResponse, ResponseDetail};
pub use section::{Section, SectionWithQuestions};
pub use user::{UserCredentials, UserProfile};

/// Decode a text column into one of the closed enums in `crate::types`
pub(crate) fn parse_column<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = UnknownVariant>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: UnknownVariant| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
