//! Bulk question import: parse an uploaded CSV or spreadsheet, validate each
//! row, synthesize options, allocate display orders and insert the batch in a
//! single unit of work.

pub mod inserter;
pub mod options;
pub mod orchestrator;
pub mod ordering;
pub mod parser;
pub mod row;
pub mod store;
pub mod template;
pub mod validator;

pub use orchestrator::{import_questions, ImportError, UploadRequest, UploadResult, UploadedFile};
pub use parser::ParseError;
pub use store::{ImportTransaction, InsertError, PgQuestionStore, QuestionStore};
pub use template::TemplateError;
pub use validator::RowError;
