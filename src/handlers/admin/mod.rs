// handlers/admin/mod.rs - Admin handlers
//
// Security Level: valid JWT plus the admin role, enforced per handler by the
// AdminUser extractor (403 "Insufficient permissions" otherwise).
// Route Prefix: /api, sharing paths with the protected read handlers.

pub mod bulk_upload;
pub mod providers;
pub mod questions;
pub mod sections;
pub mod stats;
pub mod templates;
pub mod users;

pub use bulk_upload::post as question_bulk_upload;

pub use providers::delete as provider_delete;
pub use providers::post as provider_post;
pub use providers::put as provider_put;

pub use sections::delete as section_delete;
pub use sections::post as section_post;
pub use sections::put as section_put;
pub use sections::question_post as section_question_post;
pub use sections::reorder as section_questions_reorder;

pub use questions::delete as question_delete;
pub use questions::list as question_list;
pub use questions::put as question_put;

pub use templates::csv as template_csv;
pub use templates::excel as template_excel;

pub use users::delete as user_delete;
pub use users::get as user_get;
pub use users::list as user_list;
pub use users::put as user_put;

pub use stats::admin as stats_admin;
