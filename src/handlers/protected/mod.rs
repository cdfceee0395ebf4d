// handlers/protected/mod.rs - Handlers open to any authenticated role
//
// Security Level: valid JWT (jwt_auth_middleware), AuthUser in extensions
// Route Prefix: /api
// Response visibility is narrowed per role inside the services.

pub mod profile;
pub mod providers;
pub mod responses;
pub mod sections;
pub mod stats;

pub use profile::get as profile_get;

pub use providers::get as provider_get;
pub use providers::list as provider_list;

pub use sections::get as section_get;
pub use sections::list as section_list;
pub use sections::questions as section_questions;

pub use responses::for_section as response_for_section;
pub use responses::get as response_get;
pub use responses::list as response_list;
pub use responses::save as response_save;
pub use responses::submit as response_submit;

pub use stats::agent as stats_agent;
