// handlers/mod.rs - 3-tier handler layout
//
// Public (no auth) → Protected (any authenticated role) → Admin (admin role)
//
pub mod admin;     // Tier 3: AdminUser extractor on every handler
pub mod protected; // Tier 2: JWT required (/api/*)
pub mod public;    // Tier 1: no authentication (/api/auth/register, /api/auth/login, /api/health)
