// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no credentials) → Protected (requester credentials in the body)
// → Elevated (requester must be an administrator)
//
// There are no sessions or tokens: every mutating request carries
// "requester": {"name", "password"} and is verified on its own.
pub mod elevated; // Tier 3: administrator credentials (/export, /import, /admins/*)
pub mod protected; // Tier 2: any valid credentials (writes)
pub mod public; // Tier 1: anonymous reads, registration, health
