// handlers/elevated/mod.rs - Elevated handlers (administrator required)
//
// Security Level: Verified credentials of a user in the administrators collection
// Routes: POST /export, POST /import, PUT/DELETE /admins/:user_id
//
// Export returns stored password hashes so an import elsewhere keeps logins
// working; treat dumps as secrets.

pub mod admins;
pub mod transfer;
