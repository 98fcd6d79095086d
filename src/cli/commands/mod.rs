pub mod id;
pub mod password;
pub mod transfer;
