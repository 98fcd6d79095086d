pub mod admin;
pub mod board;
pub mod comment;
pub mod post;
pub mod user;

pub use admin::AdminGrant;
pub use board::Board;
pub use comment::Comment;
pub use post::{ContentType, Post};
pub use user::{Profile, User};
