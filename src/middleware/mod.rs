pub mod extract;
pub mod response;

pub use extract::{JsonBody, PathParams};
pub use response::{ApiResponse, ApiResult};
