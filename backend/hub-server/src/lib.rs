pub mod debug;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

pub use error::{Result, ServerError};
pub use routes::build_router;
