pub mod capability;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;
pub mod templates;
pub mod twiml;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::ServerConfig;
pub use errors::app_error::{AppError, AppResult};
pub use response::HandlerOutput;
pub use state::AppState;
pub use twiml::TwimlResponse;
