pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod state;
pub mod sync;
pub mod utils;

pub use api::ApiClient;
pub use config::Config;
pub use error::{AppError, Result};
pub use session::{AuthUser, Session, SessionStore};
pub use state::ClientState;
