pub mod api;
pub mod commands;
pub mod logging;

pub use api::{router, AppState};
pub use logging::init_logging;
