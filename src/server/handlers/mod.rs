//! HTTP request handlers for the web server.

mod chat;
mod feedback;
mod health;
mod info;
mod static_files;

// Re-export handlers for use by the router
pub use chat::{ask, chat};
pub use feedback::{stats, submit_feedback};
pub use health::health;
pub use info::{api_info, architecture, legal, roadmap, user_stories};
pub use static_files::index;
