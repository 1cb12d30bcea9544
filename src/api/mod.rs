//! HTTP endpoints exposed to the voice-assistant integration.
//!
//! - [`create`] - `POST /create`, runs the profile creation workflow
//! - [`health`] - `GET /health`, liveness probe

mod create;
mod health;

pub use create::create;
pub use health::health;
