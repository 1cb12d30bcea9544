pub mod adapters;
pub mod api;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::app::{build_service, RelayService};
pub use crate::config::RelayConfig;
pub use crate::core::workflow::ProfileService;
pub use crate::domain::model::{ProfileRequest, ProfileResponse};
pub use crate::utils::error::{RelayError, Result};
