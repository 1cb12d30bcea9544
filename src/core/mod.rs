pub mod matcher;
pub mod payload;
pub mod token;
pub mod workflow;

pub use crate::domain::model::{ClientRecord, ProfileRequest, ProfileResponse};
pub use crate::domain::ports::{CacheNotifier, ConfigProvider, CrmClient};
pub use crate::utils::error::Result;
