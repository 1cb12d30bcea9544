// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod cache_notify;
pub mod crm_http;

pub use cache_notify::HttpCacheNotifier;
pub use crm_http::HttpCrmClient;
