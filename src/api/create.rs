use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};

use crate::core::workflow::ProfileService;
use crate::domain::model::{ProfileRequest, ProfileResponse};
use crate::domain::ports::{CacheNotifier, CrmClient};

/// `POST /create`. Always answers 200; callers inspect `success`.
pub async fn create<C, N>(
    State(service): State<Arc<ProfileService<C, N>>>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Json<ProfileResponse>
where
    C: CrmClient + 'static,
    N: CacheNotifier + 'static,
{
    match payload {
        Ok(Json(request)) => Json(service.create_profile(request).await),
        Err(rejection) => {
            tracing::warn!("Rejected malformed create body: {}", rejection.body_text());
            Json(ProfileResponse::failure(format!(
                "Invalid request body: {}",
                rejection.body_text()
            )))
        }
    }
}
