//! Session Handler
//!
//! Lets a client decide which views to offer without trying them first.

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extensions::*;

/// Session Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionResponse {
    /// One of `anonymous`, `customer`, `admin`
    pub role: String,

    pub user_uuid: Option<Uuid>,
    pub name: Option<String>,
}

/// Session Handler
///
/// Reports who the bearer token belongs to, if anyone.
#[endpoint(
    tags("session"),
    summary = "Current Session",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Current viewer"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Session expired or revoked"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Json<SessionResponse> {
    let response = match depot.viewer() {
        None => SessionResponse {
            role: "anonymous".to_string(),
            user_uuid: None,
            name: None,
        },
        Some(viewer) => SessionResponse {
            role: if viewer.is_admin() { "admin" } else { "customer" }.to_string(),
            user_uuid: Some(viewer.user.into_uuid()),
            name: Some(viewer.name.clone()),
        },
    };

    Json(response)
}
