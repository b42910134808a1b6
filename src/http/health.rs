//! Liveness endpoint.

use axum::{routing::get, routing::MethodRouter, Json};
use serde::{Deserialize, Serialize};

use crate::config::Role;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub service: String,
    pub version: String,
    pub status: String,
}

/// `GET /health` for the given role.
pub fn health_route<S>(role: Role) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    get(move || async move {
        Json(HealthStatus {
            service: role.as_str().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            status: "operational".to_string(),
        })
    })
}
