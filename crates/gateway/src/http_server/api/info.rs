use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::GatewayState;

pub const SERVICE_NAME: &str = "MoodyBeats API";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub version: String,
    pub storage: String,
}

pub async fn handler(State(state): State<GatewayState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: SERVICE_NAME.to_string(),
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: state.store().backend().to_string(),
    })
}
