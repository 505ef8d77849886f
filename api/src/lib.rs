use dioxus::prelude::*;
use types::{
    CurrentUser, LANDLORD_AREA, Permission, RouteRequirement,
    maintenance::{MaintenanceRequest, ServiceProvider},
};

/// Who may read and assign maintenance work.
pub fn maintenance_requirement() -> RouteRequirement {
    RouteRequirement::new(LANDLORD_AREA).with_permission(Permission::MAINTENANCE)
}

#[post("/api/current-user")]
pub async fn get_current_user() -> ServerFnResult<Option<CurrentUser>> {
    Ok(server::get_current_user().await)
}

#[post("/api/maintenance")]
pub async fn list_maintenance_requests() -> ServerFnResult<Vec<MaintenanceRequest>> {
    let session = server::require_access(&maintenance_requirement()).await?;
    Ok(server::BACKEND
        .maintenance_requests(&session.access_token)
        .await?)
}

#[post("/api/service-providers")]
pub async fn list_service_providers() -> ServerFnResult<Vec<ServiceProvider>> {
    let session = server::require_access(&maintenance_requirement()).await?;
    Ok(server::BACKEND
        .service_providers(&session.access_token)
        .await?)
}

#[post("/api/maintenance/assign")]
pub async fn assign_service_provider(
    request_id: String,
    provider_id: String,
) -> ServerFnResult<MaintenanceRequest> {
    let session = server::require_access(&maintenance_requirement()).await?;
    let token = &session.access_token;

    let request = server::BACKEND.maintenance_request(token, &request_id).await?;
    if !request.can_assign() {
        return Err(types::Error::conflict(format!(
            "request is {} and can no longer be assigned",
            request.status.label().to_lowercase()
        ))
        .into());
    }

    server::BACKEND
        .assign_provider(token, &request_id, &provider_id)
        .await?;
    tracing::info!(
        user = %session.user.id,
        request = %request_id,
        provider = %provider_id,
        "assigned service provider"
    );

    Ok(server::BACKEND.maintenance_request(token, &request_id).await?)
}
