use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};

use gamehub_core::{BackupId, RestoreJobId};
use gamehub_services::backup::{Backup, BackupFilter, BackupSchedule, CreateBackupRequest, RestoreJob};
use gamehub_services::Page;

use crate::app::errors::{ApiError, Operation};
use crate::app::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app::routes::common::{created, no_content};
use crate::app::services::AppServices;
use crate::context::Caller;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_backups).post(create_backup))
        .route("/schedule", get(get_schedule).put(update_schedule))
        .route("/restores/:restore_id", get(get_restore_job))
        .route("/:backup_id", get(get_backup).delete(delete_backup))
        .route("/:backup_id/restore", post(restore_backup))
}

pub async fn list_backups(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiQuery(filter): ApiQuery<BackupFilter>,
) -> Result<Json<Page<Backup>>, ApiError> {
    let op = Operation::new("backups.list").caller(caller);
    services
        .errors
        .check(&op, services.backups.list_backups(caller, filter).await)
        .map(Json)
}

pub async fn create_backup(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiJson(body): ApiJson<CreateBackupRequest>,
) -> Result<Response, ApiError> {
    let op = Operation::new("backups.create").caller(caller);
    let backup = services
        .errors
        .check(&op, services.backups.create_backup(caller, body).await)?;

    Ok(created(format!("/api/backups/{}", backup.id), backup))
}

pub async fn get_backup(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(backup_id): ApiPath<BackupId>,
) -> Result<Json<Backup>, ApiError> {
    let op = Operation::new("backups.get")
        .caller(caller)
        .entity("backup_id", backup_id);
    services
        .errors
        .check(&op, services.backups.get_backup(caller, backup_id).await)
        .map(Json)
}

pub async fn delete_backup(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(backup_id): ApiPath<BackupId>,
) -> Result<StatusCode, ApiError> {
    let op = Operation::new("backups.delete")
        .caller(caller)
        .entity("backup_id", backup_id);
    services
        .errors
        .check(&op, services.backups.delete_backup(caller, backup_id).await)?;
    Ok(no_content())
}

pub async fn restore_backup(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(backup_id): ApiPath<BackupId>,
) -> Result<Json<RestoreJob>, ApiError> {
    let op = Operation::new("backups.restore")
        .caller(caller)
        .entity("backup_id", backup_id);
    services
        .errors
        .check(&op, services.backups.restore_backup(caller, backup_id).await)
        .map(Json)
}

pub async fn get_restore_job(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiPath(restore_id): ApiPath<RestoreJobId>,
) -> Result<Json<RestoreJob>, ApiError> {
    let op = Operation::new("backups.get_restore_job")
        .caller(caller)
        .entity("restore_id", restore_id);
    services
        .errors
        .check(&op, services.backups.get_restore_job(caller, restore_id).await)
        .map(Json)
}

pub async fn get_schedule(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
) -> Result<Json<BackupSchedule>, ApiError> {
    let op = Operation::new("backups.get_schedule").caller(caller);
    services
        .errors
        .check(&op, services.backups.get_schedule(caller).await)
        .map(Json)
}

pub async fn update_schedule(
    Extension(services): Extension<Arc<AppServices>>,
    Caller(caller): Caller,
    ApiJson(body): ApiJson<BackupSchedule>,
) -> Result<Json<BackupSchedule>, ApiError> {
    let op = Operation::new("backups.update_schedule").caller(caller);
    services
        .errors
        .check(&op, services.backups.update_schedule(caller, body).await)
        .map(Json)
}
