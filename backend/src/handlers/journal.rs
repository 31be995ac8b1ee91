use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use crate::auth::middleware::Identity;
use crate::dto::{
    AppJson, CreateEntryRequest, EntryCreatedResponse, EntryListResponse, ListEntriesQuery,
    MessageResponse, StatsResponse,
};
use crate::error::{AppError, AppResult};
use crate::AppState;

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    AppJson(body): AppJson<CreateEntryRequest>,
) -> AppResult<Json<EntryCreatedResponse>> {
    let entry = state
        .journal
        .append(&identity.key, &body.entry, body.mood.as_deref())
        .await?;

    Ok(Json(EntryCreatedResponse {
        success: true,
        entry,
        message: "Entry added successfully".into(),
    }))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ListEntriesQuery>,
) -> AppResult<Json<EntryListResponse>> {
    let limit = query.limit()?;
    let entries = state.journal.list(&identity.key, limit).await;

    Ok(Json(EntryListResponse {
        success: true,
        count: entries.len(),
        entries,
    }))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    if !state.journal.delete(&identity.key, id).await? {
        return Err(AppError::NotFound("Entry not found".into()));
    }

    Ok(Json(MessageResponse::ok("Entry deleted successfully")))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<StatsResponse>> {
    let stats = state.journal.stats(&identity.key).await;
    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
