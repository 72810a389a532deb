//! Browse endpoint / 浏览接口
//!
//! One flat path in, one JSON body out: the bucket collection for the
//! root, one directory level for a prefix, or base64 object content for
//! an exact key. Errors are in-band (`error` field) under HTTP 200.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use s3list_backend::s3::{self, bucket_entries, fetch_object_entry, translate_page, Resolution};

use crate::state::AppState;

/// GET /api/s3/files - 根路径，列出所有存储桶
pub async fn browse_root(State(state): State<Arc<AppState>>) -> Json<Value> {
    browse_path(&state, "/").await
}

/// GET /api/s3/files/*path - 列出目录或获取单个对象
pub async fn browse(State(state): State<Arc<AppState>>, Path(path): Path<String>) -> Json<Value> {
    browse_path(&state, &format!("/{}", path)).await
}

async fn browse_path(state: &AppState, raw_path: &str) -> Json<Value> {
    match serve(state, raw_path).await {
        Ok(Some(body)) => Json(body),
        Ok(None) => Json(json!({
            "error": 404,
            "message": format!("{} could not be found.", raw_path),
        })),
        Err(e) => {
            tracing::error!("Browse failed for {}: {:#}", raw_path, e);
            Json(json!({
                "error": 500,
                "message": format!("Path: {} Error: {}", raw_path, e),
            }))
        }
    }
}

/// Resolve, list, translate. `Ok(None)` is the not-found condition.
///
/// Every storage call is attempted exactly once; retry policy, if any,
/// belongs to the transport underneath.
async fn serve(state: &AppState, raw_path: &str) -> anyhow::Result<Option<Value>> {
    let request = s3::resolve(raw_path);
    let handle = state.clients.handle()?;

    let Some(bucket) = request.bucket else {
        // Root: bucket collection; an empty account is still a success
        let buckets = handle.list_buckets().await?;
        return Ok(Some(serde_json::to_value(bucket_entries(buckets))?));
    };

    let page = handle.list_page(&bucket, &request.key_prefix).await?;

    match translate_page(&bucket, &request.key_prefix, &page) {
        Resolution::Object { key, content_type } => {
            let entry = fetch_object_entry(&handle, &bucket, &key, content_type).await?;
            Ok(Some(serde_json::to_value(entry)?))
        }
        Resolution::Entries(entries) if entries.is_empty() => Ok(None),
        Resolution::Entries(entries) => Ok(Some(serde_json::to_value(entries)?)),
    }
}
