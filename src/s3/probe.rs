//! Access probe / 访问探测
//!
//! One list-buckets round-trip decides whether a client handle currently
//! grants access. The outcome is data, not control flow: callers get a
//! named failure kind instead of an unwinding exception.

use s3::error::S3Error;
use thiserror::Error;

use super::client::ClientHandle;

/// Why a probe failed / 探测失败原因
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Endpoint unreachable or protocol-level failure
    #[error("storage endpoint unreachable: {0}")]
    Transport(S3Error),
    /// Credentials rejected or insufficient permission
    #[error("credentials rejected: {0}")]
    Authorization(S3Error),
}

fn classify(err: S3Error) -> ProbeError {
    match err {
        S3Error::HttpFailWithBody(code, _) if code == 401 || code == 403 => {
            ProbeError::Authorization(err)
        }
        _ => ProbeError::Transport(err),
    }
}

/// Perform one list-buckets round-trip against the handle.
///
/// Any response, including an empty bucket list, means access; the bucket
/// names themselves are discarded here.
pub async fn check_access(handle: &ClientHandle) -> Result<(), ProbeError> {
    handle.list_buckets().await.map(|_| ()).map_err(classify)
}

/// Probe a handle, swallowing the failure into a boolean.
///
/// The cause is logged for operators; it never reaches the client.
pub async fn probe(handle: &ClientHandle) -> bool {
    match check_access(handle).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("S3 access probe failed: {}", e);
            false
        }
    }
}
