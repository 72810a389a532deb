//! Request path resolution / 请求路径解析
//!
//! Maps the flat path carried by a browse request onto the bucket/prefix
//! pair it addresses, or recognizes it as the root (bucket list) request.

/// Resolved form of a browse request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    /// Target bucket; `None` means the root listing was requested
    pub bucket: Option<String>,
    /// Key prefix inside the bucket, possibly empty
    pub key_prefix: String,
}

impl RequestPath {
    /// Whether this is the root (bucket list) request
    pub fn is_root(&self) -> bool {
        self.bucket.is_none()
    }
}

/// Resolve a raw request path into a `RequestPath`.
///
/// The input is the portion of the URL path after the route prefix and
/// always starts with `/` (an empty string is treated as `/`). The first
/// segment is the bucket name, everything after it is the key prefix.
/// A path with no second `/` is not an error: `/my-bucket` lists the top
/// level of the bucket with an empty prefix. Bucket-name legality is not
/// checked here; illegal names surface as storage errors downstream.
pub fn resolve(raw_path: &str) -> RequestPath {
    let trimmed = raw_path.trim_start_matches('/');

    if trimmed.is_empty() {
        return RequestPath {
            bucket: None,
            key_prefix: String::new(),
        };
    }

    match trimmed.split_once('/') {
        Some((bucket, rest)) => RequestPath {
            bucket: Some(bucket.to_string()),
            key_prefix: rest.to_string(),
        },
        None => RequestPath {
            bucket: Some(trimmed.to_string()),
            key_prefix: String::new(),
        },
    }
}
