//! S3 client handle and factory / S3客户端句柄与工厂
//!
//! The factory owns the only mutable shared state in the service: the
//! current credential triple and the client handle cached for it. Setting
//! new credentials swaps the triple wholesale and drops the cached handle;
//! the next caller rebuilds one lazily. A handle built just before a swap
//! may serve one more call with the old credentials, which is tolerated
//! because the auth endpoint always re-probes instead of trusting a cached
//! result.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::Region;

use crate::config::S3Settings;
use super::listing::{ListingPage, ObjectSummary};

/// Explicit S3 credentials / 显式S3凭证
///
/// All three fields empty selects the ambient credential chain. Explicit
/// credentials require all three fields; a partial triple counts as
/// "no explicit credentials configured".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3Credentials {
    pub endpoint_url: String,
    pub access_key_id: String,
    pub secret_key: String,
}

impl S3Credentials {
    /// True when all three fields are present
    pub fn is_explicit(&self) -> bool {
        !self.endpoint_url.is_empty()
            && !self.access_key_id.is_empty()
            && !self.secret_key.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoint_url.is_empty()
            && self.access_key_id.is_empty()
            && self.secret_key.is_empty()
    }
}

impl From<&S3Settings> for S3Credentials {
    fn from(settings: &S3Settings) -> Self {
        Self {
            endpoint_url: settings.endpoint_url.clone(),
            access_key_id: settings.client_id.clone(),
            secret_key: settings.client_secret.clone(),
        }
    }
}

/// Deployment-level client knobs, fixed at startup / 部署级客户端参数
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Region name, e.g. us-east-1 / 区域
    pub region: String,
    /// Path-style addressing (MinIO etc.) / 路径风格寻址
    pub force_path_style: bool,
}

impl From<&S3Settings> for ClientOptions {
    fn from(settings: &S3Settings) -> Self {
        Self {
            region: settings.region.clone(),
            force_path_style: settings.force_path_style,
        }
    }
}

/// An authenticated S3 client handle / 已认证的S3客户端句柄
///
/// Immutable once built; bound to one credential value for its lifetime.
pub struct ClientHandle {
    region: Region,
    credentials: Credentials,
    path_style: bool,
}

impl ClientHandle {
    /// Build a handle from an explicit credential triple
    pub fn with_credentials(creds: &S3Credentials, options: &ClientOptions) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&creds.access_key_id),
            Some(&creds.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| anyhow!("Failed to build S3 credentials: {}", e))?;

        Ok(Self {
            region: Region::Custom {
                region: options.region.clone(),
                endpoint: creds.endpoint_url.trim_end_matches('/').to_string(),
            },
            credentials,
            path_style: options.force_path_style,
        })
    }

    /// Build a handle from ambient credentials (env vars, profile,
    /// instance role). Fails when the chain yields nothing, which the
    /// probe reports as "not authenticated" rather than an error.
    pub fn ambient(options: &ClientOptions) -> Result<Self> {
        let credentials = Credentials::default()
            .map_err(|e| anyhow!("No ambient S3 credentials available: {}", e))?;

        Ok(Self {
            region: Region::Custom {
                region: options.region.clone(),
                endpoint: format!("https://s3.{}.amazonaws.com", options.region),
            },
            credentials,
            path_style: options.force_path_style,
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>, S3Error> {
        let bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())?;
        Ok(if self.path_style {
            bucket.with_path_style()
        } else {
            bucket
        })
    }

    /// List all bucket names in the account / 列出账户下所有存储桶
    pub async fn list_buckets(&self) -> Result<Vec<String>, S3Error> {
        let response =
            Bucket::list_buckets(self.region.clone(), self.credentials.clone()).await?;
        Ok(response.bucket_names().collect())
    }

    /// Fetch one page of a delimited listing / 获取一页目录式列表
    ///
    /// One storage call per browse request: prefix-scoped, `/` delimiter,
    /// no continuation.
    pub async fn list_page(&self, bucket: &str, prefix: &str) -> Result<ListingPage, S3Error> {
        let bucket = self.bucket(bucket)?;
        let (result, _status) = bucket
            .list_page(prefix.to_string(), Some("/".to_string()), None, None, None)
            .await?;

        Ok(ListingPage {
            common_prefixes: result
                .common_prefixes
                .unwrap_or_default()
                .into_iter()
                .map(|cp| cp.prefix)
                .collect(),
            objects: result
                .contents
                .into_iter()
                .map(|obj| ObjectSummary {
                    key: obj.key,
                    content_type: None, // not reported by ListObjectsV2
                })
                .collect(),
        })
    }

    /// Fetch an object body and its reported content type / 获取对象内容
    pub async fn get_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<(Vec<u8>, Option<String>), S3Error> {
        let bucket = self.bucket(bucket)?;
        let response = bucket.get_object(key).await?;
        let headers = response.headers();
        let content_type = headers.get("content-type").cloned();
        Ok((response.bytes().to_vec(), content_type))
    }
}

/// Credential store plus lazily rebuilt client cache / 凭证存储与客户端缓存
pub struct ClientFactory {
    options: ClientOptions,
    credentials: RwLock<S3Credentials>,
    handle: RwLock<Option<Arc<ClientHandle>>>,
}

impl ClientFactory {
    pub fn new(initial: S3Credentials, options: ClientOptions) -> Self {
        Self {
            options,
            credentials: RwLock::new(initial),
            handle: RwLock::new(None),
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Snapshot of the currently stored credentials / 当前凭证快照
    pub fn credentials(&self) -> S3Credentials {
        self.credentials.read().clone()
    }

    /// Replace the stored credentials wholesale and invalidate the cached
    /// handle. Readers never observe a partially updated triple.
    pub fn set_credentials(&self, new: S3Credentials) {
        *self.credentials.write() = new;
        *self.handle.write() = None;
        tracing::info!("S3 credentials replaced, client handle invalidated");
    }

    /// Current client handle, building one on first use or after a
    /// credential swap. Absent explicit credentials is a valid state and
    /// falls back to the ambient chain.
    pub fn handle(&self) -> Result<Arc<ClientHandle>> {
        if let Some(handle) = self.handle.read().clone() {
            return Ok(handle);
        }

        let creds = self.credentials();
        let built = if creds.is_explicit() {
            ClientHandle::with_credentials(&creds, &self.options)?
        } else {
            ClientHandle::ambient(&self.options)?
        };

        let built = Arc::new(built);
        *self.handle.write() = Some(built.clone());
        Ok(built)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ClientOptions {
        ClientOptions {
            region: "us-east-1".to_string(),
            force_path_style: true,
        }
    }

    fn explicit() -> S3Credentials {
        S3Credentials {
            endpoint_url: "http://localhost:9000".to_string(),
            access_key_id: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
        }
    }

    #[test]
    fn test_is_explicit() {
        assert!(explicit().is_explicit());
        assert!(!S3Credentials::default().is_explicit());
        // A partial triple is not explicit
        let partial = S3Credentials {
            endpoint_url: "http://localhost:9000".to_string(),
            ..Default::default()
        };
        assert!(!partial.is_explicit());
        assert!(!partial.is_empty());
        assert!(S3Credentials::default().is_empty());
    }

    #[test]
    fn test_factory_builds_and_caches_handle() {
        let factory = ClientFactory::new(explicit(), options());
        let first = factory.handle().unwrap();
        let second = factory.handle().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_set_credentials_invalidates_handle() {
        let factory = ClientFactory::new(explicit(), options());
        let before = factory.handle().unwrap();

        let mut new_creds = explicit();
        new_creds.access_key_id = "other".to_string();
        factory.set_credentials(new_creds.clone());

        assert_eq!(factory.credentials(), new_creds);
        let after = factory.handle().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
    }
}
