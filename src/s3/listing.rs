//! Listing translation / 列表翻译
//!
//! Turns one page of a flat S3 listing (common prefixes + object keys)
//! into the hierarchical directory/file rows the file browser expects.
//! `translate_page` is a pure walk over the page; the single-object fetch
//! it may request is performed by the caller via `fetch_object_entry`.

use base64::prelude::*;
use serde::Serialize;
use s3::error::S3Error;

use super::client::ClientHandle;

/// One row returned to the file browser / 返回给文件浏览器的一行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// Display name; omitted on the single-object-fetch result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    /// Base64-encoded body, only on the single-object-fetch result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
}

/// One object row from a listing page / 列表页中的一个对象
#[derive(Debug, Clone, Default)]
pub struct ObjectSummary {
    pub key: String,
    /// Content type when the listing source knows it; ListObjectsV2 does
    /// not report one, so pages built from S3 leave this `None`
    pub content_type: Option<String>,
}

/// One page of a delimited S3 listing, consumed immediately / 一页目录式列表
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub common_prefixes: Vec<String>,
    pub objects: Vec<ObjectSummary>,
}

/// Outcome of walking one listing page / 遍历一页列表的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Directory/file rows at this level; empty means not found
    Entries(Vec<Entry>),
    /// The caller asked for one specific object, fetch it instead
    Object {
        key: String,
        content_type: Option<String>,
    },
}

/// One directory row per bucket in the account / 每个存储桶一行目录
///
/// An empty account yields an empty list, which is a valid success.
pub fn bucket_entries<I>(names: I) -> Vec<Entry>
where
    I: IntoIterator<Item = String>,
{
    names
        .into_iter()
        .map(|name| Entry {
            path: format!("{}/", name),
            name: Some(name),
            kind: EntryKind::Directory,
            mimetype: None,
            content: None,
        })
        .collect()
}

/// Translate one listing page into browser rows.
///
/// An object whose key equals the requested prefix means the caller asked
/// for that object, not a directory; the walk short-circuits into an
/// `Object` fetch directive. Otherwise files come first, then common
/// prefixes, each group in the order the storage API returned it.
pub fn translate_page(bucket: &str, prefix: &str, page: &ListingPage) -> Resolution {
    let mut entries = Vec::new();

    for obj in &page.objects {
        if obj.key == prefix {
            return Resolution::Object {
                key: obj.key.clone(),
                content_type: obj.content_type.clone(),
            };
        }

        entries.push(Entry {
            name: Some(last_segment(&obj.key).to_string()),
            path: format!("{}/{}", bucket, obj.key),
            kind: EntryKind::File,
            mimetype: Some(
                obj.content_type
                    .clone()
                    .unwrap_or_else(|| guess_mimetype(&obj.key)),
            ),
            content: None,
        });
    }

    for common_prefix in &page.common_prefixes {
        entries.push(Entry {
            name: Some(format!("{}/", last_dir_segment(common_prefix))),
            path: format!("{}/{}", bucket, common_prefix),
            kind: EntryKind::Directory,
            mimetype: None,
            content: None,
        });
    }

    Resolution::Entries(entries)
}

/// Build the single-object-fetch row from a fetched body / 构造单对象结果行
pub fn object_entry(bucket: &str, key: &str, body: &[u8], content_type: Option<String>) -> Entry {
    Entry {
        name: None,
        path: format!("{}/{}", bucket, key),
        kind: EntryKind::File,
        mimetype: Some(content_type.unwrap_or_else(|| guess_mimetype(key))),
        content: Some(BASE64_STANDARD.encode(body)),
    }
}

/// Fetch an object and produce the single-object-fetch row / 获取对象并生成结果行
///
/// The content type reported with the body wins; `listed_content_type`
/// (from the listing page that triggered the fetch) is the fallback
/// before guessing from the key.
pub async fn fetch_object_entry(
    handle: &ClientHandle,
    bucket: &str,
    key: &str,
    listed_content_type: Option<String>,
) -> Result<Entry, S3Error> {
    let (body, content_type) = handle.get_object(bucket, key).await?;
    Ok(object_entry(
        bucket,
        key,
        &body,
        content_type.or(listed_content_type),
    ))
}

fn last_segment(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

fn last_dir_segment(prefix: &str) -> &str {
    prefix.trim_end_matches('/').rsplit('/').next().unwrap_or("")
}

fn guess_mimetype(key: &str) -> String {
    mime_guess::from_path(key)
        .first_or_octet_stream()
        .to_string()
}
