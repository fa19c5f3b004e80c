//! Direct streaming with HTTP range requests.
//!
//! Serves cataloged files by entry id with support for HTTP range requests.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use std::io::SeekFrom;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use vidshelf_common::{paths, EntryId, Error};

use crate::server::{error::ApiError, AppContext};

/// How a request's `Range` header applies to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    Full,
    Partial(u64, u64),
    Unsatisfiable,
}

/// Serve a cataloged file with range request support.
pub async fn stream_media(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id: EntryId = id.parse()?;

    let service = ctx.service.clone();
    let entry = tokio::task::spawn_blocking(move || service.get(id))
        .await
        .map_err(|e| ApiError::internal(format!("Lookup task failed: {e}")))??;

    let file_path = std::path::Path::new(&entry.path);

    let metadata = tokio::fs::metadata(file_path)
        .await
        .map_err(|_| Error::not_found(format!("file for entry {id}")))?;
    let file_size = metadata.len();

    let range = resolve_range(
        headers.get(header::RANGE).and_then(|h| h.to_str().ok()),
        file_size,
    );

    let content_type = paths::classify(file_path);
    let disposition = content_disposition(file_path);

    match range {
        RangeRequest::Partial(start, end) => {
            let length = end - start + 1;

            let mut file = File::open(file_path)
                .await
                .map_err(|_| Error::not_found(format!("file for entry {id}")))?;

            file.seek(SeekFrom::Start(start))
                .await
                .map_err(|e| ApiError::internal(format!("Seek failed: {e}")))?;

            let stream = ReaderStream::new(file.take(length));
            let body = Body::from_stream(stream);

            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, length.to_string())
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end, file_size),
                )
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_DISPOSITION, disposition)
                .body(body)
                .map_err(|e| ApiError::internal(e.to_string()))
        }
        RangeRequest::Unsatisfiable => Response::builder()
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(header::CONTENT_RANGE, format!("bytes */{}", file_size))
            .body(Body::empty())
            .map_err(|e| ApiError::internal(e.to_string())),
        RangeRequest::Full => {
            let file = File::open(file_path)
                .await
                .map_err(|_| Error::not_found(format!("file for entry {id}")))?;

            let stream = ReaderStream::new(file);
            let body = Body::from_stream(stream);

            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::CONTENT_LENGTH, file_size.to_string())
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_DISPOSITION, disposition)
                .body(body)
                .map_err(|e| ApiError::internal(e.to_string()))
        }
    }
}

/// Decide how to answer a request given its `Range` header.
///
/// Malformed headers are ignored and the whole file is served; a start
/// offset at or beyond the end of the file is unsatisfiable.
pub fn resolve_range(header: Option<&str>, file_size: u64) -> RangeRequest {
    let Some(header) = header else {
        return RangeRequest::Full;
    };
    if let Some((start, end)) = parse_range_header(header, file_size) {
        return RangeRequest::Partial(start, end);
    }

    let start = header
        .strip_prefix("bytes=")
        .and_then(|r| r.split('-').next())
        .and_then(|s| s.trim().parse::<u64>().ok());
    match start {
        Some(start) if start >= file_size => RangeRequest::Unsatisfiable,
        _ => RangeRequest::Full,
    }
}

/// Parse HTTP Range header.
///
/// Supports formats:
/// - bytes=0-499
/// - bytes=500-
/// - bytes=-500 (last 500 bytes)
pub fn parse_range_header(header: &str, file_size: u64) -> Option<(u64, u64)> {
    if file_size == 0 {
        return None;
    }
    let header = header.strip_prefix("bytes=")?;

    let parts: Vec<&str> = header.split('-').collect();
    if parts.len() != 2 {
        return None;
    }

    let start = parts[0].trim();
    let end = parts[1].trim();

    match (start.is_empty(), end.is_empty()) {
        (true, false) => {
            let suffix_len: u64 = end.parse().ok()?;
            if suffix_len == 0 {
                return None;
            }
            Some((file_size.saturating_sub(suffix_len), file_size - 1))
        }
        (false, true) => {
            let start: u64 = start.parse().ok()?;
            if start >= file_size {
                return None;
            }
            Some((start, file_size - 1))
        }
        (false, false) => {
            let start: u64 = start.parse().ok()?;
            let end: u64 = end.parse().ok()?;
            if start >= file_size {
                return None;
            }
            let end = end.min(file_size - 1);
            if start > end {
                return None;
            }
            Some((start, end))
        }
        (true, true) => None,
    }
}

/// `inline; filename="..."` with the file name reduced to header-safe ASCII.
fn content_disposition(path: &std::path::Path) -> String {
    let name: String = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("inline; filename=\"{}\"", name)
}
