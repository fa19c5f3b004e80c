//! Media streaming module.
//!
//! # Routes
//!
//! - `GET /media/{id}` - Stream a cataloged file with range support

mod direct;

pub use direct::{parse_range_header, resolve_range, stream_media, RangeRequest};

use axum::{routing::get, Router};

use crate::server::AppContext;

/// Create media streaming router.
pub fn media_router() -> Router<AppContext> {
    Router::new().route("/:id", get(stream_media))
}
