//! Audio file responder for enclosure URLs

use std::io::SeekFrom;
use std::time::SystemTime;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header::{
    ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, IF_MODIFIED_SINCE, LAST_MODIFIED,
};
use axum::http::{HeaderMap, Response, StatusCode};
use chrono::{DateTime, Utc};
use podfeed_core::{AUDIO_MIME_TYPE, is_audio_file, resolve_in_root};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::debug;

use super::range::{RangeRequest, range_from_headers};
use crate::error::ServeError;
use crate::server::AppState;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Stream one audio file from the files root.
///
/// The extension check ignores case so that the enclosure of every audio
/// file in the feed, `.MP3` included, can be fetched. Responses carry
/// `Last-Modified`, and a matching `If-Modified-Since` gets an empty 304 so
/// clients re-polling an enclosure skip the download.
///
/// # Errors
/// - `ServeError::UnsupportedMediaType` - Name lacks the audio extension (400)
/// - `ServeError::InvalidPath` - Name is not a single path component (400)
/// - `ServeError::NotFound` - No regular file by that name (404)
/// - `ServeError::RangeNotSatisfiable` - Range starts past the end (416)
pub async fn serve_media(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<Response<Body>, ServeError> {
    if !is_audio_file(&filename) {
        return Err(ServeError::UnsupportedMediaType { filename });
    }

    let Some(path) = resolve_in_root(&state.config.library.files_dir, &filename) else {
        return Err(ServeError::InvalidPath { filename });
    };

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => return Err(ServeError::NotFound { filename }),
    };
    let total_size = metadata.len();
    let last_modified = metadata.modified().ok();

    if let Some(modified) = last_modified.filter(|modified| is_not_modified(&headers, *modified)) {
        debug!("{} not modified since client copy", path.display());
        return Ok(Response::builder()
            .status(StatusCode::NOT_MODIFIED)
            .header(LAST_MODIFIED, http_date(modified))
            .body(Body::empty())?);
    }

    let range = range_from_headers(&headers, total_size);
    let (status, start, length) = match range {
        RangeRequest::Full => (StatusCode::OK, 0, total_size),
        RangeRequest::Partial(range) => (StatusCode::PARTIAL_CONTENT, range.start, range.length()),
        RangeRequest::Unsatisfiable => return Err(ServeError::RangeNotSatisfiable { total_size }),
    };

    let mut file = match File::open(&path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ServeError::NotFound { filename });
        }
        Err(e) => return Err(e.into()),
    };
    if start > 0 {
        file.seek(SeekFrom::Start(start)).await?;
    }

    debug!(
        "Serving bytes {}..{} of {} ({} total)",
        start,
        start + length,
        path.display(),
        total_size
    );

    let mut response = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, AUDIO_MIME_TYPE)
        .header(ACCEPT_RANGES, "bytes")
        .header(CONTENT_LENGTH, length);

    if let Some(modified) = last_modified {
        response = response.header(LAST_MODIFIED, http_date(modified));
    }
    if let RangeRequest::Partial(range) = range {
        response = response.header(CONTENT_RANGE, range.content_range(total_size));
    }

    let body = Body::from_stream(ReaderStream::new(file.take(length)));
    Ok(response.body(body)?)
}

/// Format a timestamp as an HTTP date (`Tue, 14 Nov 2023 22:13:20 GMT`).
fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format(HTTP_DATE_FORMAT)
        .to_string()
}

/// Whether `If-Modified-Since` is at or after `modified`, to the second.
///
/// A missing or unparseable header never matches.
fn is_not_modified(headers: &HeaderMap, modified: SystemTime) -> bool {
    let Some(since) = headers
        .get(IF_MODIFIED_SINCE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
    else {
        return false;
    };

    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::HeaderValue;

    use super::*;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn since(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(IF_MODIFIED_SINCE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_http_date_format() {
        assert_eq!(http_date(at(1_700_000_000)), "Tue, 14 Nov 2023 22:13:20 GMT");
        assert_eq!(http_date(at(0)), "Thu, 01 Jan 1970 00:00:00 GMT");
    }

    #[test]
    fn test_if_modified_since_comparison() {
        let modified = at(1_700_000_000) + Duration::from_millis(400);

        assert!(is_not_modified(&since("Tue, 14 Nov 2023 22:13:20 GMT"), modified));
        assert!(is_not_modified(&since("Fri, 01 Jan 2100 00:00:00 GMT"), modified));
        assert!(!is_not_modified(&since("Tue, 14 Nov 2023 22:13:19 GMT"), modified));
        assert!(!is_not_modified(&since("yesterday"), modified));
        assert!(!is_not_modified(&HeaderMap::new(), modified));
    }
}
