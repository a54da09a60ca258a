//! Directory listings for the static prefix

use axum::extract::{OriginalUri, State};
use axum::http::header::LOCATION;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use podfeed_core::{DirectoryEntry, EntryKind, list_directory, resolve_segments_in_root};
use quick_xml::escape::escape;
use tracing::debug;

use crate::error::ServeError;
use crate::server::AppState;

const INDEX_HEADER: &str =
    "<!doctype html>\n<meta name=\"viewport\" content=\"width=device-width\">\n<pre>\n";
const INDEX_FOOTER: &str = "</pre>\n";

/// List a directory under the static prefix as a page of links.
///
/// Runs as the fallback of the static file service, so `uri` (with the
/// prefix already stripped) never names a regular file. A directory asked
/// for without a trailing slash is redirected to the slashed path so the
/// relative links on the page resolve against it.
///
/// # Errors
/// - `ServeError::NotFound` - Path leaves the root or is not a directory (404)
/// - `ServeError::Feed` - The directory could not be read (logged, 500)
pub async fn directory_index(
    State(state): State<AppState>,
    OriginalUri(original): OriginalUri,
    uri: Uri,
) -> Result<Response, ServeError> {
    let not_found = || ServeError::NotFound {
        filename: uri.path().to_string(),
    };

    let segments = uri
        .path()
        .split('/')
        .map(urlencoding::decode)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| not_found())?;
    let directory = resolve_segments_in_root(
        &state.config.library.files_dir,
        segments.iter().map(|segment| segment.as_ref()),
    )
    .ok_or_else(not_found)?;

    match tokio::fs::metadata(&directory).await {
        Ok(metadata) if metadata.is_dir() => {}
        _ => return Err(not_found()),
    }

    if !original.path().ends_with('/') {
        let location = match original.query() {
            Some(query) => format!("{}/?{}", original.path(), query),
            None => format!("{}/", original.path()),
        };
        return Ok((StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]).into_response());
    }

    let entries = list_directory(&directory).await?;
    debug!(
        "Listing {} entries of {}",
        entries.len(),
        directory.display()
    );
    Ok(Html(render_directory_index(&entries)).into_response())
}

/// Render `entries` as one link per line, directories with a trailing `/`.
///
/// Link targets are percent-encoded and link text is HTML-escaped.
pub fn render_directory_index(entries: &[DirectoryEntry]) -> String {
    let mut page = String::from(INDEX_HEADER);
    for entry in entries {
        let suffix = if entry.kind == EntryKind::Directory {
            "/"
        } else {
            ""
        };
        page.push_str(&format!(
            "<a href=\"{}{suffix}\">{}{suffix}</a>\n",
            urlencoding::encode(&entry.name),
            escape(entry.name.as_str())
        ));
    }
    page.push_str(INDEX_FOOTER);
    page
}
