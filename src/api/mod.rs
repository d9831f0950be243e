pub mod file;
pub mod http;
#[cfg(test)]
pub(crate) mod testing;

pub use file::FileSource;
pub use http::HttpSource;

use futures_util::future::BoxFuture;
use std::sync::Arc;

use crate::domain::Point;
use crate::error::LoadError;

/// Where raw point records come from.
///
/// A source only delivers the response body; decoding and caching are the
/// model's job. The returned future must not borrow the source so it can be
/// shared between every caller waiting on the same load.
pub trait PointSource: Send + Sync + 'static {
    /// Identifier reported in errors and logs (URL or path).
    fn id(&self) -> &str;

    fn fetch(&self) -> BoxFuture<'static, Result<String, LoadError>>;
}

/// Pick a source for `identifier`: `http://` and `https://` go over the
/// network, anything else is read from disk.
pub fn open_source(identifier: &str) -> Result<Arc<dyn PointSource>, LoadError> {
    if identifier.starts_with("http://") || identifier.starts_with("https://") {
        Ok(Arc::new(HttpSource::new(identifier)?))
    } else {
        Ok(Arc::new(FileSource::new(identifier)))
    }
}

/// Decode a JSON array of `{x, y}` records.
pub fn parse_points(source_id: &str, body: &str) -> Result<Vec<Point>, LoadError> {
    serde_json::from_str(body).map_err(|e| LoadError::Malformed {
        source_id: source_id.to_string(),
        cause: e.to_string(),
    })
}
