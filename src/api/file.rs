use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::path::PathBuf;

use super::PointSource;
use crate::error::LoadError;

/// Reads point records from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    id: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            id: path.display().to_string(),
            path,
        }
    }
}

impl PointSource for FileSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn fetch(&self) -> BoxFuture<'static, Result<String, LoadError>> {
        let path = self.path.clone();
        let id = self.id.clone();

        async move {
            tracing::debug!(source = %id, "reading point file");
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| LoadError::Io {
                    source_id: id,
                    cause: e.to_string(),
                })
        }
        .boxed()
    }
}
