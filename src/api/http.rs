use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use reqwest::Client;
use std::time::Duration;

use super::PointSource;
use crate::error::LoadError;

const USER_AGENT: &str = concat!("pointmap/", env!("CARGO_PKG_VERSION"));

/// Fetches point records with an HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, LoadError> {
        let url = url.into();
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LoadError::Transport {
                source_id: url.clone(),
                cause: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self { client, url })
    }

    /// Use a preconfigured client, e.g. one with custom proxy or TLS settings.
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

impl PointSource for HttpSource {
    fn id(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> BoxFuture<'static, Result<String, LoadError>> {
        let client = self.client.clone();
        let url = self.url.clone();

        async move {
            let transport = |e: reqwest::Error| LoadError::Transport {
                source_id: url.clone(),
                cause: e.to_string(),
            };

            tracing::debug!(url = %url, "requesting points");
            let response = client.get(&url).send().await.map_err(transport)?;

            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    source_id: url.clone(),
                    status: status.as_u16(),
                });
            }

            response.text().await.map_err(transport)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{local_source, serve_once};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_fetch_success() {
        let url = serve_once("200 OK", r#"[{"x":1,"y":2}]"#).await;
        let body = local_source(&url).fetch().await.unwrap();

        assert_eq!(body, r#"[{"x":1,"y":2}]"#);
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let url = serve_once("500 Internal Server Error", "").await;
        let err = local_source(&url).fetch().await.unwrap_err();

        assert_eq!(
            err,
            LoadError::Status {
                source_id: url,
                status: 500
            }
        );
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{addr}/data.json");
        let err = local_source(&url).fetch().await.unwrap_err();
        assert!(matches!(err, LoadError::Transport { .. }));
    }
}
