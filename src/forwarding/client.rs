use super::{ForwardError, ForwardRecord};
use crate::config::ForwardingConfig;
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use url::Url;

#[cfg(test)]
use mockall::automock;

/// Seam between the forwarder and the search backend wire protocol.
#[cfg_attr(test, automock)]
pub trait BackendClient: Send + Sync {
    /// Push one record. The returned future owns everything it needs.
    fn index(&self, record: ForwardRecord) -> BoxFuture<'static, Result<(), ForwardError>>;
}

/// HTTP client for an Elasticsearch-compatible search backend.
///
/// Each record is POSTed as JSON to `<endpoint>/<index>/_doc`.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    endpoint: Url,
    username: Option<String>,
    password: Option<String>,
}

impl SearchClient {
    pub fn new(config: &ForwardingConfig) -> Result<Self, ForwardError> {
        let endpoint: Url = config.endpoint.parse().map_err(|e| {
            ForwardError::InvalidConfiguration(format!("Invalid endpoint URL: {}", e))
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(ForwardError::InvalidConfiguration(format!(
                "Endpoint URL cannot carry a path: {}",
                config.endpoint
            )));
        }

        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(10)))
            .user_agent(concat!("rask-logger/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ForwardError::InvalidConfiguration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Document URL for an index.
    pub fn document_url(&self, index: &str) -> Result<Url, ForwardError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ForwardError::InvalidConfiguration(format!(
                    "Endpoint URL cannot carry a path: {}",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .push(index)
            .push("_doc");
        Ok(url)
    }
}

impl BackendClient for SearchClient {
    fn index(&self, record: ForwardRecord) -> BoxFuture<'static, Result<(), ForwardError>> {
        let url = match self.document_url(&record.index) {
            Ok(url) => url,
            Err(e) => return futures::future::ready(Err(e)).boxed(),
        };
        let mut request = self.client.post(url).json(&record);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_ref());
        }

        async move {
            let response = request.send().await?;
            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                let message = response.text().await.unwrap_or_default();
                Err(ForwardError::HttpError {
                    status: status.as_u16(),
                    message,
                })
            }
        }
        .boxed()
    }
}
