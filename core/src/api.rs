//! `NocoDb`: the client bound to a transport.
//!
//! One value is built at startup and handed to whoever needs data access.
//! It holds no per-call state, so sharing it (by reference or clone) across
//! threads is fine; concurrent calls are independent and unordered.

use serde::de::DeserializeOwned;

use crate::client::NocoDbClient;
use crate::config::NocoDbConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::options::RequestOptions;
use crate::transport::{Transport, UreqTransport};

#[derive(Debug, Clone)]
pub struct NocoDb<T = UreqTransport> {
    client: NocoDbClient,
    transport: T,
}

impl NocoDb<UreqTransport> {
    pub fn connect(config: &NocoDbConfig) -> Self {
        Self::with_transport(NocoDbClient::new(config), UreqTransport::new())
    }
}

impl<T: Transport> NocoDb<T> {
    pub fn with_transport(client: NocoDbClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &NocoDbClient {
        &self.client
    }

    pub fn get<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<R, ApiError> {
        let request = self.client.build_get(endpoint, options)?;
        self.call(request, |client, response| client.parse(response))
    }

    /// Create a record; returns what the server stored.
    pub fn post<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<R, ApiError> {
        let request = self.client.build_post(endpoint, options)?;
        self.call(request, |client, response| client.parse(response))
    }

    /// Partial update: only the fields present in `options.body` change.
    pub fn patch<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<R, ApiError> {
        let request = self.client.build_patch(endpoint, options)?;
        self.call(request, |client, response| client.parse(response))
    }

    pub fn delete(&self, endpoint: &str, options: &RequestOptions) -> Result<(), ApiError> {
        let request = self.client.build_delete(endpoint, options)?;
        self.call(request, |client, response| client.parse_empty(response))
    }

    fn call<R>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(&NocoDbClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "nocodb request");

        let result = self
            .transport
            .execute(&request)
            .and_then(|response| parse(&self.client, response));

        if let Err(err) = &result {
            tracing::warn!(
                method = %request.method,
                url = %request.url,
                status = ?err.status(),
                error = %err,
                "nocodb request failed"
            );
        }
        result
    }
}
