//! One-attempt HTTP transports.
//!
//! # Responsibilities
//! - Send one [`ApiRequest`] and read the whole response
//! - Wait between attempts in the way the calling model expects
//!
//! # Design Decisions
//! - [`ReqwestTransport`] yields while waiting (`tokio::time::sleep`)
//! - [`BlockingTransport`] holds the calling thread for both I/O and waits
//! - Per-attempt timeouts live on the underlying `reqwest` client
//! - `reqwest` errors become [`TransportError`] here and never travel further

use std::future::Future;
use std::time::Duration;

use url::Url;

use crate::config::ConfigError;
use crate::error::TransportError;
use crate::http::request::ApiRequest;
use crate::http::response::{parse_retry_after, RawResponse};

/// A way to perform single attempts and to wait between them.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;

    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// Async transport over a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Transport(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url(&self.base_url))
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        async move {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let retry_after = parse_retry_after(response.headers());
            let body = response.text().await?;
            Ok(RawResponse {
                status,
                body,
                retry_after,
            })
        }
    }

    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(delay)
    }
}

/// Blocking transport over `reqwest::blocking::Client`.
///
/// Its futures complete without ever returning `Pending`; they are meant to
/// be driven by `futures::executor::block_on` on the calling thread.
#[derive(Debug, Clone)]
pub struct BlockingTransport {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl BlockingTransport {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Transport(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl Transport for BlockingTransport {
    fn send(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url(&self.base_url))
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        async move {
            let response = builder.send()?;
            let status = response.status().as_u16();
            let retry_after = parse_retry_after(response.headers());
            let body = response.text()?;
            Ok(RawResponse {
                status,
                body,
                retry_after,
            })
        }
    }

    fn sleep(&self, delay: Duration) -> impl Future<Output = ()> + Send {
        async move { std::thread::sleep(delay) }
    }
}
