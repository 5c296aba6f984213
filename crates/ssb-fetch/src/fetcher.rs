//! The Fetcher: one entry point from request to response.

use std::sync::Arc;

use ssb_fetch_backend::Backend;
use ssb_fetch_core::ssb_ref::SCHEME;
use ssb_fetch_core::{normalize, parse_range, ByteRange, CoreError, Identifier, IdentifierKind};

use crate::config::FetchConfig;
use crate::error::Result;
use crate::profile::aggregate_profile;
use crate::request::{FetchRequest, Method};
use crate::resolve::{resolve_blob, resolve_record};
use crate::response::{HttpResponse, ResolvedPayload, ResponseBuilder};

/// Resolves `ssb:` URLs against a shared backend.
///
/// The backend is opened once by the host and shared by every request;
/// the Fetcher holds no other state, so concurrent `fetch` calls are
/// independent of each other.
pub struct Fetcher<B: Backend> {
    /// The log engine.
    backend: Arc<B>,
    /// Configuration.
    config: FetchConfig,
}

impl<B: Backend> Clone for Fetcher<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: self.config.clone(),
        }
    }
}

impl<B: Backend> Fetcher<B> {
    /// Create a fetcher owning `backend`.
    pub fn new(backend: B, config: FetchConfig) -> Self {
        Self::from_shared(Arc::new(backend), config)
    }

    /// Create a fetcher over an already shared backend.
    pub fn from_shared(backend: Arc<B>, config: FetchConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────────────────────

    /// Answer a request. Never fails: every error becomes a response.
    ///
    /// A `Range` header that does not parse is ignored and the whole
    /// resource is served.
    pub async fn fetch(&self, request: &FetchRequest) -> HttpResponse {
        let ranges = request.header("Range").and_then(|header| {
            parse_range(header)
                .map_err(|err| tracing::debug!(error = %err, "ignoring Range header"))
                .ok()
        });

        let payload = self.resolve(&request.url, ranges.as_deref()).await;
        let response =
            ResponseBuilder::new(&self.config).build(payload, request.method, ranges.as_deref());

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            "fetched"
        );
        response
    }

    pub async fn get(&self, url: &str) -> HttpResponse {
        self.fetch(&FetchRequest::new(Method::Get, url)).await
    }

    pub async fn head(&self, url: &str) -> HttpResponse {
        self.fetch(&FetchRequest::new(Method::Head, url)).await
    }

    /// Resolve `url` without rendering.
    pub async fn resolve(&self, url: &str, ranges: Option<&[ByteRange]>) -> ResolvedPayload {
        match self.try_resolve(url, ranges).await {
            Ok(payload) => payload,
            Err(err) => ResolvedPayload::Error(err),
        }
    }

    async fn try_resolve(
        &self,
        url: &str,
        ranges: Option<&[ByteRange]>,
    ) -> Result<ResolvedPayload> {
        let id = self.parse_url(url)?;
        tracing::debug!(id = %id, kind = %id.kind(), "resolving");

        let backend = self.backend.as_ref();
        match id.kind() {
            IdentifierKind::Message => {
                let record = resolve_record(backend, &id).await?;
                Ok(ResolvedPayload::Record(record))
            }
            IdentifierKind::Blob => {
                resolve_blob(backend, &id, ranges, self.config.want_missing_blobs).await
            }
            IdentifierKind::Feed => {
                let profile = aggregate_profile(backend, &id, &self.config.profile_fields).await?;
                Ok(ResolvedPayload::Record(profile.to_json()))
            }
        }
    }

    /// Parse a request URL into an identifier.
    ///
    /// Only `ssb:` URLs are accepted. Legacy sigils must be converted by the
    /// caller first, see [`convert_legacy`](ssb_fetch_core::convert_legacy).
    pub fn parse_url(&self, url: &str) -> Result<Identifier> {
        let trimmed = url.trim();
        if !trimmed.starts_with(SCHEME) {
            return Err(CoreError::InvalidProtocol(url.to_string()).into());
        }
        Ok(normalize(trimmed)?)
    }
}
