//! Geolocation access for motoalerta.
//!
//! This module wraps position lookup behind the [`LocationProvider`] trait
//! and tracks a request's lifecycle (idle, loading, resolved, failed) the
//! way a UI geolocation hook would. Failures are carried as human-readable
//! messages, never panics.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::incident::Location;

/// Options governing a position request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoOptions {
    /// Ask the provider for the most accurate fix it can produce.
    pub high_accuracy: bool,
    /// How long to wait for a fix before abandoning the request.
    pub timeout: Duration,
    /// Maximum acceptable age of a cached fix. Zero forces a fresh fix.
    pub max_age: Duration,
}

impl Default for GeoOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            max_age: Duration::ZERO,
        }
    }
}

/// A source of current-position fixes.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// The name of this provider (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Obtain the caller's current coordinates.
    ///
    /// # Errors
    ///
    /// Returns a geolocation error with a human-readable message when the
    /// provider cannot produce a fix.
    async fn current_location(&self, options: &GeoOptions) -> Result<Location>;
}

/// State of an in-flight or completed position request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GeoState {
    /// No request has been made yet.
    #[default]
    Idle,
    /// A request is outstanding.
    Loading,
    /// The last request produced a fix.
    Resolved(Location),
    /// The last request failed, with a human-readable reason.
    Failed(String),
}

/// A single-slot position request tracker.
///
/// Only one outstanding request is meaningful per tracker; a new request
/// overwrites whatever state the previous one left behind.
#[derive(Debug, Default)]
pub struct LocationRequest {
    state: GeoState,
}

impl LocationRequest {
    /// Create a tracker in the idle state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current request state.
    #[must_use]
    pub fn state(&self) -> &GeoState {
        &self.state
    }

    /// The resolved fix, if the last request succeeded.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        match self.state {
            GeoState::Resolved(location) => Some(location),
            _ => None,
        }
    }

    /// The failure message, if the last request failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            GeoState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Run a position request against the given provider.
    ///
    /// The request is abandoned after `options.timeout`. Completion lands
    /// in `Resolved` or `Failed`; the outcome also comes back to the caller
    /// so the request can be awaited directly.
    pub async fn request(
        &mut self,
        provider: &dyn LocationProvider,
        options: &GeoOptions,
    ) -> Result<Location> {
        self.state = GeoState::Loading;
        debug!("Requesting location from provider '{}'", provider.name());

        let outcome = match tokio::time::timeout(
            options.timeout,
            provider.current_location(options),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::geolocation(format!(
                "no position fix within {} seconds",
                options.timeout.as_secs()
            ))),
        };

        match &outcome {
            Ok(location) => self.state = GeoState::Resolved(*location),
            Err(err) => self.state = GeoState::Failed(err.to_string()),
        }
        outcome
    }
}

/// A provider that resolves the caller's position from an ip-geolocation
/// HTTP endpoint.
///
/// This is the closest a headless process gets to the platform's
/// current-position capability; accuracy is city-level at best.
#[derive(Debug)]
pub struct IpLocationProvider {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct IpLocationResponse {
    latitude: f64,
    longitude: f64,
}

impl IpLocationProvider {
    /// Create a provider querying the given endpoint.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl LocationProvider for IpLocationProvider {
    fn name(&self) -> &'static str {
        "ip-geolocation"
    }

    async fn current_location(&self, _options: &GeoOptions) -> Result<Location> {
        // maximumAge is zero: always hit the endpoint, never a cached body.
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|err| Error::geolocation(format!("lookup request failed: {err}")))?
            .error_for_status()
            .map_err(|err| Error::geolocation(format!("lookup rejected: {err}")))?;

        let body: IpLocationResponse = response
            .json()
            .await
            .map_err(|err| Error::geolocation(format!("unreadable lookup response: {err}")))?;

        Ok(Location::new(body.latitude, body.longitude))
    }
}

/// A provider that returns fixed coordinates.
///
/// Backs the manual `--lat/--lon` entry path and the test doubles.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationProvider {
    location: Location,
}

impl FixedLocationProvider {
    /// Create a provider that always resolves to the given location.
    #[must_use]
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn current_location(&self, _options: &GeoOptions) -> Result<Location> {
        Ok(self.location)
    }
}
