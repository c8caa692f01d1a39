//! Street-network provider contract and request/response types.
//!
//! Every provider the planner can delegate last-mile routing to implements
//! [`StreetNetwork`]. The planner selects a provider by configured name (see
//! [`crate::registry`]) and then treats all providers alike.
//!
//! # Operations
//!
//! | Operation | Request | Response | Description |
//! |-----------|---------|----------|-------------|
//! | Routing matrix | [`RoutingMatrixRequest`] | [`RoutingMatrix`] | Travel times between one place and many |
//! | Direct path | [`DirectPathRequest`] | [`Itinerary`] | Door-to-door route with geometry |
//!
//! # Example
//!
//! ```rust,ignore
//! use lastmile_core::{RequestContext, RoutingMatrixRequest, StreetNetwork, StreetNetworkMode};
//!
//! async fn durations(provider: &dyn StreetNetwork, from: &Place, to: &[Place]) {
//!     let request = RoutingMatrixRequest::from_places(
//!         std::slice::from_ref(from),
//!         to,
//!         StreetNetworkMode::Bike,
//!         1_800,
//!     )?;
//!     let matrix = provider.routing_matrix(request, &RequestContext::default()).await?;
//!     for (place, entry) in to.iter().zip(matrix.entries()) {
//!         println!("{}: {}s", place.coord, entry.duration);
//!     }
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{Itinerary, PlaceRef, RoutingMatrix, StreetNetworkMode, UtcDateTime};

/// Street-network failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreetNetworkErrorKind {
    /// Unsupported mode or place cardinality; detected before any network call.
    InvalidRequest,
    /// Breaker open, timeout, transport failure or non-success HTTP status.
    ServiceUnavailable,
    /// The provider answered with a body that breaks its response contract.
    ParseError,
}

/// Structured failure returned by every street-network operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetNetworkError {
    kind: StreetNetworkErrorKind,
    message: String,
    url: Option<String>,
}

impl StreetNetworkError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: StreetNetworkErrorKind::InvalidRequest,
            message: message.into(),
            url: None,
        }
    }

    pub fn unsupported_mode(provider: &str, mode: StreetNetworkMode) -> Self {
        Self::invalid_request(format!("{provider}, mode {mode} not implemented"))
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: StreetNetworkErrorKind::ServiceUnavailable,
            message: message.into(),
            url: None,
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            kind: StreetNetworkErrorKind::ParseError,
            message: message.into(),
            url: None,
        }
    }

    /// Attaches the provider URL the failing call targeted.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub const fn kind(&self) -> StreetNetworkErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Only outages are worth retrying; bad input and contract breaks are not.
    pub const fn retryable(&self) -> bool {
        matches!(self.kind, StreetNetworkErrorKind::ServiceUnavailable)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            StreetNetworkErrorKind::InvalidRequest => "street_network.invalid_request",
            StreetNetworkErrorKind::ServiceUnavailable => "street_network.service_unavailable",
            StreetNetworkErrorKind::ParseError => "street_network.parse_error",
        }
    }
}

impl Display for StreetNetworkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for StreetNetworkError {}

/// Per-call context handed down by the planner.
///
/// Only used for log correlation; nothing here is sent to the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
        }
    }

    pub(crate) fn request_id_or_dash(&self) -> &str {
        self.request_id.as_deref().unwrap_or("-")
    }
}

/// Request payload for routing-matrix operations.
#[derive(Clone)]
pub struct RoutingMatrixRequest<'a> {
    pub origins: Vec<&'a dyn PlaceRef>,
    pub destinations: Vec<&'a dyn PlaceRef>,
    pub mode: StreetNetworkMode,
    /// Seconds.
    pub max_duration: u32,
}

impl<'a> RoutingMatrixRequest<'a> {
    pub fn new(
        origins: Vec<&'a dyn PlaceRef>,
        destinations: Vec<&'a dyn PlaceRef>,
        mode: StreetNetworkMode,
        max_duration: u32,
    ) -> Result<Self, StreetNetworkError> {
        if origins.is_empty() || destinations.is_empty() {
            return Err(StreetNetworkError::invalid_request(
                "routing matrix request needs at least one origin and one destination",
            ));
        }
        Ok(Self {
            origins,
            destinations,
            mode,
            max_duration,
        })
    }

    pub fn from_places<P: PlaceRef>(
        origins: &'a [P],
        destinations: &'a [P],
        mode: StreetNetworkMode,
        max_duration: u32,
    ) -> Result<Self, StreetNetworkError> {
        Self::new(
            origins.iter().map(|place| place as &dyn PlaceRef).collect(),
            destinations.iter().map(|place| place as &dyn PlaceRef).collect(),
            mode,
            max_duration,
        )
    }

    /// Number of origin/destination pairs the provider must answer for.
    pub fn pair_count(&self) -> usize {
        self.origins.len() * self.destinations.len()
    }
}

impl std::fmt::Debug for RoutingMatrixRequest<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingMatrixRequest")
            .field("origins", &self.origins.len())
            .field("destinations", &self.destinations.len())
            .field("mode", &self.mode)
            .field("max_duration", &self.max_duration)
            .finish()
    }
}

/// Request payload for direct-path operations.
#[derive(Clone)]
pub struct DirectPathRequest<'a> {
    pub mode: StreetNetworkMode,
    pub origin: &'a dyn PlaceRef,
    pub destination: &'a dyn PlaceRef,
    pub datetime: UtcDateTime,
    /// `true` departs at `datetime`, `false` arrives by `datetime`.
    pub clockwise: bool,
}

impl std::fmt::Debug for DirectPathRequest<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectPathRequest")
            .field("mode", &self.mode)
            .field("origin", &self.origin.coord())
            .field("destination", &self.destination.coord())
            .field("datetime", &self.datetime)
            .field("clockwise", &self.clockwise)
            .finish()
    }
}

/// Boxed future returned by [`StreetNetwork`] operations.
pub type StreetNetworkFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, StreetNetworkError>> + Send + 'a>>;

/// Street-network provider contract.
///
/// Implementations must be `Send + Sync`: one instance serves every planner
/// request for its configured name. Providers that cannot serve a mode fail
/// with [`StreetNetworkErrorKind::InvalidRequest`] instead of degrading.
pub trait StreetNetwork: Send + Sync {
    /// Computes travel times between one place and many, or many and one.
    ///
    /// Entries come back in the order the places were requested.
    ///
    /// # Errors
    ///
    /// - [`StreetNetworkErrorKind::InvalidRequest`] for unsupported modes or shapes
    /// - [`StreetNetworkErrorKind::ServiceUnavailable`] when the provider cannot be reached
    /// - [`StreetNetworkErrorKind::ParseError`] when the provider response is malformed
    fn routing_matrix<'a>(
        &'a self,
        request: RoutingMatrixRequest<'a>,
        context: &'a RequestContext,
    ) -> StreetNetworkFuture<'a, RoutingMatrix>;

    /// Computes a single door-to-door itinerary.
    ///
    /// # Errors
    ///
    /// Same classification as [`routing_matrix`](StreetNetwork::routing_matrix).
    fn direct_path<'a>(
        &'a self,
        request: DirectPathRequest<'a>,
        context: &'a RequestContext,
    ) -> StreetNetworkFuture<'a, Itinerary>;
}
