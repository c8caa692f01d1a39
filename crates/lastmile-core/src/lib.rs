//! # lastmile Core
//!
//! Street-network delegation for a multimodal trip planner.
//!
//! ## Overview
//!
//! The planner hands last-mile legs (cycling first) to an external routing
//! provider through one contract and stays insulated from that provider's
//! outages:
//!
//! - **Capability interface** ([`StreetNetwork`]) every provider implements
//! - **Geovelo connector** ([`GeoveloConnector`]) for the `routes_m2m` API
//! - **Circuit breaker** guarding each connector's outbound calls
//! - **Wire codec** translating places and provider tables
//! - **Registry** selecting providers by configured name
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider connectors (Geovelo) |
//! | [`circuit_breaker`] | Circuit breaker for outbound calls |
//! | [`config`] | Connector configuration and provider settings |
//! | [`domain`] | Places, matrices, itineraries, timestamps |
//! | [`error`] | Validation and configuration errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`monitoring`] | External-failure observations |
//! | [`registry`] | Providers by configured name |
//! | [`street_network`] | Capability trait and request types |
//! | [`wire`] | Geovelo request/response codec |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │    Planner      │
//! └────────┬────────┘
//!          │ StreetNetwork
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ GeoveloConnector│────▶│ Circuit Breaker  │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Wire Codec    │     │ HTTP Client      │
//! │ (routes_m2m)    │     │ (reqwest)        │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Provider calls fail with a [`StreetNetworkError`] whose kind tells the
//! planner what to do next:
//!
//! ```rust
//! use lastmile_core::{StreetNetworkError, StreetNetworkErrorKind};
//!
//! fn handle_error(error: StreetNetworkError) {
//!     match error.kind() {
//!         StreetNetworkErrorKind::InvalidRequest => {
//!             // Fix the input or pick another provider
//!         }
//!         StreetNetworkErrorKind::ServiceUnavailable => {
//!             // Retry later or fall back
//!         }
//!         StreetNetworkErrorKind::ParseError => {
//!             // Provider changed its contract
//!         }
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - API keys are never logged and are redacted from `Debug` output
//! - All HTTP requests use TLS via rustls

pub mod adapters;
pub mod circuit_breaker;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod monitoring;
pub mod registry;
pub mod street_network;
pub mod wire;

// Connectors
pub use adapters::GeoveloConnector;

// Circuit breaker
pub use circuit_breaker::{
    CallPermit, CircuitBreaker, CircuitBreakerConfig, CircuitBreakerState, CircuitState,
};

// Configuration
pub use config::{parse_provider_settings, GeoveloConfig, ProviderKind, ProviderSettings};

// Domain models
pub use domain::{
    GeoPoint, Itinerary, MatrixEntry, MatrixRow, PathItem, Place, PlaceRef, RoutingMatrix,
    RoutingStatus, Section, StreetNetworkMode, UtcDateTime, UNREACHED_DURATION,
};

// Error types
pub use error::{CoreError, ValidationError};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Monitoring
pub use monitoring::{CountingFailureRecorder, FailureRecorder, TracingFailureRecorder};

// Registry
pub use registry::StreetNetworkRegistry;

// Capability interface
pub use street_network::{
    DirectPathRequest, RequestContext, RoutingMatrixRequest, StreetNetwork, StreetNetworkError,
    StreetNetworkErrorKind, StreetNetworkFuture,
};
