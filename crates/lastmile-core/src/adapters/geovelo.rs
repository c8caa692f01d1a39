use std::sync::Arc;

use tracing::{debug, error};

use crate::circuit_breaker::CircuitBreaker;
use crate::config::GeoveloConfig;
use crate::http_client::{
    HttpClient, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
};
use crate::monitoring::{FailureRecorder, TracingFailureRecorder};
use crate::street_network::{
    DirectPathRequest, RequestContext, RoutingMatrixRequest, StreetNetwork, StreetNetworkError,
    StreetNetworkFuture,
};
use crate::wire;
use crate::{Itinerary, PlaceRef, RoutingMatrix, StreetNetworkMode};

/// Cycling connector for the Geovelo `routes_m2m` API.
///
/// Only [`StreetNetworkMode::Bike`] is served, and only 1×N or N×1 matrices.
/// Every outbound call goes through the connector's own circuit breaker,
/// which lives as long as the connector.
#[derive(Clone)]
pub struct GeoveloConnector {
    config: GeoveloConfig,
    http_client: Arc<dyn HttpClient>,
    circuit_breaker: Arc<CircuitBreaker>,
    failure_recorder: Arc<dyn FailureRecorder>,
}

impl GeoveloConnector {
    pub fn new(config: GeoveloConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: GeoveloConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let circuit_breaker = Arc::new(CircuitBreaker::new(config.circuit_breaker));
        Self {
            config,
            http_client,
            circuit_breaker,
            failure_recorder: Arc::new(TracingFailureRecorder),
        }
    }

    pub fn with_failure_recorder(mut self, failure_recorder: Arc<dyn FailureRecorder>) -> Self {
        self.failure_recorder = failure_recorder;
        self
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.circuit_breaker
    }

    fn system_id(&self) -> &str {
        &self.config.system_id
    }

    fn check_mode(
        &self,
        mode: StreetNetworkMode,
        context: &RequestContext,
    ) -> Result<(), StreetNetworkError> {
        if wire::supports_mode(mode) {
            return Ok(());
        }
        error!(
            system_id = self.system_id(),
            request_id = context.request_id_or_dash(),
            %mode,
            "Geovelo, mode not implemented"
        );
        Err(StreetNetworkError::unsupported_mode("Geovelo", mode))
    }

    fn encode(
        &self,
        origins: &[&dyn PlaceRef],
        destinations: &[&dyn PlaceRef],
    ) -> Result<String, StreetNetworkError> {
        wire::encode_routes_request(origins, destinations).map_err(|err| {
            StreetNetworkError::invalid_request(format!("cannot encode Geovelo request: {err}"))
        })
    }

    /// Issues one breaker-guarded `POST` to `routes_m2m`.
    ///
    /// Every failure is mapped to service-unavailable and reported to the
    /// failure recorder; the caller only ever sees a successful response.
    /// Only transport errors and timeouts count against the breaker: a
    /// non-2xx reply is a completed call.
    async fn call_routes(
        &self,
        body: String,
        context: &RequestContext,
    ) -> Result<HttpResponse, StreetNetworkError> {
        let url = self.config.routes_url();
        debug!(
            system_id = self.system_id(),
            request_id = context.request_id_or_dash(),
            url = %url,
            "Geovelo routing service, call url"
        );

        let Some(permit) = self.circuit_breaker.try_acquire() else {
            return Err(self.unavailable(
                "circuit breaker open",
                StreetNetworkError::service_unavailable(
                    "Geovelo routing service dead: circuit breaker open",
                ),
                context,
            ));
        };

        let request = HttpRequest::post(url.clone())
            .with_json_body(body)
            .with_header("Api-Key", &self.config.api_key)
            .with_timeout(self.config.timeout);

        let outcome = tokio::time::timeout(self.config.timeout, self.http_client.execute(request))
            .await;

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(http_error)) => {
                permit.failed();
                return Err(self.unavailable(
                    transport_failure_reason(http_error.kind()),
                    StreetNetworkError::service_unavailable(format!(
                        "Geovelo routing service dead: {}",
                        http_error.message()
                    ))
                    .with_url(url),
                    context,
                ));
            }
            Err(_) => {
                permit.failed();
                return Err(self.unavailable(
                    "timeout",
                    StreetNetworkError::service_unavailable(format!(
                        "Geovelo routing service dead: no response within {:?}",
                        self.config.timeout
                    ))
                    .with_url(url),
                    context,
                ));
            }
        };

        permit.succeeded();

        if !response.is_success() {
            error!(
                system_id = self.system_id(),
                request_id = context.request_id_or_dash(),
                url = %url,
                status = response.status,
                body = %response.body,
                "Geovelo service unavailable, impossible to query"
            );
            return Err(self.unavailable(
                &format!("http status {}", response.status),
                StreetNetworkError::service_unavailable(format!(
                    "Geovelo service unavailable, impossible to query : {url}"
                ))
                .with_url(url),
                context,
            ));
        }

        Ok(response)
    }

    fn unavailable(
        &self,
        reason: &str,
        failure: StreetNetworkError,
        context: &RequestContext,
    ) -> StreetNetworkError {
        error!(
            system_id = self.system_id(),
            request_id = context.request_id_or_dash(),
            reason,
            breaker = self.circuit_breaker.state().as_str(),
            "Geovelo routing service dead"
        );
        self.failure_recorder
            .record_external_failure(self.system_id(), reason);
        failure
    }

    fn parse_failure(
        &self,
        failure: StreetNetworkError,
        context: &RequestContext,
    ) -> StreetNetworkError {
        error!(
            target: "lastmile::parse",
            system_id = self.system_id(),
            request_id = context.request_id_or_dash(),
            detail = failure.message(),
            "Geovelo parsing error"
        );
        failure.with_url(self.config.routes_url())
    }
}

/// Observation reason for a transport failure, one per [`HttpErrorKind`].
fn transport_failure_reason(kind: HttpErrorKind) -> &'static str {
    match kind {
        HttpErrorKind::Timeout => "timeout",
        HttpErrorKind::Connect => "connect",
        HttpErrorKind::Other => "transport error",
    }
}

impl StreetNetwork for GeoveloConnector {
    fn routing_matrix<'a>(
        &'a self,
        request: RoutingMatrixRequest<'a>,
        context: &'a RequestContext,
    ) -> StreetNetworkFuture<'a, RoutingMatrix> {
        Box::pin(async move {
            self.check_mode(request.mode, context)?;

            let (origins, destinations) = (request.origins.len(), request.destinations.len());
            if origins == 0 || destinations == 0 || (origins != 1 && destinations != 1) {
                error!(
                    system_id = self.system_id(),
                    request_id = context.request_id_or_dash(),
                    origins,
                    destinations,
                    "Geovelo, managing only 1-n in connector"
                );
                return Err(StreetNetworkError::invalid_request(format!(
                    "Geovelo, managing only 1-n in connector, requested {origins}-{destinations}"
                )));
            }

            let body = self.encode(&request.origins, &request.destinations)?;
            let response = self.call_routes(body, context).await?;

            wire::decode_matrix(&response.body, request.pair_count())
                .map_err(|failure| self.parse_failure(failure, context))
        })
    }

    fn direct_path<'a>(
        &'a self,
        request: DirectPathRequest<'a>,
        context: &'a RequestContext,
    ) -> StreetNetworkFuture<'a, Itinerary> {
        Box::pin(async move {
            self.check_mode(request.mode, context)?;

            let body = self.encode(&[request.origin], &[request.destination])?;
            let response = self.call_routes(body, context).await?;

            let duration = wire::decode_direct_path_duration(&response.body)
                .map_err(|failure| self.parse_failure(failure, context))?;
            Ok(wire::build_itinerary(duration, &request))
        })
    }
}
