//! Contract tests: every registered provider is used through the same
//! `StreetNetwork` trait object, selected by configured name.

mod common;

use std::sync::Arc;

use common::{place, table, Reply, ScriptedHttpClient};
use lastmile_core::{
    parse_provider_settings, DirectPathRequest, Itinerary, MatrixEntry, Place, PlaceRef,
    RequestContext, RoutingMatrix, RoutingMatrixRequest, StreetNetwork, StreetNetworkError,
    StreetNetworkErrorKind, StreetNetworkFuture, StreetNetworkMode, StreetNetworkRegistry,
    UtcDateTime, ValidationError,
};

/// Walking provider computing durations from a fixed pace, no network.
struct FixedPaceProvider {
    seconds_per_pair: i64,
}

impl StreetNetwork for FixedPaceProvider {
    fn routing_matrix<'a>(
        &'a self,
        request: RoutingMatrixRequest<'a>,
        _context: &'a RequestContext,
    ) -> StreetNetworkFuture<'a, RoutingMatrix> {
        Box::pin(async move {
            if request.mode != StreetNetworkMode::Walking {
                return Err(StreetNetworkError::unsupported_mode("fixed_pace", request.mode));
            }
            Ok(RoutingMatrix::single_row(
                (0..request.pair_count())
                    .map(|_| MatrixEntry::reached(self.seconds_per_pair))
                    .collect(),
            ))
        })
    }

    fn direct_path<'a>(
        &'a self,
        request: DirectPathRequest<'a>,
        _context: &'a RequestContext,
    ) -> StreetNetworkFuture<'a, Itinerary> {
        Box::pin(async move {
            Ok(Itinerary {
                duration: self.seconds_per_pair,
                departure_date_time: request.datetime,
                arrival_date_time: request.datetime.plus_seconds(self.seconds_per_pair),
                sections: Vec::new(),
            })
        })
    }
}

fn build_registry(client: Arc<ScriptedHttpClient>) -> StreetNetworkRegistry {
    let settings = parse_provider_settings(
        r#"[{"name": "bike", "kind": "geovelo", "url": "https://geovelo.example.test", "api_key": "k"}]"#,
    )
    .expect("valid settings");
    let mut registry =
        StreetNetworkRegistry::from_settings_with_client(&settings, client).expect("valid registry");
    registry
        .register("walk", Arc::new(FixedPaceProvider { seconds_per_pair: 240 }))
        .expect("unique name");
    registry
}

async fn durations(
    provider: &dyn StreetNetwork,
    mode: StreetNetworkMode,
    origin: &Place,
    destinations: &[Place],
) -> Result<Vec<i64>, StreetNetworkError> {
    let request = RoutingMatrixRequest::new(
        vec![origin as &dyn PlaceRef],
        destinations.iter().map(|place| place as &dyn PlaceRef).collect(),
        mode,
        1_800,
    )?;
    let context = RequestContext::with_request_id("contract");
    let matrix = provider.routing_matrix(request, &context).await?;
    Ok(matrix.entries().map(|entry| entry.duration).collect())
}

#[tokio::test]
async fn providers_are_interchangeable_through_the_trait() {
    let client = ScriptedHttpClient::always(Reply::ok(table(&[Some(100), Some(200)])));
    let registry = build_registry(client.clone());
    let origin = place(48.85, 2.35);
    let destinations = vec![place(48.86, 2.36), place(48.87, 2.37)];

    let bike = registry.require("bike").expect("registered");
    let walk = registry.require("walk").expect("registered");

    assert_eq!(
        durations(bike.as_ref(), StreetNetworkMode::Bike, &origin, &destinations)
            .await
            .expect("bike matrix"),
        vec![100, 200]
    );
    assert_eq!(
        durations(walk.as_ref(), StreetNetworkMode::Walking, &origin, &destinations)
            .await
            .expect("walk matrix"),
        vec![240, 240]
    );
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn every_provider_rejects_modes_it_cannot_serve() {
    let client = ScriptedHttpClient::always(Reply::ok(table(&[Some(100)])));
    let registry = build_registry(client.clone());
    let origin = place(48.85, 2.35);
    let destinations = vec![place(48.86, 2.36)];

    for (name, mode) in [
        ("bike", StreetNetworkMode::Car),
        ("walk", StreetNetworkMode::Bike),
    ] {
        let provider = registry.require(name).expect("registered");
        let error = durations(provider.as_ref(), mode, &origin, &destinations)
            .await
            .expect_err("unsupported mode must fail");
        assert_eq!(error.kind(), StreetNetworkErrorKind::InvalidRequest, "{name}");
    }
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn direct_path_is_available_on_every_provider() {
    let client = ScriptedHttpClient::always(Reply::ok(table(&[Some(240)])));
    let registry = build_registry(client);
    let origin = place(48.85, 2.35);
    let destination = place(48.86, 2.36);
    let datetime = UtcDateTime::parse("2024-03-10T08:00:00Z").expect("valid");

    for (name, mode) in [
        ("bike", StreetNetworkMode::Bike),
        ("walk", StreetNetworkMode::Walking),
    ] {
        let provider = registry.require(name).expect("registered");
        let context = RequestContext::default();
        let itinerary = provider
            .direct_path(
                DirectPathRequest {
                    mode,
                    origin: &origin,
                    destination: &destination,
                    datetime,
                    clockwise: true,
                },
                &context,
            )
            .await
            .expect("direct path");
        assert_eq!(itinerary.arrival_date_time, datetime.plus_seconds(240), "{name}");
    }
}

#[test]
fn unknown_provider_name_is_a_validation_error() {
    let registry = build_registry(ScriptedHttpClient::always(Reply::ok("[]")));

    let error = registry.require("scooter").err().expect("not registered");
    assert!(matches!(error, ValidationError::UnknownProvider { .. }));
    assert_eq!(registry.names(), vec!["bike", "walk"]);
}
