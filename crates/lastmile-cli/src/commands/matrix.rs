use lastmile_core::{
    RequestContext, RoutingMatrix, RoutingMatrixRequest, StreetNetwork, StreetNetworkMode,
};
use serde::Serialize;
use serde_json::Value;

use crate::cli::MatrixArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct MatrixResponseData<'a> {
    request_id: Option<&'a str>,
    provider: &'a str,
    mode: StreetNetworkMode,
    reverse: bool,
    matrix: RoutingMatrix,
}

pub async fn run(
    args: &MatrixArgs,
    provider_name: &str,
    provider: &dyn StreetNetwork,
    context: &RequestContext,
) -> Result<Value, CliError> {
    let single = std::slice::from_ref(&args.from);
    let (origins, destinations) = if args.reverse {
        (args.to.as_slice(), single)
    } else {
        (single, args.to.as_slice())
    };

    let request =
        RoutingMatrixRequest::from_places(origins, destinations, args.mode, args.max_duration)?;
    let matrix = provider.routing_matrix(request, context).await?;

    Ok(serde_json::to_value(MatrixResponseData {
        request_id: context.request_id.as_deref(),
        provider: provider_name,
        mode: args.mode,
        reverse: args.reverse,
        matrix,
    })?)
}
