use lastmile_core::{DirectPathRequest, Itinerary, RequestContext, StreetNetwork};
use serde::Serialize;
use serde_json::Value;

use crate::cli::DirectPathArgs;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct DirectPathResponseData<'a> {
    request_id: Option<&'a str>,
    provider: &'a str,
    itinerary: Itinerary,
}

pub async fn run(
    args: &DirectPathArgs,
    provider_name: &str,
    provider: &dyn StreetNetwork,
    context: &RequestContext,
) -> Result<Value, CliError> {
    let request = DirectPathRequest {
        mode: args.mode,
        origin: &args.from,
        destination: &args.to,
        datetime: args.datetime,
        clockwise: !args.arrive_by,
    };
    let itinerary = provider.direct_path(request, context).await?;

    Ok(serde_json::to_value(DirectPathResponseData {
        request_id: context.request_id.as_deref(),
        provider: provider_name,
        itinerary,
    })?)
}
