//! # Domain Models
//!
//! Place, matrix and itinerary types exchanged between the planner and the
//! street-network providers.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`GeoPoint`] | Validated WGS84 coordinate |
//! | [`PlaceRef`] | Read-only view of a planner place |
//! | [`Place`] | Owned place value |
//! | [`StreetNetworkMode`] | walking, bike, car, bss |
//! | [`RoutingMatrix`] | Positional travel-time matrix |
//! | [`Itinerary`] | Direct path with sections and geometry |
//! | [`UtcDateTime`] | UTC timestamp |

mod geo;
mod itinerary;
mod matrix;
mod mode;
mod timestamp;

pub use geo::{GeoPoint, Place, PlaceRef};
pub use itinerary::{Itinerary, PathItem, Section};
pub use matrix::{MatrixEntry, MatrixRow, RoutingMatrix, RoutingStatus, UNREACHED_DURATION};
pub use mode::StreetNetworkMode;
pub use timestamp::UtcDateTime;
