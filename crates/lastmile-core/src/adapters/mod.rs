//! Street-network provider connectors.

mod geovelo;

pub use geovelo::GeoveloConnector;
