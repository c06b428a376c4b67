// Domain layer: value types and the ports implemented by adapters.

pub mod model;
pub mod ports;
