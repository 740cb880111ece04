// Domain layer: records, letters, reports and the ports the engine depends on.

pub mod model;
pub mod ports;
