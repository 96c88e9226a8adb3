// Domain layer: request/response payloads and the service port.

pub mod model;
pub mod ports;
