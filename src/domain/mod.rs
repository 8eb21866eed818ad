// Domain layer: item/pool models and collaborator ports. No I/O here.

pub mod model;
pub mod ports;
