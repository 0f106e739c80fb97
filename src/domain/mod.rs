// Domain layer: lead model, form schema, static catalog and ports.

pub mod catalog;
pub mod model;
pub mod ports;
pub mod schema;
