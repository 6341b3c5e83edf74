//! Domain layer: host views, the bundle rule, events and ports.
pub mod aggregates;
pub mod events;
pub mod ports;
pub mod value_objects;
