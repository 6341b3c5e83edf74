//! Adapters for the domain ports.
pub mod in_memory;
pub mod nats;
pub mod postgres;
