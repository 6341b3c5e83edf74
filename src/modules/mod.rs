//! Custom data modules registered beside the host's own.
pub mod category_bundle;
