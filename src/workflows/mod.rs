//! Hooks into the host's promotion workflows.
pub mod hooks;

pub use hooks::PromotionHooks;
