//! Source capability registry.
//!
//! A `SourceCapabilities` record states which operators, functions and
//! properties one source supports. Records are looked up through a
//! `CapabilitiesFinder` and never change during optimization.

mod capability;
mod factory;
mod finder;
mod source;

pub use capability::Capability;
pub use factory::{ExecutionFactory, Format};
pub use finder::{BasicCapabilitiesFinder, CapabilitiesFinder};
pub use source::SourceCapabilities;
