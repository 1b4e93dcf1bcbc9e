//! Core model for fedplan.
//!
//! This crate provides what the planner consults but never rewrites:
//! - `Value` and `DataType` for the type system
//! - `ModelId`, `GroupSymbol` and `ElementSymbol` for resolved symbols
//! - `QueryMetadata`, the metadata contract
//! - `SourceCapabilities` and `CapabilitiesFinder`, the capability registry

pub mod capabilities;
pub mod metadata;
pub mod symbol;
pub mod testing;
pub mod types;

mod proptest_utils;

pub use capabilities::{
    BasicCapabilitiesFinder, CapabilitiesFinder, Capability, ExecutionFactory, Format,
    SourceCapabilities,
};
pub use metadata::{QueryMetadata, Searchability};
pub use symbol::{ElementSymbol, GroupSymbol, ModelId};
pub use types::{DataType, Value};
