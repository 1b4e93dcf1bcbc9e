//! fedplan - capability-aware query planning for federated sources
//!
//! Decides which parts of a query each source can evaluate and turns
//! eligible equi-joins into dependent joins, where one input's join values
//! become an IN filter on the other.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export core crates
pub use common_config as config;
pub use common_display as display;
pub use common_error as error;
pub use fedplan_core as core;
pub use fedplan_logical as logical;
pub use fedplan_optimizer as optimizer;

/// fedplan version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
