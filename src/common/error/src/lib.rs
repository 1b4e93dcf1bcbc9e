//! Error types and result aliases for fedplan.
//!
//! Planning distinguishes two outcomes that must never be confused: a construct
//! that a source cannot evaluate is an ordinary `false` verdict, while a failed
//! metadata or cost lookup is a [`FedplanError`] that ends the optimization pass.

mod error;

pub use error::{FedplanError, FedplanResult};
