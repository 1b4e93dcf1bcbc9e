//! Type system for fedplan values.
//!
//! `Value` carries literals and source property values, `DataType` is the
//! runtime type consulted by conversion pushdown checks.

mod data_type;
mod value;

pub use data_type::DataType;
pub use value::Value;
