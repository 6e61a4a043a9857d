//! sw-core - Core library for Setwise
//!
//! This crate provides the SQL type system, relation schemas, backend
//! identifiers, and capability configuration parsing shared by all Setwise
//! components.

pub mod backend_name;
pub mod config;
pub mod error;
pub mod schema;
pub mod set_op;
pub mod types;

pub use backend_name::BackendName;
pub use config::{BackendOverride, Config, DialectKind, OrderPolicy, SupportSetting};
pub use error::{CoreError, CoreResult};
pub use schema::{Column, Schema};
pub use set_op::{Multiplicity, SetOpKind};
pub use types::{parse_sql_type, FloatBitWidth, IntBitWidth, Nullability, SqlType};
