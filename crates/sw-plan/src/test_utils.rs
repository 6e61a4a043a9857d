//! Shared test utilities for sw-plan

use crate::capability::{BackendCapabilities, CapabilityRegistry};
use crate::expr::TableExpr;
use sw_core::{IntBitWidth, Schema, SqlType};

/// Shorthand for `SqlType::Integer { bits: IntBitWidth::I32 }`
pub(crate) fn int32() -> SqlType {
    SqlType::Integer {
        bits: IntBitWidth::I32,
    }
}

/// Shorthand for `SqlType::Integer { bits: IntBitWidth::I64 }`
pub(crate) fn int64() -> SqlType {
    SqlType::Integer {
        bits: IntBitWidth::I64,
    }
}

/// Shorthand for `SqlType::String { max_length: None }`
pub(crate) fn varchar() -> SqlType {
    SqlType::String { max_length: None }
}

/// Schema from `(name, type)` pairs
pub(crate) fn schema(cols: &[(&str, SqlType)]) -> Schema {
    Schema::from_pairs(cols.iter().cloned()).unwrap()
}

/// Named table with the given columns
pub(crate) fn table(name: &str, cols: &[(&str, SqlType)]) -> TableExpr {
    TableExpr::table(name, schema(cols))
}

/// Built-in capabilities of one backend
pub(crate) fn caps(backend: &str) -> &'static BackendCapabilities {
    CapabilityRegistry::builtin().get(backend).unwrap()
}
