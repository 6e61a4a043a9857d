//! Command implementations

pub(crate) mod backends;
pub(crate) mod capabilities;
pub(crate) mod common;
pub(crate) mod compile;
