//! Provides the interface through which searches obtain target structures.
//!
//! Parsing structure files is left to the caller; this module only defines the
//! sequential [`traits::StructureSource`] contract, an in-memory implementation,
//! and [`shared::SharedSource`], the synchronized wrapper that batch workers pull from.

pub mod shared;
pub mod traits;
