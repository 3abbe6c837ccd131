//! Snapshot integration tests
//!
//! Boundary validation and imports of legacy fractional positions.

mod validation;
