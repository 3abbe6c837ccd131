//! Store integration tests
//!
//! The reference store commits engine results with per-scope optimistic
//! versioning. These tests drive it from several threads and through the
//! JSON persistence layer.

mod concurrency;
mod persistence;
