//! tests/component/mod.rs
//!
//! In-memory tests of the runner, discovery and reporting, driven through
//! the public library API without spawning the binary.

mod feature;
