//! Integration test crate for the quoracle workspace.
//!
//! This crate has no library code; it only contains integration tests
//! that exercise end-to-end flows across the workspace crates.
//!
//! ```sh
//! cargo test -p quoracle-integration-tests
//! ```
