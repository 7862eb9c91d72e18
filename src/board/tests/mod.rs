//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Leaf counts against published values
//! - `draw.rs` - Game end and draw detection (50-move, repetition, material)
//! - `make_unmake.rs` - Make/take move correctness
//! - `edge_cases.rs` - Special positions and edge cases
//! - `observer.rs` - Piece event notifications
//! - `proptest.rs` - Property-based tests

mod draw;
