//! Integration tests for the computation core
//!
//! Tests are organized by topic:
//! - `recalculate` - Full resolve/evaluate/aggregate pipeline
//! - `club_model` - A realistic club variable set exercised end-to-end
