//! Integration tests for configuration building and variant generation
//!
//! Tests are organized by topic:
//! - `builder` - Baseline construction from the default table
//! - `variants` - Override semantics, naming and lineage
//! - `registration` - Execution-manager wiring and setup failures
//! - `scenario` - Complete jobs from descriptor to registration

mod builder;
mod scenario;
