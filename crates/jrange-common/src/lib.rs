//! Common types and utilities for the jrange type-set lattice.
//!
//! This crate provides foundational types used across all jrange crates:
//! - Class-name pooling (`Atom`, `ShardedInterner`)
//! - Diagnostic types, codes and message templates
//! - Centralized limits and thresholds

// String interning for class and descriptor names
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Diagnostics surfaced by the lattice and the propagation driver
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticMessage};

// Centralized limits and thresholds
pub mod limits;
