//! Check configuration subsystem.
//!
//! # Data Flow
//! ```text
//! explicit struct construction
//!     → schema.rs (config structs, defaults)
//!     → handed to a check constructor
//!
//! connection string (DSN)
//!     → dsn.rs (scheme validation, lenient decomposition)
//!     → per-check parse in src/checks/*
//!     → same config structs as explicit construction
//! ```
//!
//! # Design Decisions
//! - Configs are immutable once built; checks clone what they keep
//! - All fields have defaults so minimal construction stays short
//! - DSN validation fails fast at construction, never at first invocation

pub mod dsn;
pub mod schema;

pub use schema::DEFAULT_TIMEOUT;
