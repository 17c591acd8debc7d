//! Callback types shared by the editor crates.
//!
//! The editor core is single-threaded, so callbacks are plain boxed `Fn`
//! without `Send` bounds.

/// Invoked with the family name once a font finishes loading (either way).
pub type ReadyCallback = Box<dyn Fn(&str)>;

/// Receives human-readable status lines.
pub type StatusCallback = Box<dyn Fn(&str)>;
