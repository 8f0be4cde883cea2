//! Command handler layer.
//!
//! This module owns the commands available at the console prompt.
//!
//! ## Files
//! - `builtin.rs` — the core command set and its manual content.
//!
//! ## Principles
//! - Validate inputs at the dispatcher; keep handlers thin.
//! - Delegate business logic to `services/*`.
//! - Keep descriptor text and output shapes stable: they are part of
//!   the console's text protocol.

pub mod builtin;
