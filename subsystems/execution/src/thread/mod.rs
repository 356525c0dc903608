//! # Thread Management
//!
//! Thread records, their state machine, and the table that owns them.

pub mod thread;
pub mod registry;
pub mod states;

pub use thread::*;
pub use registry::*;
pub use states::*;
