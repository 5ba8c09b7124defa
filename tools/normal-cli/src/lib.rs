//! lnormal library
//!
//! OBJ loading, file-backed slots and configuration for the `lnormal` tool,
//! plus the command implementations so they can be driven from tests.

pub mod commands;
pub mod config;
pub mod obj;
pub mod slots;

pub use commands::Workspace;
pub use config::Config;
pub use obj::{load_obj, parse_obj};
pub use slots::{FileSlots, default_slots_path};
