//! Core of the MRO pipeline editor: dependency graphs for compiled pipelines
//! and the editing-session state machine around load, build and save.

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod format;
pub mod render;
pub mod session;
pub mod wasm;
