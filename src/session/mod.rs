//! Editing-session state: buffers, backend contract, configuration and the
//! controller that ties them together.

pub mod backend;
pub mod buffer;
pub mod config;
pub mod controller;
pub mod editor;

pub use backend::{Backend, BuildResult, FileEntry, IncludeFile, LoadedFile};
pub use buffer::{MemoryBuffer, TextBuffer};
pub use config::EditorConfig;
pub use controller::{BuildState, Completion, MainState, SessionController};
pub use editor::EditorSession;
