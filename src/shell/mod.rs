//! External command execution and shell environment detection.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{
    is_executable, quote, resolve_tool_path, CommandResult, CommandRunner, Invocation,
    SystemRunner,
};
pub use mock::{Scripted, ScriptedRunner};
pub use platform::{is_ci, is_elevated, startup_files, ShellType};
