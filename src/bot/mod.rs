//! Chat front end.
//!
//! Maps admin commands and button presses onto catalog operations and
//! formats the results as HTML messages. The messaging transport itself
//! lives outside the crate.

mod command;
mod handler;
pub mod messages;
mod reply;

pub use command::{Callback, Command};
pub use handler::{Bot, Prompt};
pub use reply::{Button, CallbackAnswer, Reply};
