//! Host glue for the rotation engine.
//!
//! The host owns the tick, the chat stream, and the command line; this crate
//! translates all three into engine calls. [`Session`] ties one character's
//! engine to its persisted settings, [`command`] parses the `/encore`
//! command surface, and [`chat`] classifies incoming chat lines into
//! interrupt signals.
pub mod chat;
pub mod command;
pub mod session;

pub use command::{Command, CommandError};
pub use session::{Session, SessionError};
