pub mod port;
pub mod scripted;

pub use port::PagePort;
pub use scripted::{PageCall, ScriptedPage, SimElement};
