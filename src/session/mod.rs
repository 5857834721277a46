//! The reading session: state, messages, and the reducer that sequences
//! line-by-line speech.

mod messages;
mod state;
mod update;

pub use messages::Message;
pub use state::{PlayState, Reader, Session};
pub(crate) use update::Effect;
