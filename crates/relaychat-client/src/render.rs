use relaychat_types::ChatTurn;

use crate::session::SessionPhase;

/// Receives every observable change of a session's turn list.
///
/// `render` is called once per change (user turn appended, placeholder
/// appended, each streamed fragment, fallback error), never batched.
pub trait RenderSink {
    fn render(&mut self, turns: &[ChatTurn]);

    /// Called on every phase transition. Front-ends use it to disable input
    /// while a reply is in flight.
    fn phase(&mut self, _phase: SessionPhase) {}
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render(&mut self, _turns: &[ChatTurn]) {}
}
