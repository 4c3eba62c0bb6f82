//! System-prompt policy applied to every relayed turn list.

use relaychat_types::{Role, TurnPayload};

/// Force the relay's instruction into the turn list.
///
/// Without a `system` turn one is prepended. Otherwise the content of every
/// `system` turn is overwritten, keeping turn count and order intact.
pub fn apply_system_prompt(mut turns: Vec<TurnPayload>, instruction: &str) -> Vec<TurnPayload> {
    let mut found = false;
    for turn in turns.iter_mut().filter(|t| t.role == Role::System) {
        turn.content = instruction.to_owned();
        found = true;
    }
    if !found {
        turns.insert(0, TurnPayload::new(Role::System, instruction));
    }
    turns
}
