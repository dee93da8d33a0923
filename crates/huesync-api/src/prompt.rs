// Interaction prompter contract
//
// Exactly two operations, both side-effecting only. The engine treats the
// button prompt as synchronous: reconciliation suspends until it resolves
// (or the engine's pairing window elapses around it).

/// Human-in-the-loop capability for the pairing handshake.
#[allow(async_fn_in_trait)]
pub trait Prompter {
    /// Block (or suspend) until the human has had a chance to press the
    /// bridge's physical link button.
    async fn prompt_for_button(&self);

    /// Inform the human that the press window elapsed without success.
    fn notify_not_pressed(&self);
}
