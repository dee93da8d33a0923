//! Console realization of the interaction prompter.

use huesync_api::Prompter;
use tracing::debug;

/// Prompts on the terminal via dialoguer.
///
/// The blocking read runs on the blocking pool so the engine's pairing
/// window timer keeps ticking while the human decides.
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    async fn prompt_for_button(&self) {
        let result = tokio::task::spawn_blocking(|| {
            dialoguer::Confirm::new()
                .with_prompt("Press the link button on the bridge, then confirm")
                .default(true)
                .interact()
        })
        .await;

        match result {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => debug!("button prompt failed: {e}"),
            Err(e) => debug!("button prompt task failed: {e}"),
        }
    }

    fn notify_not_pressed(&self) {
        eprintln!("Button must be pressed within 30 seconds of a link attempt");
    }
}
