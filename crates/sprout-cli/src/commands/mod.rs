pub mod check;
pub mod concepts;
pub mod lessons;
pub mod play;
pub mod run;

use sprout_runtime::{Capabilities, Engine};

/// Build an engine for an optional tier flag
pub fn engine_for_tier(tier: Option<u8>) -> Engine {
    match tier {
        Some(t) => Engine::new().with_capabilities(Capabilities::tier(t)),
        None => Engine::new(),
    }
}
