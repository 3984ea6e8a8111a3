//! Guitar Fretboard Trainer WASM Module
//!
//! This is the main WASM module for the fretboard note trainer.
//! It owns the quiz engine: note arithmetic, position enumeration,
//! the drill-mode state machines, and session timing/scoring. The
//! JavaScript shell renders the fretboard and forwards user input
//! through the `api` layer.

pub mod api;
pub mod errors;
pub mod models;
pub mod quiz;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use errors::TrainerError;
pub use models::fretboard::*;
pub use models::game_state::*;
pub use models::pitch::*;
pub use models::tuning::*;
pub use quiz::{AnswerReport, Callbacks, Quiz, QuizFactory, QuizInput};
pub use session::SessionController;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize logger");

    log::info!("Fretboard Trainer WASM module initialized");
}
