//! Shared helpers for WASM API operations
//!
//! Common patterns for serialization, error handling, and console
//! logging across the API surface.

use crate::errors::TrainerError;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ============================================================================
// Console Logging Functions
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn info(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn warn(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn error(s: &str);
}

// ============================================================================
// Logging Macros
// ============================================================================

/// Log a debug message with [WASM] prefix
#[macro_export]
macro_rules! wasm_log {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_debug(&format!($($arg)*))
    };
}

/// Log an info message with [WASM] prefix
#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_info(&format!($($arg)*))
    };
}

/// Log a warning message with [WASM] ⚠️ prefix
#[macro_export]
macro_rules! wasm_warn {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_warn(&format!($($arg)*))
    };
}

/// Log an error message with [WASM] ❌ prefix
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_error(&format!($($arg)*))
    };
}

// ============================================================================
// Logging Helper Functions (called by macros)
// ============================================================================

pub fn log_debug(msg: &str) {
    log(&format!("[WASM] {}", msg));
}

pub fn log_info(msg: &str) {
    info(&format!("[WASM] {}", msg));
}

pub fn log_warn(msg: &str) {
    warn(&format!("[WASM] ⚠️ {}", msg));
}

pub fn log_error(msg: &str) {
    error(&format!("[WASM] ❌ {}", msg));
}

// ============================================================================
// Serialization / Error Conversion Helpers
// ============================================================================

/// Serialize a value to JavaScript with automatic error handling
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| {
        let msg = format!("{}: {}", error_context, e);
        log_error(&msg);
        JsValue::from_str(&msg)
    })
}

/// Serialize a callback payload, degrading to null on failure
///
/// Callback invocations must not abort the engine call that triggered
/// them, so serialization failures are logged and replaced with null.
pub fn serialize_lossy<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        log_error(&format!("callback payload serialization failed: {}", e));
        JsValue::NULL
    })
}

/// Convert a configuration error to a JsValue
pub fn config_error(err: TrainerError) -> JsValue {
    let msg = err.to_string();
    log_error(&msg);
    JsValue::from_str(&msg)
}
