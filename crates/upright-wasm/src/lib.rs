//! Upright WASM - WebAssembly bindings for Upright
//!
//! This crate exposes upright-core to JavaScript/TypeScript so a browser
//! image picker can hand over upright pixels.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `orientation` - Orientation normalization and decoding bindings
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_upright } from '@upright/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_upright(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod orientation;
mod types;

// Re-export public types
pub use orientation::{decode_upright, describe_orientation, get_orientation, normalize_orientation};
pub use types::JsBitmap;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
