pub mod overlay;
pub mod wasm_api;
