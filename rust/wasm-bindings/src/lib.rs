//! Geofence-Lite WebAssembly Bindings
//!
//! JavaScript/TypeScript API for Geofence-Lite built with wasm-bindgen.

use wasm_bindgen::prelude::*;

#[cfg(feature = "console_error_panic_hook")]
pub use console_error_panic_hook::set_once as set_panic_hook;

mod api;
mod error;
mod mesh_data;
mod utils;

pub use api::{ContainmentJs, GeofenceAPI, ValidationReportJs};
pub use error::ApiError;
pub use mesh_data::MeshDataJs;
pub use utils::set_panic_hook as init_panic_hook;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    utils::set_panic_hook();
}

/// Get the version of Geofence-Lite
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
