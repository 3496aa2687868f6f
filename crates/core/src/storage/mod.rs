pub mod format;
pub mod kv;
pub mod manager;

#[cfg(not(target_arch = "wasm32"))]
pub mod file_store;
