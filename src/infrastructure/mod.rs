//! Infrastructure layer - Store backends, key generation and the registry

pub mod api_key;
pub mod logging;
pub mod storage;
