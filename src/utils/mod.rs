// Utils compartidos

pub mod constants;
pub mod ids;
pub mod storage;

pub use constants::*;
pub use ids::generar_id;
pub use storage::{backend_por_defecto, MemoryBackend, StorageBackend};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageBackend;
