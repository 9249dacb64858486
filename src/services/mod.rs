pub mod local_store;
pub mod sync_queue;
pub mod sync_service;
pub mod network_monitor;
pub mod resolver;

pub mod centro_service;
pub mod cita_service;
pub mod nino_service;
pub mod vacuna_service;

#[cfg(target_arch = "wasm32")]
pub mod api_client;

pub use centro_service::CentroService;
pub use cita_service::CitaService;
pub use local_store::LocalStore;
pub use network_monitor::{NetworkMonitor, NetworkStatus};
pub use nino_service::NinoService;
pub use sync_queue::SyncQueue;
pub use sync_service::SyncService;
pub use vacuna_service::VacunaService;

#[cfg(target_arch = "wasm32")]
pub use api_client::ApiClient;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Deserialización tolerante del fold autoritativo: los registros que no
/// calzan con el modelo tipado se loguean y se saltan, nunca tumban la
/// lectura completa.
pub(crate) fn desde_valores<T: DeserializeOwned>(coleccion: &str, valores: Vec<Value>) -> Vec<T> {
    valores
        .into_iter()
        .filter_map(|valor| match serde_json::from_value::<T>(valor) {
            Ok(registro) => Some(registro),
            Err(e) => {
                log::warn!("⚠️ Registro inválido en {}, se omite: {}", coleccion, e);
                None
            }
        })
        .collect()
}
