// ============================================================================
// VACUNAPP - NÚCLEO OFFLINE-FIRST DEL PROGRAMA DE VACUNACIÓN PEDIÁTRICA
// ============================================================================
// Capa de datos local-first: toda escritura se aplica de inmediato al
// snapshot local (optimista), se encola de forma durable y se reproduce
// contra el backend al volver la conexión, en orden FIFO con parada en
// el primer fallo.
//
// - models: estructuras de dominio y de sincronización
// - services: snapshot local, cola, motor de sync, fachadas de dominio
// - state: sesión de usuario e insignia de sync (Rc<RefCell>)
// - utils: storage inyectable, constantes, ids
// ============================================================================

pub mod models;
pub mod services;
pub mod state;
pub mod utils;

use crate::services::{
    CentroService, CitaService, LocalStore, NetworkMonitor, NinoService, SyncQueue, SyncService,
    VacunaService,
};
use crate::state::{AuthState, SyncStateHandle};
use crate::utils::storage::StorageBackend;
use std::rc::Rc;

/// Raíz de composición: un backend de storage inyectado, una cola, un
/// snapshot y las fachadas de dominio que comparten ambos. Construir uno
/// por proceso (o uno por test, con un MemoryBackend fresco).
pub struct Servicios {
    pub store: LocalStore,
    pub sync: SyncService,
    pub monitor: NetworkMonitor,
    pub centros: CentroService,
    pub vacunas: VacunaService,
    pub ninos: NinoService,
    pub citas: CitaService,
    pub auth: AuthState,
    pub estado_sync: SyncStateHandle,
}

impl Servicios {
    pub fn new(backend: Rc<dyn StorageBackend>) -> Self {
        let cola = SyncQueue::new(backend.clone());
        let store = LocalStore::new(backend.clone(), cola.clone());
        let estado_sync = SyncStateHandle::new();
        let sync = SyncService::new(cola, estado_sync.clone());
        estado_sync.actualizar_pendientes(sync.pending_count());

        Self {
            centros: CentroService::new(store.clone()),
            vacunas: VacunaService::new(store.clone()),
            ninos: NinoService::new(store.clone()),
            citas: CitaService::new(store.clone()),
            auth: AuthState::new(backend),
            monitor: NetworkMonitor::new(),
            estado_sync,
            store,
            sync,
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod arranque {
    use super::*;
    use crate::utils::storage::backend_por_defecto;
    use std::cell::RefCell;
    use wasm_bindgen::prelude::*;

    thread_local! {
        static SERVICIOS: RefCell<Option<Servicios>> = RefCell::new(None);
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::default());
        log::info!("🚀 VacunApp - núcleo offline-first");

        let mut servicios = Servicios::new(backend_por_defecto());
        servicios.sync.start_auto_sync(&mut servicios.monitor);
        servicios.estado_sync.set_online(servicios.monitor.is_online());

        // Si arrancamos online con cola pendiente, drenar de una vez
        if servicios.monitor.is_online() && servicios.sync.pending_count() > 0 {
            servicios.sync.sync_now();
        }

        SERVICIOS.with(|celda| {
            *celda.borrow_mut() = Some(servicios);
        });
        Ok(())
    }

    /// Contador de pendientes para la insignia de la UI.
    #[wasm_bindgen]
    pub fn pendientes_de_sync() -> usize {
        SERVICIOS.with(|celda| {
            celda
                .borrow()
                .as_ref()
                .map(|s| s.sync.pending_count())
                .unwrap_or(0)
        })
    }

    /// Botón "sincronizar ahora": el drain falla rápido si no hay red.
    #[wasm_bindgen]
    pub fn sincronizar_ahora() {
        SERVICIOS.with(|celda| {
            if let Some(servicios) = celda.borrow().as_ref() {
                servicios.sync.sync_now();
            }
        });
    }
}
