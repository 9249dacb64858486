// ============================================================================
// COLA DE SINCRONIZACIÓN PERSISTENTE
// ============================================================================
// Log FIFO de intenciones de escritura pendientes de confirmar por el
// backend. Independiente del snapshot local: la cola es la unidad de
// "trabajo aún no confirmado por un sistema remoto". Nunca se reordena
// ni se deduplica; solo se elimina la cabeza tras un replay exitoso.
// ============================================================================

use crate::models::SyncEntry;
use crate::utils::constants::STORAGE_KEY_QUEUE;
use crate::utils::storage::StorageBackend;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone)]
pub struct SyncQueue {
    backend: Rc<dyn StorageBackend>,
    entradas: Rc<RefCell<Vec<SyncEntry>>>,
}

impl SyncQueue {
    /// Carga la cola persistida; un blob ausente o corrupto arranca vacío.
    pub fn new(backend: Rc<dyn StorageBackend>) -> Self {
        let entradas = match backend.get_item(STORAGE_KEY_QUEUE) {
            Some(json) => match serde_json::from_str::<Vec<SyncEntry>>(&json) {
                Ok(entradas) => {
                    if !entradas.is_empty() {
                        log::info!("📋 Cola de sync cargada: {} pendientes", entradas.len());
                    }
                    entradas
                }
                Err(e) => {
                    log::error!("❌ Cola de sync corrupta, se descarta: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Self {
            backend,
            entradas: Rc::new(RefCell::new(entradas)),
        }
    }

    /// Agrega una entrada al final. La escritura durable es best-effort:
    /// si localStorage falla, la entrada sobrevive solo en memoria.
    pub fn enqueue(&self, entrada: SyncEntry) {
        self.entradas.borrow_mut().push(entrada);
        self.persistir();
    }

    /// Lectura completa en orden, para el contador de pendientes de la UI.
    pub fn peek_all(&self) -> Vec<SyncEntry> {
        self.entradas.borrow().clone()
    }

    /// Primera entrada sin removerla.
    pub fn head(&self) -> Option<SyncEntry> {
        self.entradas.borrow().first().cloned()
    }

    /// Remueve exactamente la primera entrada. Sin remoción por lotes
    /// ni arbitraria: el orden causal depende de esto.
    pub fn dequeue_head(&self) -> Option<SyncEntry> {
        let entrada = {
            let mut entradas = self.entradas.borrow_mut();
            if entradas.is_empty() {
                None
            } else {
                Some(entradas.remove(0))
            }
        };
        if entrada.is_some() {
            self.persistir();
        }
        entrada
    }

    pub fn len(&self) -> usize {
        self.entradas.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entradas.borrow().is_empty()
    }

    fn persistir(&self) {
        let json = match serde_json::to_string(&*self.entradas.borrow()) {
            Ok(json) => json,
            Err(e) => {
                log::error!("❌ Error serializando cola de sync: {}", e);
                return;
            }
        };
        if let Err(e) = self.backend.set_item(STORAGE_KEY_QUEUE, &json) {
            log::error!("❌ Error guardando cola de sync: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operacion;
    use crate::utils::storage::MemoryBackend;
    use serde_json::json;

    fn entrada(n: u32) -> SyncEntry {
        SyncEntry::nueva(
            "Centros_Vacunacion",
            Operacion::Post,
            json!({ "nombre_centro": format!("Centro {}", n) }),
        )
    }

    #[test]
    fn fifo_en_orden_de_llegada() {
        let cola = SyncQueue::new(MemoryBackend::compartido());
        cola.enqueue(entrada(1));
        cola.enqueue(entrada(2));
        cola.enqueue(entrada(3));

        assert_eq!(cola.len(), 3);
        let todas = cola.peek_all();
        assert_eq!(todas[0].data["nombre_centro"], "Centro 1");
        assert_eq!(todas[2].data["nombre_centro"], "Centro 3");

        let primera = cola.dequeue_head().unwrap();
        assert_eq!(primera.data["nombre_centro"], "Centro 1");
        assert_eq!(cola.len(), 2);
        assert_eq!(cola.head().unwrap().data["nombre_centro"], "Centro 2");
    }

    #[test]
    fn sobrevive_reinicio_del_proceso() {
        let backend = MemoryBackend::compartido();
        {
            let cola = SyncQueue::new(backend.clone());
            cola.enqueue(entrada(1));
            cola.enqueue(entrada(2));
        }

        // Nueva instancia sobre el mismo backend (reinicio simulado)
        let cola = SyncQueue::new(backend);
        assert_eq!(cola.len(), 2);
        assert_eq!(cola.head().unwrap().data["nombre_centro"], "Centro 1");
    }

    #[test]
    fn blob_corrupto_arranca_vacio() {
        let backend = MemoryBackend::compartido();
        backend.set_item(STORAGE_KEY_QUEUE, "esto no es json").unwrap();

        let cola = SyncQueue::new(backend);
        assert!(cola.is_empty());
    }

    #[test]
    fn dequeue_sobre_vacia_es_none() {
        let cola = SyncQueue::new(MemoryBackend::compartido());
        assert!(cola.dequeue_head().is_none());
    }
}
