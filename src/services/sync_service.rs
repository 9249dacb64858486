// ============================================================================
// MOTOR DE SINCRONIZACIÓN - DRAIN FIFO CON PARADA EN PRIMER FALLO
// ============================================================================
// Drena la cola contra una función de replay remoto enchufable, en orden
// estricto de llegada. Una entrada se remueve de la cabeza solo tras
// confirmación exitosa; el primer fallo detiene el drain y deja el resto
// encolado en su orden original, así una escritura posterior sobre un
// registro nunca llega al backend antes que una anterior.
// ============================================================================

use crate::models::{EstadoSync, ResultadoDrenaje, SyncEntry};
use crate::services::sync_queue::SyncQueue;
use crate::state::SyncStateHandle;
use std::future::Future;

#[derive(Clone)]
pub struct SyncService {
    cola: SyncQueue,
    estado: SyncStateHandle,
}

impl SyncService {
    pub fn new(cola: SyncQueue, estado: SyncStateHandle) -> Self {
        Self { cola, estado }
    }

    /// Pendientes para la insignia de la UI.
    pub fn pending_count(&self) -> usize {
        self.cola.len()
    }

    /// Insignia compartida que el drain mantiene al día.
    pub fn estado(&self) -> SyncStateHandle {
        self.estado.clone()
    }

    /// Replay FIFO de la cola completa. `replay` debe fallar (Err) ante
    /// cualquier rechazo del backend o error de red; el timeout, si se
    /// quiere, va dentro de `replay` y cuenta como fallo.
    ///
    /// Interrumpir el proceso a mitad de drain deja la cola en estado
    /// válido: lo no confirmado sigue encolado y el reinicio es seguro.
    pub async fn drain<F, Fut>(&self, replay: F) -> ResultadoDrenaje
    where
        F: Fn(SyncEntry) -> Fut,
        Fut: Future<Output = Result<(), String>>,
    {
        let total = self.cola.len();
        if total == 0 {
            log::info!("📭 Sin cambios pendientes que sincronizar");
            self.estado.actualizar_pendientes(0);
            return ResultadoDrenaje::Completado { aplicados: 0 };
        }

        log::info!("🔄 Iniciando drain: {} pendientes", total);
        self.estado.set_estado(EstadoSync::Sincronizando);
        let mut aplicados = 0;

        loop {
            let entrada = match self.cola.head() {
                Some(entrada) => entrada,
                None => break,
            };

            match replay(entrada).await {
                Ok(()) => {
                    self.cola.dequeue_head();
                    aplicados += 1;
                }
                Err(error) => {
                    let pendientes = self.cola.len();
                    log::warn!(
                        "⚠️ Drain detenido en la entrada {} de {}: {} ({} quedan encoladas)",
                        aplicados + 1,
                        total,
                        error,
                        pendientes
                    );
                    self.estado.set_estado(EstadoSync::Error {
                        mensaje: error.clone(),
                    });
                    return ResultadoDrenaje::Detenido {
                        aplicados,
                        pendientes,
                        error,
                    };
                }
            }
        }

        log::info!("✅ Drain completo: {} cambios confirmados", aplicados);
        self.estado.actualizar_pendientes(0);
        ResultadoDrenaje::Completado { aplicados }
    }

    /// Sincronización manual ("sincronizar ahora"), invocable en cualquier
    /// momento: si en realidad no hay conexión, el primer replay falla
    /// rápido y eso detiene el drain como cualquier otro fallo.
    #[cfg(target_arch = "wasm32")]
    pub fn sync_now(&self) {
        use crate::services::api_client::ApiClient;

        let servicio = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let api = ApiClient::new();
            let _ = servicio.drain(move |entrada| {
                let api = api.clone();
                async move { api.replay(&entrada).await }
            })
            .await;
        });
    }

    /// Dispara exactamente un drain por cada transición offline → online.
    #[cfg(target_arch = "wasm32")]
    pub fn start_auto_sync(&self, monitor: &mut crate::services::network_monitor::NetworkMonitor) {
        let servicio = self.clone();
        monitor.on_online(move || {
            log::info!("🌐 Conexión restaurada, drenando cola automáticamente");
            servicio.sync_now();
        });
        log::info!("🚀 Auto-sync activo: drenará la cola al volver la conexión");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operacion;
    use crate::utils::storage::MemoryBackend;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn cola_con(n: usize) -> SyncQueue {
        let cola = SyncQueue::new(MemoryBackend::compartido());
        for i in 0..n {
            cola.enqueue(SyncEntry::nueva(
                "Centros_Vacunacion",
                Operacion::Post,
                json!({ "nombre_centro": format!("Centro {}", i), "direccion": "Calle 1" }),
            ));
        }
        cola
    }

    #[test]
    fn drain_exitoso_vacia_la_cola_en_orden() {
        // Replay siempre exitoso: cola vacía al final, una invocación
        // por entrada en orden de encolado
        let cola = cola_con(4);
        let servicio = SyncService::new(cola.clone(), SyncStateHandle::new());
        let vistos: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));

        let resultado = block_on(servicio.drain(|entrada| {
            let vistos = vistos.clone();
            async move {
                vistos
                    .borrow_mut()
                    .push(entrada.data["nombre_centro"].as_str().unwrap().to_string());
                Ok(())
            }
        }));

        assert_eq!(resultado, ResultadoDrenaje::Completado { aplicados: 4 });
        assert!(cola.is_empty());
        assert_eq!(servicio.estado().get_estado(), EstadoSync::Sincronizado);
        assert_eq!(
            *vistos.borrow(),
            vec!["Centro 0", "Centro 1", "Centro 2", "Centro 3"]
        );
    }

    #[test]
    fn fallo_en_la_entrada_k_detiene_y_conserva_la_cola() {
        // Falla la tercera: la fallida y las posteriores quedan en orden
        let cola = cola_con(5);
        let servicio = SyncService::new(cola.clone(), SyncStateHandle::new());
        let contador = Rc::new(RefCell::new(0usize));

        let resultado = block_on(servicio.drain(|_entrada| {
            let contador = contador.clone();
            async move {
                *contador.borrow_mut() += 1;
                if *contador.borrow() == 3 {
                    Err("HTTP 500: error del backend".to_string())
                } else {
                    Ok(())
                }
            }
        }));

        assert_eq!(
            resultado,
            ResultadoDrenaje::Detenido {
                aplicados: 2,
                pendientes: 3,
                error: "HTTP 500: error del backend".to_string(),
            }
        );
        let restantes = cola.peek_all();
        assert_eq!(restantes.len(), 3);
        assert_eq!(restantes[0].data["nombre_centro"], "Centro 2");
        assert_eq!(restantes[2].data["nombre_centro"], "Centro 4");
        // La insignia refleja el fallo
        assert_eq!(
            servicio.estado().get_estado(),
            EstadoSync::Error {
                mensaje: "HTTP 500: error del backend".to_string()
            }
        );
    }

    #[test]
    fn la_insignia_pasa_por_sincronizando_durante_el_drain() {
        let cola = cola_con(1);
        let servicio = SyncService::new(cola, SyncStateHandle::new());
        let estado = servicio.estado();
        let visto: Rc<RefCell<Option<EstadoSync>>> = Rc::new(RefCell::new(None));

        block_on(servicio.drain(|_entrada| {
            let estado = estado.clone();
            let visto = visto.clone();
            async move {
                *visto.borrow_mut() = Some(estado.get_estado());
                Ok(())
            }
        }));

        assert_eq!(*visto.borrow(), Some(EstadoSync::Sincronizando));
        assert_eq!(servicio.estado().get_estado(), EstadoSync::Sincronizado);
    }

    #[test]
    fn un_post_encolado_se_confirma_y_sale_de_la_cola() {
        let cola = SyncQueue::new(MemoryBackend::compartido());
        let esperado = SyncEntry::nueva(
            "Centros_Vacunacion",
            Operacion::Post,
            json!({ "nombre_centro": "Centro X", "direccion": "Calle 1" }),
        );
        cola.enqueue(esperado.clone());
        let servicio = SyncService::new(cola.clone(), SyncStateHandle::new());
        let recibidas: Rc<RefCell<Vec<SyncEntry>>> = Rc::new(RefCell::new(Vec::new()));

        block_on(servicio.drain(|entrada| {
            let recibidas = recibidas.clone();
            async move {
                recibidas.borrow_mut().push(entrada);
                Ok(())
            }
        }));

        assert_eq!(cola.len(), 0);
        assert_eq!(*recibidas.borrow(), vec![esperado]);
    }

    #[test]
    fn entrada_fallida_conserva_su_timestamp() {
        let cola = SyncQueue::new(MemoryBackend::compartido());
        cola.enqueue(SyncEntry::nueva(
            "Centros_Vacunacion",
            Operacion::Post,
            json!({ "nombre_centro": "Centro A" }),
        ));
        let segunda = SyncEntry::nueva(
            "Centros_Vacunacion",
            Operacion::Post,
            json!({ "nombre_centro": "Centro B" }),
        );
        cola.enqueue(segunda.clone());
        let servicio = SyncService::new(cola.clone(), SyncStateHandle::new());

        block_on(servicio.drain(|entrada| async move {
            if entrada.data["nombre_centro"] == "Centro B" {
                Err("Network error".to_string())
            } else {
                Ok(())
            }
        }));

        let restantes = cola.peek_all();
        assert_eq!(restantes.len(), 1);
        assert_eq!(restantes[0], segunda);
        assert_eq!(restantes[0].timestamp, segunda.timestamp);
    }

    #[test]
    fn drain_de_cola_vacia_no_invoca_replay() {
        let servicio =
            SyncService::new(SyncQueue::new(MemoryBackend::compartido()), SyncStateHandle::new());
        let invocado = Rc::new(RefCell::new(false));

        let resultado = block_on(servicio.drain(|_| {
            let invocado = invocado.clone();
            async move {
                *invocado.borrow_mut() = true;
                Ok(())
            }
        }));

        assert_eq!(resultado, ResultadoDrenaje::Completado { aplicados: 0 });
        assert!(!*invocado.borrow());
    }
}
