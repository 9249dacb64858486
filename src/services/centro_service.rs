// ============================================================================
// SERVICIO DE CENTROS DE VACUNACIÓN
// ============================================================================
// Fachada fina sobre el fold autoritativo del snapshot local, con
// validación previa a cualquier escritura. Toda mutación pasa por
// LocalStore::write, que encola y espeja de forma optimista.
// ============================================================================

use crate::models::{Centro, Operacion};
use crate::services::local_store::LocalStore;
use crate::services::desde_valores;
use crate::utils::constants::COL_CENTROS;
use crate::utils::ids::generar_id;
use serde_json::json;

#[derive(Clone)]
pub struct CentroService {
    store: LocalStore,
}

impl CentroService {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Vista autoritativa de centros (POST y PUT aplicados, eliminados
    /// excluidos).
    pub fn get_centros(&self) -> Vec<Centro> {
        desde_valores(COL_CENTROS, self.store.authoritative(COL_CENTROS))
    }

    pub fn get_centro(&self, id: &str) -> Option<Centro> {
        self.get_centros().into_iter().find(|c| c.id_centro == id)
    }

    /// Alta (sin id) o modificación (con id). La validación ocurre antes
    /// de tocar el snapshot: un centro inválido no deja estado parcial.
    pub fn save_centro(&self, mut centro: Centro) -> Result<Centro, String> {
        if centro.nombre_centro.trim().is_empty() {
            return Err("El nombre del centro es obligatorio".to_string());
        }
        if centro.direccion.trim().is_empty() {
            return Err("La dirección del centro es obligatoria".to_string());
        }

        let operacion = if centro.id_centro.is_empty() {
            centro.id_centro = generar_id("centro");
            Operacion::Post
        } else {
            Operacion::Put
        };

        let valor = serde_json::to_value(&centro)
            .map_err(|e| format!("Error serializando centro: {}", e))?;
        self.store.write(COL_CENTROS, operacion, valor);

        log::info!("💾 Centro guardado ({}): {}", operacion, centro.id_centro);
        Ok(centro)
    }

    /// Borrado suave: agrega el id a la lista de eliminados; el registro
    /// desaparece de las lecturas autoritativas pero queda en GET hasta
    /// que el backend confirme.
    pub fn delete_centro(&self, id: &str) -> Result<(), String> {
        if id.trim().is_empty() {
            return Err("Id de centro vacío".to_string());
        }
        self.store.write(COL_CENTROS, Operacion::Delete, json!(id));
        log::info!("🗑️ Centro marcado como eliminado: {}", id);
        Ok(())
    }

    /// Lectura con backend preferido y snapshot local como respaldo.
    #[cfg(target_arch = "wasm32")]
    pub async fn get_centros_remoto(&self, api: &crate::services::ApiClient) -> Vec<Centro> {
        use crate::services::resolver::prefer_remote;

        let local = self.clone();
        prefer_remote(
            "centros",
            async {
                let valores = api.fetch_coleccion(COL_CENTROS).await?;
                Ok(desde_valores(COL_CENTROS, valores))
            },
            move || local.get_centros(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sync_queue::SyncQueue;
    use crate::utils::storage::MemoryBackend;

    fn servicio() -> CentroService {
        let backend = MemoryBackend::compartido();
        let cola = SyncQueue::new(backend.clone());
        CentroService::new(LocalStore::new(backend, cola))
    }

    fn centro_nuevo(nombre: &str) -> Centro {
        Centro {
            id_centro: String::new(),
            nombre_centro: nombre.to_string(),
            direccion: "Calle 1".to_string(),
            telefono: None,
            director: None,
        }
    }

    #[test]
    fn alta_genera_id_y_aparece_en_la_vista() {
        let servicio = servicio();
        let guardado = servicio.save_centro(centro_nuevo("Centro X")).unwrap();

        assert!(!guardado.id_centro.is_empty());
        assert!(servicio
            .get_centros()
            .iter()
            .any(|c| c.id_centro == guardado.id_centro));
    }

    #[test]
    fn validacion_antes_de_escribir() {
        let servicio = servicio();
        let antes = servicio.get_centros().len();

        let sin_nombre = Centro {
            nombre_centro: "  ".to_string(),
            ..centro_nuevo("X")
        };
        assert!(servicio.save_centro(sin_nombre).is_err());

        let sin_direccion = Centro {
            direccion: String::new(),
            ..centro_nuevo("Centro Y")
        };
        assert!(servicio.save_centro(sin_direccion).is_err());

        // Sin estado parcial: nada se escribió
        assert_eq!(servicio.get_centros().len(), antes);
        assert!(servicio.store.cola().is_empty());
    }

    #[test]
    fn modificacion_actualiza_en_sitio() {
        let servicio = servicio();
        let mut centro = servicio.save_centro(centro_nuevo("Original")).unwrap();
        centro.nombre_centro = "Renombrado".to_string();
        servicio.save_centro(centro.clone()).unwrap();

        let coincidencias: Vec<_> = servicio
            .get_centros()
            .into_iter()
            .filter(|c| c.id_centro == centro.id_centro)
            .collect();
        assert_eq!(coincidencias.len(), 1);
        assert_eq!(coincidencias[0].nombre_centro, "Renombrado");
    }

    #[test]
    fn eliminado_desaparece_de_la_vista_autoritativa() {
        let servicio = servicio();
        // centro_001 viene de la semilla
        servicio.delete_centro("centro_001").unwrap();

        assert!(servicio.get_centro("centro_001").is_none());
        assert!(servicio.get_centro("centro_002").is_some());
    }
}
