// ============================================================================
// SERVICIO DE VACUNAS, LOTES Y DOSIS APLICADAS
// ============================================================================
// La integridad dosis → lote → vacuna se mantiene por convención (igual
// que en el resto del sistema): registrar una dosis descuenta el lote con
// un PUT aparte, encolado después del POST de la dosis, de modo que el
// replay llega al backend en ese mismo orden.
// ============================================================================

use crate::models::{Dosis, Lote, Operacion, Vacuna};
use crate::services::desde_valores;
use crate::services::local_store::LocalStore;
use crate::utils::constants::{COL_DOSIS, COL_LOTES, COL_VACUNAS};
use crate::utils::ids::generar_id;
use serde_json::json;

#[derive(Clone)]
pub struct VacunaService {
    store: LocalStore,
}

impl VacunaService {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn get_vacunas(&self) -> Vec<Vacuna> {
        desde_valores(COL_VACUNAS, self.store.authoritative(COL_VACUNAS))
    }

    pub fn get_lotes(&self) -> Vec<Lote> {
        desde_valores(COL_LOTES, self.store.authoritative(COL_LOTES))
    }

    pub fn get_lotes_por_centro(&self, id_centro: &str) -> Vec<Lote> {
        self.get_lotes()
            .into_iter()
            .filter(|lote| lote.id_centro == id_centro)
            .collect()
    }

    pub fn get_lotes_por_vacuna(&self, id_vacuna: &str) -> Vec<Lote> {
        self.get_lotes()
            .into_iter()
            .filter(|lote| lote.id_vacuna == id_vacuna)
            .collect()
    }

    /// Alta o modificación de lote. Un lote nuevo arranca con todas sus
    /// dosis disponibles.
    pub fn save_lote(&self, mut lote: Lote) -> Result<Lote, String> {
        if lote.id_vacuna.trim().is_empty() {
            return Err("El lote debe indicar la vacuna".to_string());
        }
        if lote.id_centro.trim().is_empty() {
            return Err("El lote debe indicar el centro".to_string());
        }
        if lote.cantidad == 0 {
            return Err("El lote debe tener al menos una dosis".to_string());
        }

        let operacion = if lote.id_lote.is_empty() {
            lote.id_lote = generar_id("lote");
            lote.dosis_disponibles = lote.cantidad;
            Operacion::Post
        } else {
            Operacion::Put
        };

        let valor = serde_json::to_value(&lote)
            .map_err(|e| format!("Error serializando lote: {}", e))?;
        self.store.write(COL_LOTES, operacion, valor);

        log::info!("💉 Lote guardado ({}): {}", operacion, lote.id_lote);
        Ok(lote)
    }

    pub fn delete_lote(&self, id_lote: &str) -> Result<(), String> {
        if id_lote.trim().is_empty() {
            return Err("Id de lote vacío".to_string());
        }
        self.store.write(COL_LOTES, Operacion::Delete, json!(id_lote));
        Ok(())
    }

    /// Registra una dosis aplicada y descuenta el lote si viene indicado.
    /// Dos escrituras, dos entradas de cola, en ese orden.
    pub fn registrar_dosis(&self, mut dosis: Dosis) -> Result<Dosis, String> {
        if dosis.id_nino.trim().is_empty() {
            return Err("La dosis debe indicar el niño".to_string());
        }
        if dosis.id_vacuna.trim().is_empty() {
            return Err("La dosis debe indicar la vacuna".to_string());
        }
        if dosis.fecha_aplicacion.trim().is_empty() {
            return Err("La dosis debe indicar la fecha de aplicación".to_string());
        }

        dosis.id_dosis = generar_id("dosis");
        let valor = serde_json::to_value(&dosis)
            .map_err(|e| format!("Error serializando dosis: {}", e))?;
        self.store.write(COL_DOSIS, Operacion::Post, valor);

        if let Some(id_lote) = &dosis.id_lote {
            match self.get_lotes().into_iter().find(|l| &l.id_lote == id_lote) {
                Some(lote) => {
                    let disponibles = lote.dosis_disponibles.saturating_sub(1);
                    self.store.write(
                        COL_LOTES,
                        Operacion::Put,
                        json!({ "id_lote": id_lote, "dosis_disponibles": disponibles }),
                    );
                }
                None => {
                    log::warn!("⚠️ Dosis registrada contra lote desconocido: {}", id_lote);
                }
            }
        }

        log::info!(
            "💉 Dosis {} de {} registrada para {}",
            dosis.numero_dosis,
            dosis.id_vacuna,
            dosis.id_nino
        );
        Ok(dosis)
    }

    pub fn dosis_por_nino(&self, id_nino: &str) -> Vec<Dosis> {
        desde_valores::<Dosis>(COL_DOSIS, self.store.authoritative(COL_DOSIS))
            .into_iter()
            .filter(|dosis| dosis.id_nino == id_nino)
            .collect()
    }

    /// Lectura con backend preferido y snapshot local como respaldo.
    #[cfg(target_arch = "wasm32")]
    pub async fn get_vacunas_remoto(&self, api: &crate::services::ApiClient) -> Vec<Vacuna> {
        use crate::services::resolver::prefer_remote;

        let local = self.clone();
        prefer_remote(
            "vacunas",
            async {
                let valores = api.fetch_coleccion(COL_VACUNAS).await?;
                Ok(desde_valores(COL_VACUNAS, valores))
            },
            move || local.get_vacunas(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sync_queue::SyncQueue;
    use crate::utils::storage::MemoryBackend;

    fn servicio() -> VacunaService {
        let backend = MemoryBackend::compartido();
        let cola = SyncQueue::new(backend.clone());
        VacunaService::new(LocalStore::new(backend, cola))
    }

    fn dosis_base(id_lote: Option<&str>) -> Dosis {
        Dosis {
            id_dosis: String::new(),
            id_nino: "nino_001".to_string(),
            id_vacuna: "vac_bcg".to_string(),
            id_lote: id_lote.map(|l| l.to_string()),
            numero_dosis: 1,
            fecha_aplicacion: "2026-08-01".to_string(),
            id_centro: Some("centro_001".to_string()),
            id_doctor: None,
        }
    }

    #[test]
    fn la_semilla_trae_el_esquema_basico() {
        let servicio = servicio();
        let vacunas = servicio.get_vacunas();
        assert!(vacunas.iter().any(|v| v.id_vacuna == "vac_bcg"));
        assert!(vacunas.iter().any(|v| v.id_vacuna == "vac_srp"));
    }

    #[test]
    fn lote_nuevo_arranca_con_todo_disponible() {
        let servicio = servicio();
        let lote = servicio
            .save_lote(Lote {
                id_lote: String::new(),
                id_vacuna: "vac_srp".to_string(),
                id_centro: "centro_002".to_string(),
                cantidad: 40,
                dosis_disponibles: 0,
                fecha_vencimiento: None,
            })
            .unwrap();

        assert_eq!(lote.dosis_disponibles, 40);
        assert!(servicio
            .get_lotes_por_centro("centro_002")
            .iter()
            .any(|l| l.id_lote == lote.id_lote));
        assert!(servicio
            .get_lotes_por_vacuna("vac_srp")
            .iter()
            .any(|l| l.id_lote == lote.id_lote));
    }

    #[test]
    fn lote_sin_vacuna_o_vacio_se_rechaza() {
        let servicio = servicio();
        let invalido = Lote {
            id_lote: String::new(),
            id_vacuna: String::new(),
            id_centro: "centro_001".to_string(),
            cantidad: 10,
            dosis_disponibles: 0,
            fecha_vencimiento: None,
        };
        assert!(servicio.save_lote(invalido.clone()).is_err());

        let vacio = Lote {
            id_vacuna: "vac_bcg".to_string(),
            cantidad: 0,
            ..invalido
        };
        assert!(servicio.save_lote(vacio).is_err());
    }

    #[test]
    fn registrar_dosis_descuenta_el_lote_en_orden() {
        let servicio = servicio();
        // lote_001 (semilla): 100 disponibles
        let dosis = servicio.registrar_dosis(dosis_base(Some("lote_001"))).unwrap();

        let lote = servicio
            .get_lotes()
            .into_iter()
            .find(|l| l.id_lote == "lote_001")
            .unwrap();
        assert_eq!(lote.dosis_disponibles, 99);

        assert_eq!(servicio.dosis_por_nino("nino_001").len(), 1);

        // Dos entradas de cola en orden: POST de la dosis, PUT del lote
        let cola = servicio.store.cola().peek_all();
        assert_eq!(cola.len(), 2);
        assert_eq!(cola[0].method, Operacion::Post);
        assert_eq!(cola[0].endpoint, COL_DOSIS);
        assert_eq!(cola[0].data["id_dosis"], dosis.id_dosis.as_str());
        assert_eq!(cola[1].method, Operacion::Put);
        assert_eq!(cola[1].endpoint, COL_LOTES);
    }

    #[test]
    fn sin_backend_las_vacunas_salen_del_snapshot() {
        use crate::services::resolver::prefer_remote;
        use futures::executor::block_on;

        let servicio = servicio();
        let local = servicio.clone();
        let vacunas = block_on(prefer_remote(
            "vacunas",
            async { Err("Network error".to_string()) },
            move || local.get_vacunas(),
        ));
        assert!(vacunas.iter().any(|v| v.id_vacuna == "vac_bcg"));
    }

    #[test]
    fn dosis_sin_lote_no_toca_inventario() {
        let servicio = servicio();
        servicio.registrar_dosis(dosis_base(None)).unwrap();

        let lote = servicio
            .get_lotes()
            .into_iter()
            .find(|l| l.id_lote == "lote_001")
            .unwrap();
        assert_eq!(lote.dosis_disponibles, 100);
        assert_eq!(servicio.store.cola().len(), 1);
    }
}
