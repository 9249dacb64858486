// ============================================================================
// SERVICIO DE CITAS DE VACUNACIÓN
// ============================================================================

use crate::models::{estado_valido, Cita, Operacion, ESTADOS_CITA};
use crate::services::desde_valores;
use crate::services::local_store::LocalStore;
use crate::utils::constants::COL_CITAS;
use crate::utils::ids::generar_id;
use serde_json::json;

#[derive(Clone)]
pub struct CitaService {
    store: LocalStore,
}

impl CitaService {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn get_citas(&self) -> Vec<Cita> {
        desde_valores(COL_CITAS, self.store.authoritative(COL_CITAS))
    }

    /// Citas que le corresponden a un doctor: las asignadas a él, más las
    /// sin doctor asignado dentro de sus centros.
    pub fn get_citas_por_doctor(&self, doctor_id: &str, centros: &[String]) -> Vec<Cita> {
        self.get_citas()
            .into_iter()
            .filter(|cita| match &cita.id_doctor {
                Some(id) => id == doctor_id,
                None => centros.contains(&cita.id_centro),
            })
            .collect()
    }

    pub fn get_citas_por_nino(&self, id_nino: &str) -> Vec<Cita> {
        self.get_citas()
            .into_iter()
            .filter(|cita| cita.id_nino == id_nino)
            .collect()
    }

    pub fn create_cita(&self, mut cita: Cita) -> Result<Cita, String> {
        if cita.id_nino.trim().is_empty() {
            return Err("La cita debe indicar el niño".to_string());
        }
        if cita.id_centro.trim().is_empty() {
            return Err("La cita debe indicar el centro".to_string());
        }
        if cita.fecha.trim().is_empty() {
            return Err("La cita debe indicar la fecha".to_string());
        }
        if cita.estado.is_empty() {
            cita.estado = "pendiente".to_string();
        }
        if !estado_valido(&cita.estado) {
            return Err(format!(
                "Estado de cita inválido: {} (válidos: {})",
                cita.estado,
                ESTADOS_CITA.join(", ")
            ));
        }

        cita.id_cita = generar_id("cita");
        let valor = serde_json::to_value(&cita)
            .map_err(|e| format!("Error serializando cita: {}", e))?;
        self.store.write(COL_CITAS, Operacion::Post, valor);

        log::info!("📅 Cita creada: {} ({})", cita.id_cita, cita.fecha);
        Ok(cita)
    }

    pub fn update_cita(&self, cita: Cita) -> Result<Cita, String> {
        if cita.id_cita.trim().is_empty() {
            return Err("La cita a modificar no tiene id".to_string());
        }
        if !estado_valido(&cita.estado) {
            return Err(format!("Estado de cita inválido: {}", cita.estado));
        }

        let valor = serde_json::to_value(&cita)
            .map_err(|e| format!("Error serializando cita: {}", e))?;
        self.store.write(COL_CITAS, Operacion::Put, valor);
        Ok(cita)
    }

    /// Cambio de estado puntual: PUT parcial que solo lleva id y estado;
    /// el merge superficial del snapshot conserva el resto de los campos.
    pub fn cambiar_estado_cita(&self, id_cita: &str, estado: &str) -> Result<(), String> {
        if !estado_valido(estado) {
            return Err(format!(
                "Estado de cita inválido: {} (válidos: {})",
                estado,
                ESTADOS_CITA.join(", ")
            ));
        }

        self.store.write(
            COL_CITAS,
            Operacion::Put,
            json!({ "id_cita": id_cita, "estado": estado }),
        );
        log::info!("📅 Cita {} → {}", id_cita, estado);
        Ok(())
    }

    pub fn delete_cita(&self, id_cita: &str) -> Result<(), String> {
        if id_cita.trim().is_empty() {
            return Err("Id de cita vacío".to_string());
        }
        self.store.write(COL_CITAS, Operacion::Delete, json!(id_cita));
        Ok(())
    }

    /// Lectura con backend preferido y snapshot local como respaldo.
    #[cfg(target_arch = "wasm32")]
    pub async fn get_citas_remoto(&self, api: &crate::services::ApiClient) -> Vec<Cita> {
        use crate::services::resolver::prefer_remote;

        let local = self.clone();
        prefer_remote(
            "citas",
            async {
                let valores = api.fetch_coleccion(COL_CITAS).await?;
                Ok(desde_valores(COL_CITAS, valores))
            },
            move || local.get_citas(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sync_queue::SyncQueue;
    use crate::utils::storage::MemoryBackend;

    fn servicio() -> CitaService {
        let backend = MemoryBackend::compartido();
        let cola = SyncQueue::new(backend.clone());
        CitaService::new(LocalStore::new(backend, cola))
    }

    fn cita_base(centro: &str, doctor: Option<&str>) -> Cita {
        Cita {
            id_cita: String::new(),
            id_nino: "nino_001".to_string(),
            id_centro: centro.to_string(),
            id_doctor: doctor.map(|d| d.to_string()),
            fecha: "2026-09-15".to_string(),
            hora: Some("09:00".to_string()),
            estado: String::new(),
            motivo: None,
        }
    }

    #[test]
    fn crear_cita_asigna_id_y_estado_pendiente() {
        let servicio = servicio();
        let cita = servicio.create_cita(cita_base("centro_001", None)).unwrap();

        assert!(!cita.id_cita.is_empty());
        assert_eq!(cita.estado, "pendiente");
        assert_eq!(servicio.get_citas().len(), 1);
    }

    #[test]
    fn filtro_por_doctor_y_centros() {
        let servicio = servicio();
        servicio.create_cita(cita_base("centro_001", Some("doc_1"))).unwrap();
        servicio.create_cita(cita_base("centro_001", Some("doc_2"))).unwrap();
        servicio.create_cita(cita_base("centro_001", None)).unwrap();
        servicio.create_cita(cita_base("centro_099", None)).unwrap();

        let centros = vec!["centro_001".to_string()];
        let del_doctor = servicio.get_citas_por_doctor("doc_1", &centros);

        // La suya + la sin asignar de su centro; ni la de doc_2 ni la de
        // otro centro
        assert_eq!(del_doctor.len(), 2);
        assert!(del_doctor
            .iter()
            .all(|c| c.id_doctor.as_deref() == Some("doc_1") || c.id_doctor.is_none()));
    }

    #[test]
    fn cambiar_estado_conserva_el_resto_de_la_cita() {
        let servicio = servicio();
        let cita = servicio.create_cita(cita_base("centro_001", None)).unwrap();

        servicio.cambiar_estado_cita(&cita.id_cita, "confirmada").unwrap();

        let actual = servicio
            .get_citas()
            .into_iter()
            .find(|c| c.id_cita == cita.id_cita)
            .unwrap();
        assert_eq!(actual.estado, "confirmada");
        assert_eq!(actual.fecha, "2026-09-15");
        assert_eq!(actual.hora.as_deref(), Some("09:00"));
    }

    #[test]
    fn estado_invalido_se_rechaza_sin_escribir() {
        let servicio = servicio();
        let cita = servicio.create_cita(cita_base("centro_001", None)).unwrap();
        let encoladas = servicio.store.cola().len();

        assert!(servicio.cambiar_estado_cita(&cita.id_cita, "perdida").is_err());
        assert_eq!(servicio.store.cola().len(), encoladas);
    }

    #[test]
    fn sin_backend_las_citas_salen_del_snapshot() {
        use crate::services::resolver::prefer_remote;
        use futures::executor::block_on;

        let servicio = servicio();
        let cita = servicio.create_cita(cita_base("centro_001", None)).unwrap();

        let local = servicio.clone();
        let citas = block_on(prefer_remote(
            "citas",
            async { Err("Network error".to_string()) },
            move || local.get_citas(),
        ));
        assert!(citas.iter().any(|c| c.id_cita == cita.id_cita));
    }

    #[test]
    fn cita_sin_nino_se_rechaza() {
        let servicio = servicio();
        let mut cita = cita_base("centro_001", None);
        cita.id_nino = String::new();
        assert!(servicio.create_cita(cita).is_err());
    }
}
