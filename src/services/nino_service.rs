// ============================================================================
// SERVICIO DE PACIENTES (NIÑOS) Y SUS DERIVADOS
// ============================================================================
// Además del CRUD, calcula las vistas derivadas del esquema de
// vacunación: dosis faltantes y recordatorios de próximas dosis. Son
// funciones puras sobre colecciones ya cargadas, sin estado adicional.
// ============================================================================

use crate::models::{Dosis, DosisFaltante, Nino, Operacion, Tutor};
use crate::services::desde_valores;
use crate::services::local_store::LocalStore;
use crate::utils::constants::{COL_DOSIS, COL_NINOS, COL_TUTORES, ESQUEMA_VACUNACION};
use crate::utils::ids::generar_id;
use chrono::{Months, NaiveDate};
use serde_json::json;

#[derive(Clone)]
pub struct NinoService {
    store: LocalStore,
}

impl NinoService {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn get_ninos(&self) -> Vec<Nino> {
        desde_valores(COL_NINOS, self.store.authoritative(COL_NINOS))
    }

    pub fn get_nino(&self, id: &str) -> Option<Nino> {
        self.get_ninos().into_iter().find(|n| n.id_nino == id)
    }

    pub fn get_ninos_por_tutor(&self, id_tutor: &str) -> Vec<Nino> {
        self.get_ninos()
            .into_iter()
            .filter(|n| n.id_tutor.as_deref() == Some(id_tutor))
            .collect()
    }

    pub fn save_nino(&self, mut nino: Nino) -> Result<Nino, String> {
        if nino.nombre.trim().is_empty() {
            return Err("El nombre del niño es obligatorio".to_string());
        }
        if parsear_fecha(&nino.fecha_nacimiento).is_none() {
            return Err("Fecha de nacimiento inválida (se espera YYYY-MM-DD)".to_string());
        }

        let operacion = if nino.id_nino.is_empty() {
            nino.id_nino = generar_id("nino");
            Operacion::Post
        } else {
            Operacion::Put
        };

        let valor = serde_json::to_value(&nino)
            .map_err(|e| format!("Error serializando niño: {}", e))?;
        self.store.write(COL_NINOS, operacion, valor);
        Ok(nino)
    }

    pub fn delete_nino(&self, id: &str) -> Result<(), String> {
        if id.trim().is_empty() {
            return Err("Id de niño vacío".to_string());
        }
        self.store.write(COL_NINOS, Operacion::Delete, json!(id));
        Ok(())
    }

    pub fn get_tutores(&self) -> Vec<Tutor> {
        desde_valores(COL_TUTORES, self.store.authoritative(COL_TUTORES))
    }

    pub fn save_tutor(&self, mut tutor: Tutor) -> Result<Tutor, String> {
        if tutor.nombre.trim().is_empty() {
            return Err("El nombre del tutor es obligatorio".to_string());
        }

        let operacion = if tutor.id_tutor.is_empty() {
            tutor.id_tutor = generar_id("tutor");
            Operacion::Post
        } else {
            Operacion::Put
        };

        let valor = serde_json::to_value(&tutor)
            .map_err(|e| format!("Error serializando tutor: {}", e))?;
        self.store.write(COL_TUTORES, operacion, valor);
        Ok(tutor)
    }

    /// Dosis del esquema que el niño aún no tiene en su historial:
    /// esquema configurado menos dosis aplicadas (por vacuna + número).
    pub fn vacunas_faltantes(&self, id_nino: &str) -> Result<Vec<DosisFaltante>, String> {
        let nino = self
            .get_nino(id_nino)
            .ok_or_else(|| format!("Niño no encontrado: {}", id_nino))?;
        let nacimiento = parsear_fecha(&nino.fecha_nacimiento)
            .ok_or_else(|| format!("Fecha de nacimiento inválida: {}", nino.fecha_nacimiento))?;

        let aplicadas: Vec<Dosis> =
            desde_valores::<Dosis>(COL_DOSIS, self.store.authoritative(COL_DOSIS))
                .into_iter()
                .filter(|d| d.id_nino == id_nino)
                .collect();

        let faltantes = ESQUEMA_VACUNACION
            .iter()
            .filter(|fila| {
                !aplicadas.iter().any(|d| {
                    d.id_vacuna == fila.id_vacuna && d.numero_dosis == fila.numero_dosis
                })
            })
            .map(|fila| DosisFaltante {
                id_vacuna: fila.id_vacuna.to_string(),
                nombre_vacuna: fila.nombre_vacuna.to_string(),
                numero_dosis: fila.numero_dosis,
                edad_meses: fila.edad_meses,
                fecha_programada: fecha_programada(nacimiento, fila.edad_meses),
            })
            .collect();

        Ok(faltantes)
    }

    /// Recordatorios: faltantes cuya fecha programada cae en o después de
    /// `desde` (la fecha de hoy, inyectada para poder testear).
    pub fn proximas_dosis(
        &self,
        id_nino: &str,
        desde: NaiveDate,
    ) -> Result<Vec<DosisFaltante>, String> {
        let mut proximas: Vec<DosisFaltante> = self
            .vacunas_faltantes(id_nino)?
            .into_iter()
            .filter(|f| parsear_fecha(&f.fecha_programada).map_or(false, |fecha| fecha >= desde))
            .collect();
        proximas.sort_by(|a, b| a.fecha_programada.cmp(&b.fecha_programada));
        Ok(proximas)
    }

    /// Lectura con backend preferido y snapshot local como respaldo.
    #[cfg(target_arch = "wasm32")]
    pub async fn get_ninos_remoto(&self, api: &crate::services::ApiClient) -> Vec<Nino> {
        use crate::services::resolver::prefer_remote;

        let local = self.clone();
        prefer_remote(
            "niños",
            async {
                let valores = api.fetch_coleccion(COL_NINOS).await?;
                Ok(desde_valores(COL_NINOS, valores))
            },
            move || local.get_ninos(),
        )
        .await
    }
}

fn parsear_fecha(texto: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(texto.trim(), "%Y-%m-%d").ok()
}

/// Fecha en que corresponde una dosis: nacimiento + edad en meses.
fn fecha_programada(nacimiento: NaiveDate, edad_meses: u32) -> String {
    nacimiento
        .checked_add_months(Months::new(edad_meses))
        .unwrap_or(nacimiento)
        .format("%Y-%m-%d")
        .to_string()
}
