use serde::{Deserialize, Serialize};

/// Vacuna del esquema
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vacuna {
    #[serde(default)]
    pub id_vacuna: String,
    pub nombre_vacuna: String,
    #[serde(default)]
    pub dosis_totales: u32,
}

/// Lote de vacunas asignado a un centro
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lote {
    #[serde(default)]
    pub id_lote: String,
    pub id_vacuna: String,
    pub id_centro: String,
    pub cantidad: u32,
    pub dosis_disponibles: u32,
    #[serde(default)]
    pub fecha_vencimiento: Option<String>,
}

/// Dosis aplicada a un niño. La integridad referencial
/// (dosis → lote → vacuna) se mantiene por convención, no se valida.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dosis {
    #[serde(default)]
    pub id_dosis: String,
    #[serde(rename = "id_niño")]
    pub id_nino: String,
    pub id_vacuna: String,
    #[serde(default)]
    pub id_lote: Option<String>,
    pub numero_dosis: u32,
    /// Formato YYYY-MM-DD
    pub fecha_aplicacion: String,
    #[serde(default)]
    pub id_centro: Option<String>,
    #[serde(default)]
    pub id_doctor: Option<String>,
}

/// Dosis del esquema que un niño aún no tiene aplicada
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DosisFaltante {
    pub id_vacuna: String,
    pub nombre_vacuna: String,
    pub numero_dosis: u32,
    pub edad_meses: u32,
    /// Fecha en que corresponde según la fecha de nacimiento (YYYY-MM-DD)
    pub fecha_programada: String,
}
