use serde::{Deserialize, Serialize};

/// Estados válidos de una cita (máquina de estados simple)
pub const ESTADOS_CITA: &[&str] = &["pendiente", "confirmada", "atendida", "cancelada"];

/// Cita de vacunación
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cita {
    #[serde(default)]
    pub id_cita: String,
    #[serde(rename = "id_niño")]
    pub id_nino: String,
    pub id_centro: String,
    #[serde(default)]
    pub id_doctor: Option<String>,
    /// Formato YYYY-MM-DD
    pub fecha: String,
    #[serde(default)]
    pub hora: Option<String>,
    #[serde(default = "estado_por_defecto")]
    pub estado: String,
    #[serde(default)]
    pub motivo: Option<String>,
}

fn estado_por_defecto() -> String {
    "pendiente".to_string()
}

pub fn estado_valido(estado: &str) -> bool {
    ESTADOS_CITA.contains(&estado)
}
