use serde::{Deserialize, Serialize};

/// Paciente pediátrico
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Nino {
    #[serde(rename = "id_niño", default)]
    pub id_nino: String,
    pub nombre: String,
    /// Formato YYYY-MM-DD
    pub fecha_nacimiento: String,
    #[serde(default)]
    pub id_tutor: Option<String>,
    #[serde(default)]
    pub genero: Option<String>,
}

/// Tutor / representante del niño
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tutor {
    #[serde(default)]
    pub id_tutor: String,
    pub nombre: String,
    #[serde(default)]
    pub cedula: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub parentesco: Option<String>,
}
