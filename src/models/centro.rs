use serde::{Deserialize, Serialize};

/// Centro de vacunación
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Centro {
    #[serde(default)]
    pub id_centro: String,
    pub nombre_centro: String,
    pub direccion: String,
    #[serde(default)]
    pub telefono: Option<String>,
    /// id_usuario del director asignado al centro
    #[serde(default)]
    pub director: Option<String>,
}
