use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Bucket de operación dentro de una colección del snapshot local.
/// Se usan los verbos HTTP como espacio de nombres: GET es la vista
/// materializada, POST/PUT son logs de escritura y DELETE una lista de ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operacion {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "DELETE")]
    Delete,
}

impl Operacion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operacion::Get => "GET",
            Operacion::Post => "POST",
            Operacion::Put => "PUT",
            Operacion::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Operacion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intención de escritura pendiente de confirmar contra el backend.
/// Se encola de forma incondicional en cada escritura local (optimista)
/// y solo se elimina de la cabeza tras un replay remoto exitoso.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncEntry {
    /// Colección destino (ej. "Centros_Vacunacion")
    pub endpoint: String,
    pub method: Operacion,
    pub data: Value,
    /// Epoch en milisegundos al momento de encolar
    pub timestamp: i64,
}

impl SyncEntry {
    pub fn nueva(endpoint: &str, method: Operacion, data: Value) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            method,
            data,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Estado de sincronización para la insignia de la UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EstadoSync {
    Sincronizado,
    Pendiente { count: usize },
    Sincronizando,
    SinConexion { pendientes: usize },
    Error { mensaje: String },
}

/// Resultado de drenar la cola contra el backend.
#[derive(Clone, Debug, PartialEq)]
pub enum ResultadoDrenaje {
    /// Toda la cola fue confirmada por el backend
    Completado { aplicados: usize },
    /// El replay falló: la entrada que falló y las posteriores siguen
    /// encoladas en su orden original para el próximo intento
    Detenido {
        aplicados: usize,
        pendientes: usize,
        error: String,
    },
}
