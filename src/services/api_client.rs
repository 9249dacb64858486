// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// Sin lógica de negocio: lecturas de colecciones y replay de entradas de
// la cola. Cualquier no-2xx o error de red devuelve Err, que es lo que
// detiene el drain (política de parada en primer fallo).
// ============================================================================

use crate::models::{Operacion, SyncEntry};
use crate::utils::constants::{clave_primaria, BACKEND_URL};
use gloo_net::http::Request;
use serde_json::Value;

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: BACKEND_URL.to_string(),
        }
    }

    /// Lee una colección completa del backend.
    pub async fn fetch_coleccion(&self, coleccion: &str) -> Result<Vec<Value>, String> {
        let url = format!("{}/api/{}", self.base_url, coleccion);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    /// Reproduce una entrada de la cola contra el backend real.
    pub async fn replay(&self, entrada: &SyncEntry) -> Result<(), String> {
        let coleccion = entrada.endpoint.as_str();
        let response = match entrada.method {
            // Un GET encolado no tiene nada que enviar: se confirma local
            Operacion::Get => return Ok(()),
            Operacion::Post => {
                let url = format!("{}/api/{}", self.base_url, coleccion);
                Request::post(&url)
                    .json(&entrada.data)
                    .map_err(|e| format!("Serialization error: {}", e))?
                    .send()
                    .await
            }
            Operacion::Put => {
                let url = match id_del_registro(coleccion, &entrada.data) {
                    Some(id) => format!("{}/api/{}/{}", self.base_url, coleccion, id),
                    None => format!("{}/api/{}", self.base_url, coleccion),
                };
                Request::put(&url)
                    .json(&entrada.data)
                    .map_err(|e| format!("Serialization error: {}", e))?
                    .send()
                    .await
            }
            Operacion::Delete => {
                let id = id_del_registro(coleccion, &entrada.data)
                    .ok_or_else(|| format!("DELETE sin id en {}", coleccion))?;
                let url = format!("{}/api/{}/{}", self.base_url, coleccion, id);
                Request::delete(&url).send().await
            }
        };

        let response = response.map_err(|e| format!("Network error: {}", e))?;
        if !response.ok() {
            return Err(format!("HTTP {}: {}", response.status(), response.status_text()));
        }

        log::info!("📤 Confirmado {} {} en backend", entrada.method, coleccion);
        Ok(())
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Id para la URL: la clave cruda del payload, o el campo clave primaria
/// si el payload es un objeto.
fn id_del_registro(coleccion: &str, dato: &Value) -> Option<String> {
    let valor = match dato {
        Value::String(s) => return Some(s.clone()),
        Value::Number(n) => return Some(n.to_string()),
        Value::Object(obj) => clave_primaria(coleccion)
            .and_then(|campo| obj.get(campo))
            .or_else(|| obj.get("id"))?,
        _ => return None,
    };
    match valor {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
