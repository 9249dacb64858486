// ============================================================================
// SESIÓN DE USUARIO PERSISTIDA
// ============================================================================
// Objeto usuario-actual simple con rol normalizado, guardado bajo su
// propia clave. Fuente de datos para las vistas condicionadas por rol;
// el núcleo de sincronización NO depende de esto.
// ============================================================================

use crate::models::{Rol, Usuario};
use crate::utils::constants::STORAGE_KEY_USUARIO;
use crate::utils::storage::StorageBackend;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone)]
pub struct AuthState {
    backend: Rc<dyn StorageBackend>,
    usuario: Rc<RefCell<Option<Usuario>>>,
}

impl AuthState {
    pub fn new(backend: Rc<dyn StorageBackend>) -> Self {
        let usuario = backend
            .get_item(STORAGE_KEY_USUARIO)
            .and_then(|json| match serde_json::from_str::<Usuario>(&json) {
                Ok(usuario) => Some(usuario),
                Err(e) => {
                    log::warn!("⚠️ Usuario persistido inválido, se descarta: {}", e);
                    None
                }
            });

        Self {
            backend,
            usuario: Rc::new(RefCell::new(usuario)),
        }
    }

    pub fn usuario_actual(&self) -> Option<Usuario> {
        self.usuario.borrow().clone()
    }

    pub fn rol_actual(&self) -> Option<Rol> {
        self.usuario.borrow().as_ref().map(|u| u.rol)
    }

    /// Persiste el usuario que inició sesión. La persistencia es
    /// best-effort: si falla, la sesión vive solo en memoria.
    pub fn iniciar_sesion(&self, usuario: Usuario) {
        match serde_json::to_string(&usuario) {
            Ok(json) => {
                if let Err(e) = self.backend.set_item(STORAGE_KEY_USUARIO, &json) {
                    log::error!("❌ Error persistiendo sesión: {}", e);
                }
            }
            Err(e) => log::error!("❌ Error serializando usuario: {}", e),
        }
        log::info!("🔐 Sesión iniciada: {} ({})", usuario.nombre, usuario.rol.as_str());
        *self.usuario.borrow_mut() = Some(usuario);
    }

    /// Acepta la respuesta cruda del backend de login (rol como texto
    /// libre) y la normaliza antes de persistir.
    pub fn iniciar_sesion_desde(&self, valor: &Value) -> Result<Usuario, String> {
        let nombre = valor
            .get("nombre")
            .and_then(|v| v.as_str())
            .ok_or("Respuesta de login sin nombre de usuario")?;
        let rol_texto = valor.get("rol").and_then(|v| v.as_str()).unwrap_or("");

        let usuario = Usuario {
            id_usuario: valor
                .get("id_usuario")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
            nombre: nombre.to_string(),
            correo: valor
                .get("correo")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            rol: Rol::normalizar(rol_texto),
            centros: valor
                .get("centros")
                .and_then(|v| v.as_array())
                .map(|arr| {
                    arr.iter()
                        .filter_map(|c| c.as_str().map(|s| s.to_string()))
                        .collect()
                })
                .unwrap_or_default(),
        };

        self.iniciar_sesion(usuario.clone());
        Ok(usuario)
    }

    pub fn cerrar_sesion(&self) {
        if let Err(e) = self.backend.remove_item(STORAGE_KEY_USUARIO) {
            log::error!("❌ Error limpiando sesión: {}", e);
        }
        *self.usuario.borrow_mut() = None;
        log::info!("👋 Sesión cerrada");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::MemoryBackend;
    use serde_json::json;

    #[test]
    fn sesion_sobrevive_reinicio() {
        let backend = MemoryBackend::compartido();
        {
            let auth = AuthState::new(backend.clone());
            auth.iniciar_sesion_desde(&json!({
                "id_usuario": "u1",
                "nombre": "Dra. Pérez",
                "rol": "MÉDICO",
                "centros": ["centro_001"]
            }))
            .unwrap();
        }

        let auth = AuthState::new(backend);
        let usuario = auth.usuario_actual().unwrap();
        assert_eq!(usuario.nombre, "Dra. Pérez");
        assert_eq!(usuario.rol, Rol::Doctor);
        assert_eq!(usuario.centros, vec!["centro_001"]);
    }

    #[test]
    fn rol_desconocido_normaliza_a_padre() {
        let auth = AuthState::new(MemoryBackend::compartido());
        let usuario = auth
            .iniciar_sesion_desde(&json!({ "nombre": "Alguien", "rol": "invitado" }))
            .unwrap();
        assert_eq!(usuario.rol, Rol::Padre);
    }

    #[test]
    fn cerrar_sesion_limpia_memoria_y_storage() {
        let backend = MemoryBackend::compartido();
        let auth = AuthState::new(backend.clone());
        auth.iniciar_sesion_desde(&json!({ "nombre": "X", "rol": "admin" }))
            .unwrap();

        auth.cerrar_sesion();
        assert!(auth.usuario_actual().is_none());
        assert!(backend.get_item(STORAGE_KEY_USUARIO).is_none());
    }

    #[test]
    fn login_sin_nombre_es_error() {
        let auth = AuthState::new(MemoryBackend::compartido());
        assert!(auth.iniciar_sesion_desde(&json!({ "rol": "admin" })).is_err());
    }
}
