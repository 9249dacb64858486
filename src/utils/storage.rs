// ============================================================================
// BACKEND DE ALMACENAMIENTO DURABLE
// ============================================================================
// El snapshot local y la cola de sync persisten cada uno su propio blob JSON
// bajo una clave fija. El backend se inyecta (Rc<dyn StorageBackend>) para
// poder usar localStorage en el navegador y un backend en memoria en tests.
// ============================================================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Almacenamiento clave → valor, best-effort (no es un WAL).
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove_item(&self, key: &str) -> Result<(), String>;
}

/// Backend en memoria: aislamiento por instancia para tests y fallback
/// cuando el navegador no expone localStorage.
#[derive(Default)]
pub struct MemoryBackend {
    datos: RefCell<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compartido() -> Rc<dyn StorageBackend> {
        Rc::new(Self::new())
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Option<String> {
        self.datos.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.datos.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        self.datos.borrow_mut().remove(key);
        Ok(())
    }
}

/// Backend sobre localStorage del navegador.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageBackend;

#[cfg(target_arch = "wasm32")]
impl LocalStorageBackend {
    pub fn new() -> Self {
        Self
    }

    pub fn compartido() -> Rc<dyn StorageBackend> {
        Rc::new(Self::new())
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorageBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl StorageBackend for LocalStorageBackend {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok()?
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        let storage = self
            .storage()
            .ok_or("No se pudo acceder a localStorage")?;
        storage
            .set_item(key, value)
            .map_err(|_| "Error guardando en localStorage".to_string())
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        let storage = self
            .storage()
            .ok_or("No se pudo acceder a localStorage")?;
        storage
            .remove_item(key)
            .map_err(|_| "Error eliminando de localStorage".to_string())
    }
}

/// Backend por defecto de la plataforma: localStorage en el navegador,
/// memoria en cualquier otro target.
pub fn backend_por_defecto() -> Rc<dyn StorageBackend> {
    #[cfg(target_arch = "wasm32")]
    {
        LocalStorageBackend::compartido()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        MemoryBackend::compartido()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memoria_guarda_y_lee() {
        let backend = MemoryBackend::new();
        assert!(backend.get_item("clave").is_none());

        backend.set_item("clave", "valor").unwrap();
        assert_eq!(backend.get_item("clave").as_deref(), Some("valor"));

        backend.remove_item("clave").unwrap();
        assert!(backend.get_item("clave").is_none());
    }

    #[test]
    fn instancias_aisladas() {
        let a = MemoryBackend::new();
        let b = MemoryBackend::new();
        a.set_item("clave", "a").unwrap();
        assert!(b.get_item("clave").is_none());
    }
}
