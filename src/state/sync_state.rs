// ============================================================================
// ESTADO DE SINCRONIZACIÓN PARA LA UI
// ============================================================================

use crate::models::EstadoSync;
use std::cell::RefCell;
use std::rc::Rc;

/// Estado compartido de la insignia de sincronización. Los clones
/// comparten el mismo estado via Rc.
#[derive(Clone)]
pub struct SyncStateHandle {
    estado: Rc<RefCell<EstadoSync>>,
    is_online: Rc<RefCell<bool>>,
}

impl SyncStateHandle {
    pub fn new() -> Self {
        Self {
            estado: Rc::new(RefCell::new(EstadoSync::Sincronizado)),
            is_online: Rc::new(RefCell::new(true)),
        }
    }

    pub fn get_estado(&self) -> EstadoSync {
        self.estado.borrow().clone()
    }

    pub fn set_estado(&self, estado: EstadoSync) {
        *self.estado.borrow_mut() = estado;
    }

    pub fn get_online(&self) -> bool {
        *self.is_online.borrow()
    }

    pub fn set_online(&self, online: bool) {
        *self.is_online.borrow_mut() = online;
    }

    /// Recalcula la insignia a partir del tamaño de la cola.
    pub fn actualizar_pendientes(&self, pendientes: usize) {
        let estado = if pendientes == 0 {
            EstadoSync::Sincronizado
        } else if self.get_online() {
            EstadoSync::Pendiente { count: pendientes }
        } else {
            EstadoSync::SinConexion { pendientes }
        };
        self.set_estado(estado);
    }
}

impl Default for SyncStateHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_comparten_estado() {
        let estado = SyncStateHandle::new();
        let copia = estado.clone();
        estado.set_estado(EstadoSync::Sincronizando);
        assert_eq!(copia.get_estado(), EstadoSync::Sincronizando);
    }

    #[test]
    fn insignia_segun_pendientes_y_conexion() {
        let estado = SyncStateHandle::new();

        estado.actualizar_pendientes(0);
        assert_eq!(estado.get_estado(), EstadoSync::Sincronizado);

        estado.actualizar_pendientes(3);
        assert_eq!(estado.get_estado(), EstadoSync::Pendiente { count: 3 });

        estado.set_online(false);
        estado.actualizar_pendientes(3);
        assert_eq!(estado.get_estado(), EstadoSync::SinConexion { pendientes: 3 });
    }
}
