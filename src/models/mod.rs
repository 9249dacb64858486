pub mod centro;
pub mod cita;
pub mod nino;
pub mod sync;
pub mod usuario;
pub mod vacuna;

pub use centro::Centro;
pub use cita::{estado_valido, Cita, ESTADOS_CITA};
pub use nino::{Nino, Tutor};
pub use sync::{EstadoSync, Operacion, ResultadoDrenaje, SyncEntry};
pub use usuario::{Rol, Usuario};
pub use vacuna::{Dosis, DosisFaltante, Lote, Vacuna};
