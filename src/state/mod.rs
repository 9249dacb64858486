// ============================================================================
// STATE MODULE - Estado compartido con Rc<RefCell>
// ============================================================================

pub mod auth_state;
pub mod sync_state;

pub use auth_state::AuthState;
pub use sync_state::SyncStateHandle;
