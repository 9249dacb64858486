// ============================================================================
// RESOLVER DE DOS NIVELES: REMOTO PREFERIDO, LOCAL COMO RESPALDO
// ============================================================================
// La política de respaldo vive en un solo lugar, explícita y testeable,
// en vez de repetirse inline en cada servicio.
// ============================================================================

use std::future::Future;

/// Intenta la fuente remota; ante cualquier error cae a la fuente local
/// (el snapshot optimista), logueando el motivo.
pub async fn prefer_remote<T, Fut, L>(etiqueta: &str, remoto: Fut, local: L) -> Vec<T>
where
    Fut: Future<Output = Result<Vec<T>, String>>,
    L: FnOnce() -> Vec<T>,
{
    match remoto.await {
        Ok(registros) => {
            log::info!("✅ {} resuelto desde el backend ({} registros)", etiqueta, registros.len());
            registros
        }
        Err(error) => {
            log::warn!("⚠️ {} sin backend ({}), usando snapshot local", etiqueta, error);
            local()
        }
    }
}
