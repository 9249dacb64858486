// ============================================================================
// CONSTANTES COMPARTIDAS
// ============================================================================

/// URL base del backend
/// Configurada en tiempo de compilación:
/// - Desarrollo: http://localhost:3000 (por defecto)
/// - Producción: via BACKEND_URL en .env (ver build.rs)
pub const BACKEND_URL: &str = match option_env!("BACKEND_URL") {
    Some(url) => url,
    None => "http://localhost:3000",
};

// Claves de localStorage (dos blobs independientes: snapshot y cola de sync)
pub const STORAGE_KEY_SNAPSHOT: &str = "vacunapp_datos_locales";
pub const STORAGE_KEY_QUEUE: &str = "vacunapp_cola_sync";
pub const STORAGE_KEY_USUARIO: &str = "vacunapp_usuario_actual";

// Nombres de colecciones (particiones del snapshot local)
pub const COL_CENTROS: &str = "Centros_Vacunacion";
pub const COL_VACUNAS: &str = "Vacunas";
pub const COL_LOTES: &str = "Lotes_Vacunas";
pub const COL_NINOS: &str = "Niños";
pub const COL_TUTORES: &str = "Tutores";
pub const COL_CITAS: &str = "Citas";
pub const COL_DOSIS: &str = "Dosis_Aplicadas";
pub const COL_USUARIOS: &str = "Usuarios";

/// Una fila del esquema de vacunación pediátrica:
/// qué dosis de qué vacuna corresponde a qué edad (en meses).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EsquemaDosis {
    pub id_vacuna: &'static str,
    pub nombre_vacuna: &'static str,
    pub numero_dosis: u32,
    pub edad_meses: u32,
}

/// Esquema de vacunación estático sobre el que se calculan las vacunas
/// faltantes y los recordatorios de próximas dosis.
pub const ESQUEMA_VACUNACION: &[EsquemaDosis] = &[
    EsquemaDosis { id_vacuna: "vac_bcg", nombre_vacuna: "BCG", numero_dosis: 1, edad_meses: 0 },
    EsquemaDosis { id_vacuna: "vac_hepb", nombre_vacuna: "Hepatitis B", numero_dosis: 1, edad_meses: 0 },
    EsquemaDosis { id_vacuna: "vac_hepb", nombre_vacuna: "Hepatitis B", numero_dosis: 2, edad_meses: 2 },
    EsquemaDosis { id_vacuna: "vac_hepb", nombre_vacuna: "Hepatitis B", numero_dosis: 3, edad_meses: 6 },
    EsquemaDosis { id_vacuna: "vac_penta", nombre_vacuna: "Pentavalente", numero_dosis: 1, edad_meses: 2 },
    EsquemaDosis { id_vacuna: "vac_penta", nombre_vacuna: "Pentavalente", numero_dosis: 2, edad_meses: 4 },
    EsquemaDosis { id_vacuna: "vac_penta", nombre_vacuna: "Pentavalente", numero_dosis: 3, edad_meses: 6 },
    EsquemaDosis { id_vacuna: "vac_polio", nombre_vacuna: "Antipolio", numero_dosis: 1, edad_meses: 2 },
    EsquemaDosis { id_vacuna: "vac_polio", nombre_vacuna: "Antipolio", numero_dosis: 2, edad_meses: 4 },
    EsquemaDosis { id_vacuna: "vac_polio", nombre_vacuna: "Antipolio", numero_dosis: 3, edad_meses: 6 },
    EsquemaDosis { id_vacuna: "vac_rota", nombre_vacuna: "Rotavirus", numero_dosis: 1, edad_meses: 2 },
    EsquemaDosis { id_vacuna: "vac_rota", nombre_vacuna: "Rotavirus", numero_dosis: 2, edad_meses: 4 },
    EsquemaDosis { id_vacuna: "vac_neumo", nombre_vacuna: "Antineumococo", numero_dosis: 1, edad_meses: 2 },
    EsquemaDosis { id_vacuna: "vac_neumo", nombre_vacuna: "Antineumococo", numero_dosis: 2, edad_meses: 4 },
    EsquemaDosis { id_vacuna: "vac_srp", nombre_vacuna: "Trivalente Viral (SRP)", numero_dosis: 1, edad_meses: 12 },
];

/// Campo clave primaria de cada colección. Las colecciones no registradas
/// no tienen clave conocida (sus PUT degradan a append, ver LocalStore).
pub fn clave_primaria(coleccion: &str) -> Option<&'static str> {
    match coleccion {
        COL_CENTROS => Some("id_centro"),
        COL_VACUNAS => Some("id_vacuna"),
        COL_LOTES => Some("id_lote"),
        COL_NINOS => Some("id_niño"),
        COL_TUTORES => Some("id_tutor"),
        COL_CITAS => Some("id_cita"),
        COL_DOSIS => Some("id_dosis"),
        COL_USUARIOS => Some("id_usuario"),
        _ => None,
    }
}
