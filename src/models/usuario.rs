use serde::{Deserialize, Serialize};

/// Rol del usuario actual. Determina qué tablero se muestra;
/// el núcleo de sincronización no depende de él.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Administrador,
    Director,
    Doctor,
    Padre,
}

impl Rol {
    /// Normaliza el rol tal como llega del backend o del formulario de
    /// login (mayúsculas, sinónimos, espacios). Desconocido → Padre,
    /// el rol con menos permisos.
    pub fn normalizar(texto: &str) -> Rol {
        match texto.trim().to_lowercase().as_str() {
            "admin" | "administrador" | "administradora" => Rol::Administrador,
            "director" | "directora" => Rol::Director,
            "doctor" | "doctora" | "medico" | "médico" => Rol::Doctor,
            _ => Rol::Padre,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Administrador => "administrador",
            Rol::Director => "director",
            Rol::Doctor => "doctor",
            Rol::Padre => "padre",
        }
    }
}

/// Usuario autenticado persistido en el navegador
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    #[serde(default)]
    pub id_usuario: String,
    pub nombre: String,
    #[serde(default)]
    pub correo: Option<String>,
    pub rol: Rol,
    /// Centros asignados (directores y doctores)
    #[serde(default)]
    pub centros: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normaliza_sinonimos_y_mayusculas() {
        assert_eq!(Rol::normalizar("ADMIN"), Rol::Administrador);
        assert_eq!(Rol::normalizar(" administradora "), Rol::Administrador);
        assert_eq!(Rol::normalizar("Directora"), Rol::Director);
        assert_eq!(Rol::normalizar("médico"), Rol::Doctor);
        assert_eq!(Rol::normalizar("madre"), Rol::Padre);
    }

    #[test]
    fn rol_desconocido_degrada_a_padre() {
        assert_eq!(Rol::normalizar("super-usuario"), Rol::Padre);
        assert_eq!(Rol::normalizar(""), Rol::Padre);
    }
}
