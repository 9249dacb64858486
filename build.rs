use std::env;
use std::fs;
use std::path::Path;

// Inyecta BACKEND_URL (y cualquier otra variable de .env) como variables
// de entorno de compilación, para que utils::constants las lea con option_env!.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.env");

    let env_file = Path::new(".env");
    if !env_file.exists() {
        println!("cargo:warning=Sin archivo .env, usando BACKEND_URL por defecto (localhost)");
        return;
    }

    if let Ok(contents) = fs::read_to_string(env_file) {
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                // Las variables ya definidas en el entorno tienen prioridad
                if env::var(key).is_err() {
                    println!("cargo:rustc-env={}={}", key, value.trim());
                }
            }
        }
    }
}
