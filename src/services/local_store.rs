// ============================================================================
// SNAPSHOT LOCAL - MOCK PERSISTENTE SOBRE localStorage
// ============================================================================
// Colecciones en memoria con cuatro buckets por colección (GET/POST/PUT/
// DELETE), sembradas desde un fixture empaquetado y espejadas a storage
// durable en cada mutación. Cada escritura se aplica de inmediato al
// snapshot (consistencia local optimista) y se encola SIEMPRE en la cola
// de sync, esté o no el navegador online.
//
// El bucket GET es la vista materializada: POST y PUT se espejan en él al
// escribir. DELETE solo acumula claves; el filtrado ocurre en el fold
// autoritativo, nunca automáticamente sobre GET.
// ============================================================================

use crate::models::{Operacion, SyncEntry};
use crate::services::sync_queue::SyncQueue;
use crate::utils::constants::{clave_primaria, STORAGE_KEY_SNAPSHOT};
use crate::utils::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Fixture inicial empaquetado en el binario
const SEMILLA: &str = include_str!("../../data/semilla.json");

/// Los cuatro buckets de operación de una colección
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Buckets {
    #[serde(rename = "GET", default)]
    pub get: Vec<Value>,
    #[serde(rename = "POST", default)]
    pub post: Vec<Value>,
    #[serde(rename = "PUT", default)]
    pub put: Vec<Value>,
    /// Lista de claves primarias marcadas como eliminadas
    #[serde(rename = "DELETE", default)]
    pub delete: Vec<Value>,
}

type Snapshot = HashMap<String, Buckets>;

#[derive(Clone)]
pub struct LocalStore {
    backend: Rc<dyn StorageBackend>,
    datos: Rc<RefCell<Snapshot>>,
    cola: SyncQueue,
}

impl LocalStore {
    /// Carga el snapshot persistido; sin blob (o con blob corrupto) se
    /// siembra desde el fixture empaquetado.
    pub fn new(backend: Rc<dyn StorageBackend>, cola: SyncQueue) -> Self {
        let datos = match backend.get_item(STORAGE_KEY_SNAPSHOT) {
            Some(json) => match serde_json::from_str::<Snapshot>(&json) {
                Ok(datos) => datos,
                Err(e) => {
                    log::error!("❌ Snapshot local corrupto, re-sembrando: {}", e);
                    Self::semilla()
                }
            },
            None => {
                log::info!("🌱 Sin snapshot persistido, sembrando datos iniciales");
                Self::semilla()
            }
        };

        Self {
            backend,
            datos: Rc::new(RefCell::new(datos)),
            cola,
        }
    }

    fn semilla() -> Snapshot {
        match serde_json::from_str::<Snapshot>(SEMILLA) {
            Ok(datos) => datos,
            Err(e) => {
                log::error!("❌ Fixture de semilla inválido: {}", e);
                Snapshot::new()
            }
        }
    }

    /// Cola donde se encolan las intenciones de escritura.
    pub fn cola(&self) -> &SyncQueue {
        &self.cola
    }

    /// Copia defensiva de un bucket. Colección u operación inexistente
    /// devuelve vacío, nunca falla.
    pub fn read(&self, coleccion: &str, operacion: Operacion) -> Vec<Value> {
        let datos = self.datos.borrow();
        match datos.get(coleccion) {
            Some(buckets) => match operacion {
                Operacion::Get => buckets.get.clone(),
                Operacion::Post => buckets.post.clone(),
                Operacion::Put => buckets.put.clone(),
                Operacion::Delete => buckets.delete.clone(),
            },
            None => Vec::new(),
        }
    }

    /// Aplica la escritura al snapshot en memoria, la encola de forma
    /// incondicional y espeja el snapshot a storage durable.
    ///
    /// Devuelve `false` (tras loguear) ante una falla interna; nunca
    /// propaga un error a la capa de UI. Una falla de persistencia deja
    /// el efecto solo en memoria para esta llamada.
    pub fn write(&self, coleccion: &str, operacion: Operacion, dato: Value) -> bool {
        {
            let mut datos = self.datos.borrow_mut();
            let buckets = datos.entry(coleccion.to_string()).or_default();
            match operacion {
                Operacion::Get => Self::aplicar_get(buckets, dato.clone()),
                Operacion::Post => Self::aplicar_post(buckets, dato.clone()),
                Operacion::Put => Self::aplicar_put(coleccion, buckets, dato.clone()),
                Operacion::Delete => Self::aplicar_delete(coleccion, buckets, &dato),
            }
        }

        // Encolado incondicional: optimista siempre, online u offline
        self.cola
            .enqueue(SyncEntry::nueva(coleccion, operacion, dato));

        self.persistir()
    }

    /// GET directo: reemplaza el bucket completo con el arreglo dado.
    fn aplicar_get(buckets: &mut Buckets, dato: Value) {
        match dato {
            Value::Array(registros) => buckets.get = registros,
            otro => {
                log::warn!("⚠️ Escritura GET con dato no-arreglo, se envuelve en arreglo");
                buckets.get = vec![otro];
            }
        }
    }

    /// POST: append al log y espejo inmediato en GET para que las
    /// lecturas autoritativas vean la fila nueva sin esperar al drain.
    fn aplicar_post(buckets: &mut Buckets, dato: Value) {
        buckets.post.push(dato.clone());
        buckets.get.push(dato);
    }

    /// PUT: upsert por clave primaria con merge superficial, espejado en
    /// GET. Sin clave primaria degrada a un append simple (decisión
    /// documentada en DESIGN.md).
    fn aplicar_put(coleccion: &str, buckets: &mut Buckets, dato: Value) {
        let campo = clave_primaria(coleccion);
        let tiene_clave =
            campo.map_or(false, |c| dato.get(c).map_or(false, |v| !v.is_null()));

        if let (Some(campo), true) = (campo, tiene_clave) {
            Self::upsert(&mut buckets.put, campo, dato.clone());
            Self::upsert(&mut buckets.get, campo, dato);
        } else {
            log::warn!(
                "⚠️ PUT en {} sin clave primaria, se agrega sin combinar",
                coleccion
            );
            buckets.put.push(dato.clone());
            buckets.get.push(dato);
        }
    }

    /// DELETE: acumula la clave (cruda u objeto con campo id conocido) en
    /// la lista de eliminados, sin duplicados. No toca GET: el filtrado
    /// es responsabilidad del fold autoritativo.
    fn aplicar_delete(coleccion: &str, buckets: &mut Buckets, dato: &Value) {
        match extraer_clave(coleccion, dato) {
            Some(clave) => {
                if !buckets.delete.contains(&clave) {
                    buckets.delete.push(clave);
                }
            }
            None => {
                log::warn!(
                    "⚠️ DELETE en {} sin clave extraíble, se ignora: {}",
                    coleccion,
                    dato
                );
            }
        }
    }

    /// Reemplaza (merge superficial) el registro con la misma clave
    /// primaria, o lo agrega al final si no existe.
    fn upsert(bucket: &mut Vec<Value>, campo: &str, dato: Value) {
        let clave = dato.get(campo).cloned().unwrap_or(Value::Null);
        let posicion = bucket
            .iter()
            .position(|registro| registro.get(campo) == Some(&clave));

        match posicion {
            Some(i) => {
                // Merge superficial: los campos nuevos pisan los viejos,
                // los no mencionados se conservan
                if let (Some(existente), Some(nuevos)) =
                    (bucket[i].as_object().cloned(), dato.as_object())
                {
                    let mut combinado = existente;
                    for (k, v) in nuevos {
                        combinado.insert(k.clone(), v.clone());
                    }
                    bucket[i] = Value::Object(combinado);
                } else {
                    bucket[i] = dato;
                }
            }
            None => bucket.push(dato),
        }
    }

    /// Fold autoritativo de una colección:
    /// GET ∪ POST (dedup por clave) → aplicar PUT por clave → filtrar DELETE.
    ///
    /// Es EL punto único de filtrado de eliminados: todos los servicios de
    /// dominio leen por acá, ninguno filtra por su cuenta.
    pub fn authoritative(&self, coleccion: &str) -> Vec<Value> {
        let datos = self.datos.borrow();
        let buckets = match datos.get(coleccion) {
            Some(b) => b,
            None => return Vec::new(),
        };
        let campo = clave_primaria(coleccion);

        let mut resultado = buckets.get.clone();

        // POST: agregar los que no estén ya (el espejo en GET hace que
        // normalmente ya estén; dedup por clave, o por igualdad si el
        // registro no trae clave)
        for registro in &buckets.post {
            let ya_esta = match campo.and_then(|c| registro.get(c)).filter(|v| !v.is_null()) {
                Some(clave) => resultado
                    .iter()
                    .any(|r| campo.and_then(|c| r.get(c)) == Some(clave)),
                None => resultado.contains(registro),
            };
            if !ya_esta {
                resultado.push(registro.clone());
            }
        }

        // PUT: re-aplicar upserts por clave
        if let Some(campo) = campo {
            for registro in &buckets.put {
                if registro.get(campo).filter(|v| !v.is_null()).is_some() {
                    Self::upsert(&mut resultado, campo, registro.clone());
                }
            }
        }

        // DELETE: restar las claves marcadas
        if let Some(campo) = campo {
            resultado.retain(|registro| match registro.get(campo) {
                Some(clave) => !buckets.delete.contains(clave),
                None => true,
            });
        }

        resultado
    }

    fn persistir(&self) -> bool {
        let json = match serde_json::to_string(&*self.datos.borrow()) {
            Ok(json) => json,
            Err(e) => {
                log::error!("❌ Error serializando snapshot local: {}", e);
                return false;
            }
        };
        match self.backend.set_item(STORAGE_KEY_SNAPSHOT, &json) {
            Ok(()) => true,
            Err(e) => {
                // Efecto solo en memoria para esta llamada: persistencia
                // local best-effort
                log::error!("❌ Error persistiendo snapshot local: {}", e);
                false
            }
        }
    }
}

/// Extrae la clave primaria de un payload de DELETE: acepta la clave
/// cruda (string o número) o un objeto que exponga el campo id de la
/// colección (o "id" genérico).
fn extraer_clave(coleccion: &str, dato: &Value) -> Option<Value> {
    match dato {
        Value::String(_) | Value::Number(_) => Some(dato.clone()),
        Value::Object(obj) => clave_primaria(coleccion)
            .and_then(|campo| obj.get(campo))
            .or_else(|| obj.get("id"))
            .filter(|v| !v.is_null())
            .cloned(),
        _ => None,
    }
}
