use chrono::Utc;
use std::cell::Cell;

thread_local! {
    static CONTADOR: Cell<u64> = Cell::new(0);
}

/// Id sintético para registros creados offline: prefijo + epoch-ms + un
/// contador por proceso (dos altas en el mismo milisegundo no chocan).
pub fn generar_id(prefijo: &str) -> String {
    let n = CONTADOR.with(|c| {
        let v = c.get() + 1;
        c.set(v);
        v
    });
    format!("{}_{}_{}", prefijo, Utc::now().timestamp_millis(), n)
}
