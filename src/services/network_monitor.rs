// ============================================================================
// MONITOR DE ESTADO DE RED
// ============================================================================
// Refleja las señales online/offline del navegador y detecta flancos:
// el callback de reconexión se dispara exactamente una vez por cada
// transición offline → online (los eventos repetidos no re-disparan).
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetworkStatus {
    Online,
    Offline,
    Unknown,
}

pub struct NetworkMonitor {
    status: Rc<RefCell<NetworkStatus>>,
    // Previene registros duplicados de listeners globales
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    monitoring_started: Rc<RefCell<bool>>,
}

impl NetworkMonitor {
    pub fn new() -> Self {
        let inicial = Self::estado_del_navegador();
        Self {
            status: Rc::new(RefCell::new(inicial)),
            monitoring_started: Rc::new(RefCell::new(false)),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn estado_del_navegador() -> NetworkStatus {
        match web_sys::window() {
            Some(win) => {
                if win.navigator().on_line() {
                    NetworkStatus::Online
                } else {
                    NetworkStatus::Offline
                }
            }
            None => NetworkStatus::Unknown,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn estado_del_navegador() -> NetworkStatus {
        NetworkStatus::Unknown
    }

    pub fn current_status(&self) -> NetworkStatus {
        *self.status.borrow()
    }

    pub fn is_online(&self) -> bool {
        matches!(self.current_status(), NetworkStatus::Online)
    }

    pub fn is_offline(&self) -> bool {
        matches!(self.current_status(), NetworkStatus::Offline)
    }

    /// Aplica una señal de conectividad y devuelve `true` solo cuando es
    /// una transición a Online desde un estado no-Online (detección de
    /// flanco, independiente del navegador para poder testearla).
    pub fn aplicar_estado(&self, online: bool) -> bool {
        let anterior = *self.status.borrow();
        let nuevo = if online {
            NetworkStatus::Online
        } else {
            NetworkStatus::Offline
        };
        *self.status.borrow_mut() = nuevo;

        online && anterior != NetworkStatus::Online
    }

    /// Registra el callback de reconexión sobre los eventos globales del
    /// navegador. Solo se registra una vez por monitor.
    #[cfg(target_arch = "wasm32")]
    pub fn on_online<F>(&mut self, callback: F)
    where
        F: Fn() + 'static,
    {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        {
            let mut started = self.monitoring_started.borrow_mut();
            if *started {
                log::warn!("⚠️ NetworkMonitor: on_online ya registrado, se ignora");
                return;
            }
            *started = true;
        }

        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };

        let status = self.status.clone();
        let online_closure = Closure::wrap(Box::new({
            let status = status.clone();
            move |_evento: web_sys::Event| {
                let anterior = *status.borrow();
                *status.borrow_mut() = NetworkStatus::Online;
                if anterior != NetworkStatus::Online {
                    log::info!("🌐 Red: ONLINE");
                    callback();
                }
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        let offline_closure = Closure::wrap(Box::new({
            let status = status.clone();
            move |_evento: web_sys::Event| {
                log::warn!("📴 Red: OFFLINE");
                *status.borrow_mut() = NetworkStatus::Offline;
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        let _ = window
            .add_event_listener_with_callback("online", online_closure.as_ref().unchecked_ref());
        let _ = window
            .add_event_listener_with_callback("offline", offline_closure.as_ref().unchecked_ref());

        // Los listeners globales viven tanto como la app
        online_closure.forget();
        offline_closure.forget();
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new()
    }
}
