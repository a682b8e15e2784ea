//! Scriptable registry double recording connects and registrations.

use std::sync::{Arc, Mutex, MutexGuard};

use lattice_cluster::{
    Namespace, RegistrationError, RegistryClient, RegistryError, RegistryProvider,
};
use lattice_config::Config;

#[derive(Default)]
struct ScriptedState {
    connected: Vec<Namespace>,
    registered: Vec<(Namespace, String, String)>,
    reject_namespace: Option<Namespace>,
    reject_anchor: Option<String>,
}

/// Registry double shared between the provider and its clients.
#[derive(Clone, Default)]
pub struct ScriptedRegistry {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedRegistry {
    fn lock(&self) -> MutexGuard<'_, ScriptedState> {
        self.state.lock().expect("scripted registry mutex poisoned")
    }

    /// Scripts a connect failure for `namespace`.
    pub fn reject_namespace(&self, namespace: Namespace) {
        self.lock().reject_namespace = Some(namespace);
    }

    /// Scripts a registration failure for `anchor`.
    pub fn reject_anchor(&self, anchor: &str) {
        self.lock().reject_anchor = Some(anchor.to_owned());
    }

    /// Namespaces successfully connected, in order.
    pub fn connected(&self) -> Vec<Namespace> {
        self.lock().connected.clone()
    }

    /// Registrations accepted, in order.
    pub fn registered(&self) -> Vec<(Namespace, String, String)> {
        self.lock().registered.clone()
    }
}

impl RegistryProvider for ScriptedRegistry {
    type Client = ScriptedClient;

    fn connect(&self, namespace: Namespace, _config: &Config) -> Result<Self::Client, RegistryError> {
        let mut state = self.lock();
        if state.reject_namespace == Some(namespace) {
            return Err(RegistryError::new(namespace, "scripted connect failure"));
        }
        state.connected.push(namespace);
        Ok(ScriptedClient {
            namespace,
            state: Arc::clone(&self.state),
        })
    }
}

/// Client handed out by [`ScriptedRegistry`].
pub struct ScriptedClient {
    namespace: Namespace,
    state: Arc<Mutex<ScriptedState>>,
}

impl RegistryClient for ScriptedClient {
    fn register(&mut self, name: &str, address: &str) -> Result<(), RegistrationError> {
        let mut state = self.state.lock().expect("scripted registry mutex poisoned");
        if state.reject_anchor.as_deref() == Some(name) {
            return Err(RegistrationError::new(name, "scripted registration failure"));
        }
        state
            .registered
            .push((self.namespace, name.to_owned(), address.to_owned()));
        Ok(())
    }
}
