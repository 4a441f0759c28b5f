use crate::{
    http_clients::{ClientEntries, HttpClients},
    interception_configuration::InterceptionConfiguration,
};
use std::sync::{Arc, MutexGuard};
use tracing::{debug, info};

/// Swaps the clients of a [`HttpClients`] registry for a [`MockedHttp`](crate::MockedHttp)
/// while it is alive.
///
/// When the configuration is disabled nothing is substituted. Either way the scope holds the
/// registry's scope lock, so scopes on the same registry run one after another; entering a second
/// scope on the same registry from the thread that holds the first one never returns.
///
/// The original entries are put back on drop, which also happens while unwinding from a failed
/// test.
#[derive(Debug)]
pub struct InterceptionScope<'a> {
    clients: &'a HttpClients,
    original: Option<ClientEntries>,
    _scope_lock: MutexGuard<'a, ()>,
}

impl<'a> InterceptionScope<'a> {
    /// Enters a scope configured from `MOCK_SWITCH`.
    pub fn enter(clients: &'a HttpClients) -> Self {
        Self::enter_with(clients, &InterceptionConfiguration::from_env())
    }

    pub fn enter_with(clients: &'a HttpClients, configuration: &InterceptionConfiguration) -> Self {
        let scope_lock = clients.lock_scope();

        let original = if configuration.enabled() {
            let mocked = Arc::new(configuration.mocked_http());
            info!(
                not_found_url = configuration.not_found_url(),
                "intercepting outbound http requests"
            );

            Some(clients.replace(ClientEntries::new(mocked.clone(), mocked)))
        } else {
            debug!("http interception disabled, real clients stay in place");
            None
        };

        Self {
            clients,
            original,
            _scope_lock: scope_lock,
        }
    }

    pub fn is_intercepting(&self) -> bool {
        self.original.is_some()
    }

    /// The entries that get restored when the scope ends, if any were replaced.
    pub fn replaced_entries(&self) -> Option<&ClientEntries> {
        self.original.as_ref()
    }
}

impl Drop for InterceptionScope<'_> {
    fn drop(&mut self) {
        if let Some(original) = self.original.take() {
            self.clients.replace(original);
            debug!("restored the original http clients");
        }
    }
}

/// Runs `func` inside an [`InterceptionScope`] on `clients`.
pub fn with_interception<T, F: FnOnce() -> T>(
    clients: &HttpClients,
    configuration: &InterceptionConfiguration,
    func: F,
) -> T {
    let _scope = InterceptionScope::enter_with(clients, configuration);
    func()
}
