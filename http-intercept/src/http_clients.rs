use crate::{
    data::{Method, RequestOptions, ResponseData},
    error::Error,
    http_client::{BlockingHttpClient, HttpClient, HyperHttpClient, ReqwestHttpClient},
};
use lazy_static::lazy_static;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

lazy_static! {
    static ref GLOBAL_HTTP_CLIENTS: HttpClients = HttpClients::default();
}

/// The two client entry points a registry hands out.
#[derive(Debug, Clone)]
pub struct ClientEntries {
    pub http_client: Arc<dyn HttpClient + Send + Sync>,
    pub blocking_http_client: Arc<dyn BlockingHttpClient + Send + Sync>,
}

impl ClientEntries {
    pub fn new(
        http_client: Arc<dyn HttpClient + Send + Sync>,
        blocking_http_client: Arc<dyn BlockingHttpClient + Send + Sync>,
    ) -> Self {
        Self {
            http_client,
            blocking_http_client,
        }
    }

    /// True when both entries point at the very same client instances.
    pub fn same_as(&self, other: &ClientEntries) -> bool {
        Arc::ptr_eq(&self.http_client, &other.http_client)
            && Arc::ptr_eq(&self.blocking_http_client, &other.blocking_http_client)
    }
}

impl Default for ClientEntries {
    fn default() -> Self {
        Self::new(
            Arc::new(HyperHttpClient::new()),
            Arc::new(ReqwestHttpClient::new()),
        )
    }
}

/// Registry code under test gets its HTTP clients from.
///
/// An [`InterceptionScope`](crate::InterceptionScope) swaps the entries for the lifetime of a
/// test, so anything resolving its client through the registry gets the fabricated responses.
#[derive(Debug)]
pub struct HttpClients {
    entries: RwLock<ClientEntries>,
    scope_lock: Mutex<()>,
}

impl HttpClients {
    pub fn new(entries: ClientEntries) -> Self {
        Self {
            entries: RwLock::new(entries),
            scope_lock: Mutex::new(()),
        }
    }

    /// Process-wide registry backed by the real clients.
    pub fn global() -> &'static HttpClients {
        &GLOBAL_HTTP_CLIENTS
    }

    pub fn entries(&self) -> ClientEntries {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn http_client(&self) -> Arc<dyn HttpClient + Send + Sync> {
        self.entries().http_client
    }

    pub fn blocking_http_client(&self) -> Arc<dyn BlockingHttpClient + Send + Sync> {
        self.entries().blocking_http_client
    }

    /// Installs `entries` and hands back the ones that were installed before.
    pub fn replace(&self, entries: ClientEntries) -> ClientEntries {
        let mut current = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        std::mem::replace(&mut *current, entries)
    }

    pub fn request(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> Result<ResponseData, Error> {
        self.blocking_http_client().request(method, url, options)
    }

    pub async fn request_async(
        &self,
        method: Method,
        url: &str,
        options: &RequestOptions,
    ) -> Result<ResponseData, Error> {
        let client = self.http_client();
        client.request(method, url, options).await
    }

    // a panicking test poisons the lock after its scope already restored the entries
    pub(crate) fn lock_scope(&self) -> MutexGuard<'_, ()> {
        self.scope_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for HttpClients {
    fn default() -> Self {
        Self::new(ClientEntries::default())
    }
}
