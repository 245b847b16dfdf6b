//! Shared HTTP client for registry requests.
//!
//! One client is built per server and handed to the registry, so repeated
//! lookups reuse pooled connections and TLS sessions.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

const USER_AGENT: &str = concat!("docs-companion-lsp/", env!("CARGO_PKG_VERSION"));

const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the shared client.
///
/// `timeout` bounds the whole request; `None` leaves only the connect
/// timeout in place.
pub fn create_shared_client(timeout: Option<Duration>) -> anyhow::Result<Arc<Client>> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Duration::from_secs(60));

    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    Ok(Arc::new(builder.build()?))
}
