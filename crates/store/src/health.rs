//! Backend health checks.

use crate::store::PresenceStore;
use tracing::{debug, error};

/// Check backend reachability.
pub async fn check_connection(store: &dyn PresenceStore) -> bool {
    match store.ping().await {
        Ok(()) => {
            debug!("Backend connection healthy");
            true
        }
        Err(e) => {
            error!("Backend health check failed: {}", e);
            false
        }
    }
}
