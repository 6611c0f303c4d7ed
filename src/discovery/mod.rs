//! Device discovery: radio inquiry, vendor filtering, and name resolution.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::core::address::{BtAddress, Oui};
use crate::core::constants::UNKNOWN_DEVICE_NAME;
use crate::core::error::DiscoveryError;
use crate::core::traits::Discoverer;

/// Scan for nearby devices and return a display-name to address mapping.
///
/// Runs one flush-cache inquiry bounded at `max_responses` candidates, then
/// for each candidate:
///
/// - candidates whose raw address cannot be resolved are skipped (logged),
///   never aborting the scan;
/// - candidates outside the `vendor` prefix are filtered out;
/// - the friendly name is resolved with a separate query bounded by
///   `name_timeout`; on failure the [`UNKNOWN_DEVICE_NAME`] sentinel is
///   substituted rather than failing the scan.
///
/// If two devices share a display name the later one wins.
pub async fn discover<D: Discoverer>(
    discoverer: &mut D,
    scan: Duration,
    max_responses: usize,
    name_timeout: Duration,
    vendor: Oui,
) -> Result<HashMap<String, BtAddress>, DiscoveryError> {
    info!(scan_secs = scan.as_secs(), %vendor, "starting device inquiry");
    let candidates = discoverer.inquire(scan, max_responses).await?;
    debug!(count = candidates.len(), "inquiry finished");

    let mut devices = HashMap::new();
    for candidate in &candidates {
        let address = match discoverer.resolve_address(candidate) {
            Ok(address) => address,
            Err(err) => {
                warn!(%err, "skipping candidate with unresolvable address");
                continue;
            }
        };

        if address.oui() != vendor {
            debug!(%address, "ignoring device outside vendor prefix");
            continue;
        }

        let name = match timeout(name_timeout, discoverer.remote_name(address)).await {
            Ok(Ok(name)) => name,
            Ok(Err(err)) => {
                warn!(%address, %err, "remote name query failed");
                UNKNOWN_DEVICE_NAME.to_string()
            }
            Err(_) => {
                warn!(%address, "remote name query timed out");
                UNKNOWN_DEVICE_NAME.to_string()
            }
        };

        debug!(%address, name = %name, "found device");
        devices.insert(name, address);
    }

    info!(count = devices.len(), "discovery complete");
    Ok(devices)
}
