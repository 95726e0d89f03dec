//! Device identity for multi-device sync provenance.
//!
//! Each installation gets a stable `tahfiz-<uuid>` marker so pushed
//! snapshots can be attributed to a device when debugging divergence.

use std::fs;
use std::path::Path;

use uuid::Uuid;

const DEVICE_ID_FILE: &str = "device_id";
const DEVICE_ID_PREFIX: &str = "tahfiz-";

#[derive(Debug, thiserror::Error)]
pub enum DeviceIdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid device id format: {0}")]
    InvalidFormat(String),
}

/// Read the device id stored under `dir`, creating one on first use.
pub fn get_or_create_device_id(dir: &Path) -> Result<String, DeviceIdError> {
    let path = dir.join(DEVICE_ID_FILE);

    if path.exists() {
        let device_id = fs::read_to_string(&path)?.trim().to_string();
        if device_id.starts_with(DEVICE_ID_PREFIX) {
            return Ok(device_id);
        }
        return Err(DeviceIdError::InvalidFormat(device_id));
    }

    let device_id = format!("{DEVICE_ID_PREFIX}{}", Uuid::new_v4());
    fs::create_dir_all(dir)?;
    fs::write(&path, format!("{device_id}\n"))?;
    Ok(device_id)
}
