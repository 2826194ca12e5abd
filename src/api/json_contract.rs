use serde::{Deserialize, Serialize};

use crate::error::{ViewportError, ViewportResult};

use super::{EngineSnapshot, ViewportEngineConfig};

pub const ENGINE_CONFIG_JSON_SCHEMA_V1: u32 = 1;
pub const ENGINE_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: ViewportEngineConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: EngineSnapshot,
}

impl ViewportEngineConfig {
    pub fn to_json_contract_v1_pretty(&self) -> ViewportResult<String> {
        let payload = EngineConfigJsonContractV1 {
            schema_version: ENGINE_CONFIG_JSON_SCHEMA_V1,
            config: *self,
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ViewportError::InvalidData(format!("failed to serialize config contract v1: {e}"))
        })
    }

    /// Parses either a bare config object or a versioned contract envelope.
    pub fn from_json_compat_str(input: &str) -> ViewportResult<Self> {
        if let Ok(payload) = serde_json::from_str::<EngineConfigJsonContractV1>(input) {
            if payload.schema_version != ENGINE_CONFIG_JSON_SCHEMA_V1 {
                return Err(ViewportError::InvalidData(format!(
                    "unsupported config schema version: {}",
                    payload.schema_version
                )));
            }
            return Ok(payload.config);
        }
        serde_json::from_str::<Self>(input).map_err(|e| {
            ViewportError::InvalidData(format!("failed to parse config json payload: {e}"))
        })
    }
}

impl EngineSnapshot {
    pub fn to_json_contract_v1_pretty(&self) -> ViewportResult<String> {
        let payload = EngineSnapshotJsonContractV1 {
            schema_version: ENGINE_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ViewportError::InvalidData(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }
}
