use serde::{Deserialize, Deserializer};

use crate::api::ApiError;
use crate::state::installer::InstallerState;

/// A registered backup client as returned by `GET /clients`.
///
/// The proxy reports numeric ids while the dashboard keys everything by
/// string, so ids are normalized during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Client {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub installer_download_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsedSpacePayload {
    #[serde(default)]
    pub used_bytes: Option<u64>,
}

/// One backup entry, file or image kind. Image entries carry a drive letter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackupRecord {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub backup_time: Option<i64>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub incremental: bool,
    #[serde(default)]
    pub letter: Option<String>,
}

/// Combined backup history for one client. Absent lists come back empty;
/// both kinds render their own "none found" line in that case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientBackups {
    pub file_backups: Vec<BackupRecord>,
    pub image_backups: Vec<BackupRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackupsPayload {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub file_backups: Option<Vec<BackupRecord>>,
    #[serde(default)]
    pub image_backups: Option<Vec<BackupRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateInstallerPayload {
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Size cell state for one row. `Unknown` is terminal: a failed or
/// field-less fetch renders as a placeholder and is never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsedSpace {
    Loading,
    Known(u64),
    Unknown,
}

/// Merged view-model for one table row.
#[derive(Debug, Clone)]
pub struct ClientRow {
    pub client: Client,
    pub used: UsedSpace,
    pub installer: InstallerState,
}

impl ClientRow {
    pub fn new(client: Client) -> Self {
        let installer = InstallerState::from_existing(client.installer_download_url.clone());
        Self {
            client,
            used: UsedSpace::Loading,
            installer,
        }
    }
}

/// Completion messages posted by spawned fetch tasks and drained by the
/// UI loop. Every state mutation funnels through `App::apply_event`.
/// Listing and used-space results carry the load generation that issued
/// them; results from a superseded generation are discarded.
#[derive(Debug)]
pub enum AppEvent {
    ClientsLoaded {
        generation: u64,
        result: Result<Vec<Client>, ApiError>,
    },
    UsedSpaceLoaded {
        generation: u64,
        client_id: String,
        result: Result<Option<u64>, ApiError>,
    },
    BackupsLoaded {
        seq: u64,
        result: Result<ClientBackups, ApiError>,
    },
    InstallerFinished {
        client_id: String,
        result: Result<String, ApiError>,
    },
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
