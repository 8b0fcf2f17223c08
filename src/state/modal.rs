use crate::api::ApiError;
use crate::types::ClientBackups;

#[derive(Debug, Clone, PartialEq)]
pub enum ModalLoad {
    Loading,
    Loaded(ClientBackups),
    Error(String),
}

/// The single-occupancy detail view over one client's backup history.
/// Only one session exists at a time; opening another client's history
/// replaces it. Each fetch carries the session's sequence number and a
/// response only applies while that number is still current.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalSession {
    pub client_id: String,
    pub client_name: String,
    pub seq: u64,
    pub load: ModalLoad,
}

impl ModalSession {
    pub fn loading(client_id: String, client_name: String, seq: u64) -> Self {
        Self {
            client_id,
            client_name,
            seq,
            load: ModalLoad::Loading,
        }
    }

    /// Applies a fetch resolution. Stale responses (sequence mismatch) are
    /// silently discarded. A server-reported error renders verbatim; any
    /// transport-level failure renders the generic loading error.
    pub fn apply_response(&mut self, seq: u64, result: Result<ClientBackups, ApiError>) {
        if seq != self.seq {
            return;
        }
        self.load = match result {
            Ok(backups) => ModalLoad::Loaded(backups),
            Err(ApiError::Application(message)) => ModalLoad::Error(message),
            Err(_) => ModalLoad::Error("Erreur de chargement des sauvegardes.".to_string()),
        };
    }
}
