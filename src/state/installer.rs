use crate::api::ApiError;

/// Per-row installer action state. Governs which affordance the action
/// cell renders and blocks duplicate concurrent submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallerState {
    NotGenerated,
    Submitting,
    Generated(String),
    Failed(String),
}

impl InstallerState {
    /// Initial affordance at first paint; a client record may already
    /// carry a previously generated installer. Absence is not an error.
    pub fn from_existing(download_url: Option<String>) -> Self {
        match download_url {
            Some(url) if !url.is_empty() => InstallerState::Generated(url),
            _ => InstallerState::NotGenerated,
        }
    }

    /// Enters `Submitting` unless a request is already outstanding;
    /// returns false when the control is disabled. `Failed` and
    /// `Generated` resubmit through this same path.
    pub fn begin_submit(&mut self) -> bool {
        if matches!(self, InstallerState::Submitting) {
            return false;
        }
        *self = InstallerState::Submitting;
        true
    }

    /// Terminal transition, taken for every branch of the response so the
    /// control is re-enabled unconditionally.
    pub fn finish(&mut self, result: Result<String, ApiError>) {
        *self = match result {
            Ok(download_url) => InstallerState::Generated(download_url),
            Err(err) => InstallerState::Failed(failure_message(&err)),
        };
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, InstallerState::Submitting)
    }
}

/// Surfaces the HTTP status and the server detail string when present,
/// otherwise a generic transport-error indicator.
pub fn failure_message(err: &ApiError) -> String {
    match err {
        ApiError::Http {
            status,
            detail: Some(detail),
        } => format!("Erreur serveur ({}). Détail : {}", status, detail),
        ApiError::Http {
            status,
            detail: None,
        } => format!("Erreur serveur ({})", status),
        other => format!("Erreur lors de la génération : {}", other),
    }
}
