use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::ApiClientTrait;
use crate::state::modal::{ModalLoad, ModalSession};
use crate::types::{AppEvent, ClientRow, UsedSpace};

/// Dashboard state. All network work happens in spawned tasks that post an
/// `AppEvent`; the UI loop drains those events into `apply_event`, which is
/// the single mutation point for asynchronous results.
pub struct App {
    pub api: Arc<dyn ApiClientTrait>,
    pub rows: Vec<ClientRow>,
    pub selected_index: usize,
    pub modal: Option<ModalSession>,
    next_modal_seq: u64,
    load_generation: u64,
    pub loading: bool,
    pub show_help: bool,
    pub should_quit: bool,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    pub events: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(api: Arc<dyn ApiClientTrait>) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        Self {
            api,
            rows: Vec::new(),
            selected_index: 0,
            modal: None,
            next_modal_seq: 0,
            load_generation: 0,
            loading: true,
            show_help: false,
            should_quit: false,
            events_tx,
            events,
        }
    }

    /// Starts (or restarts) the listing fetch without blocking the UI
    /// loop; the result arrives as a `ClientsLoaded` event. Each call
    /// bumps the load generation, so fetches issued before a reload can
    /// no longer touch the rebuilt rows.
    pub fn initialize(&mut self) {
        self.loading = true;
        self.modal = None;
        self.load_generation += 1;
        let generation = self.load_generation;

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.list_clients().await;
            let _ = tx.send(AppEvent::ClientsLoaded { generation, result });
        });
    }

    /// Fire-and-forget: the fetches have no ordering guarantees between
    /// each other and one failure only affects its own row.
    fn spawn_used_space_fetches(&self, generation: u64) {
        for row in &self.rows {
            let api = Arc::clone(&self.api);
            let tx = self.events_tx.clone();
            let client_id = row.client.id.clone();
            tokio::spawn(async move {
                let result = api.used_space(&client_id).await;
                let _ = tx.send(AppEvent::UsedSpaceLoaded {
                    generation,
                    client_id,
                    result,
                });
            });
        }
    }

    /// Single reducer-style entry point for every asynchronous result.
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ClientsLoaded { generation, result } => {
                if generation != self.load_generation {
                    return;
                }
                // Empty, malformed or failed listing publishes the
                // explicit no-clients row; it is a rendering instruction,
                // not an error state.
                let clients = result.unwrap_or_default();
                self.rows = clients.into_iter().map(ClientRow::new).collect();
                self.selected_index = 0;
                self.loading = false;
                self.spawn_used_space_fetches(generation);
            }
            AppEvent::UsedSpaceLoaded {
                generation,
                client_id,
                result,
            } => {
                if generation != self.load_generation {
                    return;
                }
                if let Some(row) = self.row_mut(&client_id) {
                    row.used = match result {
                        Ok(Some(bytes)) => UsedSpace::Known(bytes),
                        Ok(None) | Err(_) => UsedSpace::Unknown,
                    };
                }
            }
            AppEvent::BackupsLoaded { seq, result } => {
                if let Some(modal) = &mut self.modal {
                    modal.apply_response(seq, result);
                }
            }
            AppEvent::InstallerFinished { client_id, result } => {
                if let Some(row) = self.row_mut(&client_id) {
                    row.installer.finish(result);
                }
            }
        }
    }

    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(event);
        }
    }

    /// Opens the backup-history modal for the selected row and starts the
    /// fetch. Re-selecting the client already loading keeps the current
    /// sequence number so the in-flight response still applies; any other
    /// selection replaces the session and stales older responses.
    pub fn open_selected_backups(&mut self) {
        let Some(row) = self.rows.get(self.selected_index) else {
            return;
        };

        if let Some(modal) = &self.modal {
            if modal.client_id == row.client.id && modal.load == ModalLoad::Loading {
                return;
            }
        }

        self.next_modal_seq += 1;
        let seq = self.next_modal_seq;
        let client_id = row.client.id.clone();
        self.modal = Some(ModalSession::loading(
            client_id.clone(),
            row.client.name.clone(),
            seq,
        ));

        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.client_backups(&client_id).await;
            let _ = tx.send(AppEvent::BackupsLoaded { seq, result });
        });
    }

    /// Closing drops the session; a response still in flight will miss the
    /// sequence check and be discarded. The row highlight follows the
    /// session and clears with it.
    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Submits installer generation for the selected row. The state machine
    /// refuses re-entry while a request is outstanding, which is the sole
    /// concurrency guard; the spawned task posts exactly one terminal event
    /// on every branch, so the control is always re-enabled.
    pub fn submit_selected_installer(&mut self) {
        let Some(row) = self.rows.get_mut(self.selected_index) else {
            return;
        };
        if !row.installer.begin_submit() {
            return;
        }

        let client_id = row.client.id.clone();
        let client_name = row.client.name.clone();
        let group = row.client.group.clone().unwrap_or_default();
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.generate_installer(&client_name, &group).await;
            let _ = tx.send(AppEvent::InstallerFinished { client_id, result });
        });
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_index < self.rows.len().saturating_sub(1) {
            self.selected_index += 1;
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn selected_row(&self) -> Option<&ClientRow> {
        self.rows.get(self.selected_index)
    }

    fn row_mut(&mut self, client_id: &str) -> Option<&mut ClientRow> {
        self.rows.iter_mut().find(|r| r.client.id == client_id)
    }
}
