use std::sync::Arc;

use crossterm::event::KeyCode;
use sympli_dash::api::MockApiClientTrait;
use sympli_dash::app::App;
use sympli_dash::state::installer::InstallerState;
use sympli_dash::state::modal::ModalLoad;
use sympli_dash::types::{Client, ClientBackups, ClientRow};
use sympli_dash::ui::handle_key;

fn test_rows() -> Vec<ClientRow> {
    ["1", "2", "3"]
        .iter()
        .map(|id| {
            ClientRow::new(Client {
                id: id.to_string(),
                name: format!("client-{}", id),
                group: None,
                installer_download_url: None,
            })
        })
        .collect()
}

#[tokio::test]
async fn test_quit_key() {
    let mut app = App::new(Arc::new(MockApiClientTrait::new()));
    handle_key(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit);
}

#[tokio::test]
async fn test_help_toggle_and_escape() {
    let mut app = App::new(Arc::new(MockApiClientTrait::new()));
    assert!(!app.show_help);

    handle_key(&mut app, KeyCode::Char('h'));
    assert!(app.show_help);

    handle_key(&mut app, KeyCode::Esc);
    assert!(!app.show_help);
}

#[tokio::test]
async fn test_navigation_bounds() {
    let mut app = App::new(Arc::new(MockApiClientTrait::new()));
    app.rows = test_rows();

    handle_key(&mut app, KeyCode::Up);
    assert_eq!(app.selected_index, 0);

    handle_key(&mut app, KeyCode::Down);
    handle_key(&mut app, KeyCode::Down);
    handle_key(&mut app, KeyCode::Down);
    assert_eq!(app.selected_index, 2);

    handle_key(&mut app, KeyCode::Up);
    assert_eq!(app.selected_index, 1);
}

#[tokio::test]
async fn test_enter_opens_modal_and_escape_closes_it() {
    let mut mock = MockApiClientTrait::new();
    mock.expect_client_backups()
        .returning(|_| Ok(ClientBackups::default()));

    let mut app = App::new(Arc::new(mock));
    app.rows = test_rows();

    handle_key(&mut app, KeyCode::Enter);
    let modal = app.modal.as_ref().unwrap();
    assert_eq!(modal.client_id, "1");
    assert_eq!(modal.load, ModalLoad::Loading);

    handle_key(&mut app, KeyCode::Esc);
    assert!(app.modal.is_none());
}

#[tokio::test]
async fn test_generate_key_enters_submitting() {
    let mut mock = MockApiClientTrait::new();
    mock.expect_generate_installer()
        .returning(|_, _| Ok("/x.exe".to_string()));

    let mut app = App::new(Arc::new(mock));
    app.rows = test_rows();

    handle_key(&mut app, KeyCode::Char('g'));
    assert_eq!(app.rows[0].installer, InstallerState::Submitting);
}

#[tokio::test]
async fn test_keys_ignored_without_rows() {
    let mut app = App::new(Arc::new(MockApiClientTrait::new()));

    handle_key(&mut app, KeyCode::Enter);
    handle_key(&mut app, KeyCode::Char('g'));

    assert!(app.modal.is_none());
    assert!(app.rows.is_empty());
}
