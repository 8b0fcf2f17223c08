use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::time::Duration;
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::format::{format_backup_time, format_mo};
use crate::state::installer::InstallerState;
use crate::state::modal::ModalLoad;
use crate::types::{BackupRecord, UsedSpace};

const BASE_FG: Color = Color::Rgb(216, 222, 233);
const BASE_BG: Color = Color::Rgb(46, 52, 64);
const ACCENT_COLOR: Color = Color::Rgb(136, 192, 208);
const SUCCESS_COLOR: Color = Color::Rgb(163, 190, 140);
const WARNING_COLOR: Color = Color::Rgb(235, 203, 139);
const ERROR_COLOR: Color = Color::Rgb(191, 97, 106);
const HIGHLIGHT_BG: Color = Color::Rgb(59, 66, 82);
const BORDER_COLOR: Color = Color::Rgb(76, 86, 106);
const SUBTLE_FG: Color = Color::Rgb(129, 139, 152);

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    app.initialize();
    let tick_rate = Duration::from_millis(100);

    loop {
        app.drain_events();
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key.code);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Key handlers never block on the network; fetches are spawned and their
/// results drained from the event channel by the loop above.
pub fn handle_key(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => {
            if app.show_help {
                app.toggle_help();
            } else if app.modal.is_some() {
                app.close_modal();
            }
        }
        KeyCode::Char('h') => app.toggle_help(),
        KeyCode::Up => app.move_selection_up(),
        KeyCode::Down => app.move_selection_down(),
        KeyCode::Enter | KeyCode::Char(' ') => app.open_selected_backups(),
        KeyCode::Char('g') => app.submit_selected_installer(),
        KeyCode::Char('r') => app.initialize(),
        _ => {}
    }
}

fn ui(f: &mut Frame, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, main_chunks[0], app);
    render_clients_table(f, main_chunks[1], app);
    render_status_line(f, main_chunks[2], app);
    render_footer(f, main_chunks[3]);

    if let Some(modal) = &app.modal {
        render_backups_modal(f, modal);
    }
    if app.show_help {
        render_help_popup(f);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let subtitle = if app.loading {
        "Chargement...".to_string()
    } else {
        format!("{} client(s) enregistré(s)", app.rows.len())
    };

    let header_block = Block::default()
        .title(" Tableau de bord Symplibackup ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(BASE_FG).bg(BASE_BG));

    let header = Paragraph::new(subtitle)
        .style(Style::default().fg(ACCENT_COLOR))
        .alignment(Alignment::Center)
        .block(header_block);

    f.render_widget(header, area);
}

fn render_clients_table(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Liste des clients ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(BORDER_COLOR).bg(BASE_BG));

    if app.rows.is_empty() {
        let text = if app.loading {
            "Chargement..."
        } else {
            "Aucun client trouvé."
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(SUBTLE_FG))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["ID", "Nom", "Taille utilisée", "Installeur"])
        .style(
            Style::default()
                .fg(ACCENT_COLOR)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let open_client_id = app.modal.as_ref().map(|m| m.client_id.as_str());

    let rows: Vec<Row> = app
        .rows
        .iter()
        .map(|row| {
            let (installer_text, installer_color) = installer_cell(&row.installer);
            let cells = vec![
                Cell::from(row.client.id.clone()),
                Cell::from(row.client.name.clone()),
                Cell::from(size_cell(&row.used)),
                Cell::from(Span::styled(
                    installer_text,
                    Style::default().fg(installer_color),
                )),
            ];
            let styled = Row::new(cells).style(Style::default().fg(BASE_FG));
            if open_client_id == Some(row.client.id.as_str()) {
                styled.style(Style::default().fg(BASE_FG).bg(HIGHLIGHT_BG))
            } else {
                styled
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(16),
            Constraint::Length(16),
            Constraint::Min(24),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .bg(HIGHLIGHT_BG)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

    let mut table_state = TableState::default();
    table_state.select(Some(app.selected_index));
    f.render_stateful_widget(table, area, &mut table_state);
}

/// Exactly one of formatted size or the placeholder, never both.
pub fn size_cell(used: &UsedSpace) -> String {
    match used {
        UsedSpace::Known(bytes) => format_mo(*bytes),
        UsedSpace::Loading | UsedSpace::Unknown => "-".to_string(),
    }
}

pub fn installer_cell(state: &InstallerState) -> (String, Color) {
    match state {
        InstallerState::NotGenerated => ("Non généré".to_string(), SUBTLE_FG),
        InstallerState::Submitting => ("Envoi de la requête…".to_string(), WARNING_COLOR),
        InstallerState::Generated(url) => (format!("Télécharger : {}", url), SUCCESS_COLOR),
        InstallerState::Failed(message) => (message.clone(), ERROR_COLOR),
    }
}

fn render_status_line(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.selected_row().map(|r| &r.installer) {
        Some(InstallerState::Submitting) => Line::from(Span::styled(
            "Envoi de la requête…",
            Style::default().fg(WARNING_COLOR),
        )),
        Some(InstallerState::Generated(url)) => Line::from(Span::styled(
            format!("Succès : installeur généré. Télécharger : {}", url),
            Style::default().fg(SUCCESS_COLOR),
        )),
        Some(InstallerState::Failed(message)) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(ERROR_COLOR),
        )),
        _ => Line::from(""),
    };

    let status = Paragraph::new(line).style(Style::default().bg(BASE_BG));
    f.render_widget(status, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let hints =
        "↑/↓ naviguer | Entrée sauvegardes | g générer l'installeur | r rafraîchir | h aide | q quitter";
    let footer = Paragraph::new(hints)
        .style(Style::default().fg(SUBTLE_FG).bg(BASE_BG))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(BORDER_COLOR)),
        );
    f.render_widget(footer, area);
}

fn render_backups_modal(f: &mut Frame, modal: &crate::state::modal::ModalSession) {
    let popup_area = centered_rect(78, 70, f.area());
    f.render_widget(Clear, popup_area);

    let title = format!(
        " Sauvegardes du client {} (ID {}) ",
        modal.client_name, modal.client_id
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .style(Style::default().fg(ACCENT_COLOR).bg(BASE_BG));

    let lines = match &modal.load {
        ModalLoad::Loading => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Chargement...",
                Style::default().fg(SUBTLE_FG),
            )),
        ],
        ModalLoad::Error(message) => vec![
            Line::from(""),
            Line::from(Span::styled(
                message.clone(),
                Style::default().fg(ERROR_COLOR),
            )),
        ],
        ModalLoad::Loaded(backups) => {
            let mut lines = Vec::new();
            push_backup_section(
                &mut lines,
                "Backups fichiers",
                &backups.file_backups,
                false,
                "Aucune sauvegarde fichier trouvée.",
            );
            lines.push(Line::from(""));
            push_backup_section(
                &mut lines,
                "Backups images",
                &backups.image_backups,
                true,
                "Aucune sauvegarde image trouvée.",
            );
            lines
        }
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup_area);
}

fn push_backup_section(
    lines: &mut Vec<Line<'static>>,
    title: &str,
    records: &[BackupRecord],
    image_kind: bool,
    empty_text: &str,
) {
    lines.push(Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(ACCENT_COLOR)
            .add_modifier(Modifier::BOLD),
    )));

    if records.is_empty() {
        lines.push(Line::from(Span::styled(
            empty_text.to_string(),
            Style::default().fg(SUBTLE_FG),
        )));
        return;
    }

    let fourth = if image_kind { "Lettre" } else { "Type" };
    lines.push(Line::from(Span::styled(
        backup_line(&["ID", "Date", "Taille", fourth, "Incr."]),
        Style::default().fg(SUBTLE_FG).add_modifier(Modifier::BOLD),
    )));

    for record in records {
        let cells = if image_kind {
            image_backup_cells(record)
        } else {
            file_backup_cells(record)
        };
        let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        lines.push(Line::from(Span::styled(
            backup_line(&refs),
            Style::default().fg(BASE_FG),
        )));
    }
}

/// Display cells for a file-backup row: id, date, size, kind, incremental.
pub fn file_backup_cells(record: &BackupRecord) -> Vec<String> {
    vec![
        record.id.clone(),
        format_backup_time(record.backup_time),
        record.size_bytes.map(format_mo).unwrap_or_else(|| "-".to_string()),
        "Fichiers".to_string(),
        if record.incremental { "Oui" } else { "Non" }.to_string(),
    ]
}

/// Display cells for an image-backup row: id, date, size, drive letter,
/// incremental.
pub fn image_backup_cells(record: &BackupRecord) -> Vec<String> {
    vec![
        record.id.clone(),
        format_backup_time(record.backup_time),
        record.size_bytes.map(format_mo).unwrap_or_else(|| "-".to_string()),
        record.letter.clone().unwrap_or_else(|| "-".to_string()),
        if record.incremental { "Oui" } else { "Non" }.to_string(),
    ]
}

fn backup_line(cells: &[&str]) -> String {
    const WIDTHS: [usize; 5] = [8, 18, 14, 10, 5];
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(WIDTHS) {
        line.push_str(&pad_cell(cell, width));
        line.push(' ');
    }
    line.trim_end().to_string()
}

fn pad_cell(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn render_help_popup(f: &mut Frame) {
    let popup_area = centered_rect(50, 50, f.area());
    f.render_widget(Clear, popup_area);

    let help_lines = vec![
        Line::from(""),
        Line::from("↑ / ↓        Sélectionner un client"),
        Line::from("Entrée/Espace  Afficher les sauvegardes"),
        Line::from("g            Générer l'installeur"),
        Line::from("r            Rafraîchir la liste"),
        Line::from("Échap        Fermer la fenêtre"),
        Line::from("q            Quitter"),
    ];

    let block = Block::default()
        .title(" Aide ")
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .style(Style::default().fg(ACCENT_COLOR).bg(BASE_BG));

    let paragraph = Paragraph::new(help_lines)
        .block(block)
        .alignment(Alignment::Left);
    f.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
