use sympli_dash::api::ApiError;
use sympli_dash::format::{format_backup_time, format_mo};
use sympli_dash::state::installer::failure_message;
use sympli_dash::types::{BackupRecord, UsedSpace};
use sympli_dash::ui::{file_backup_cells, image_backup_cells, size_cell};

#[test]
fn test_format_mo_two_decimals_comma_separator() {
    assert_eq!(format_mo(2_097_152), "2,00 Mo");
    assert_eq!(format_mo(1_048_576), "1,00 Mo");
    assert_eq!(format_mo(0), "0,00 Mo");
    assert_eq!(format_mo(1_572_864), "1,50 Mo");
}

#[test]
fn test_format_mo_thousands_grouping() {
    // 1_300_000_000 / 1_048_576 = 1239.7766...
    assert_eq!(format_mo(1_300_000_000), "1 239,78 Mo");
    assert_eq!(format_mo(1_099_511_627_776), "1 048 576,00 Mo");
}

#[test]
fn test_format_backup_time() {
    assert_eq!(format_backup_time(Some(1_700_000_000)), "14/11/2023 22:13");
    assert_eq!(format_backup_time(None), "");
}

#[test]
fn test_size_cell_is_exactly_size_or_placeholder() {
    assert_eq!(size_cell(&UsedSpace::Known(2_097_152)), "2,00 Mo");
    assert_eq!(size_cell(&UsedSpace::Unknown), "-");
    assert_eq!(size_cell(&UsedSpace::Loading), "-");
}

#[test]
fn test_image_backup_cells() {
    let record = BackupRecord {
        id: "1".to_string(),
        backup_time: Some(1_700_000_000),
        size_bytes: Some(1_048_576),
        incremental: false,
        letter: Some("C".to_string()),
    };

    assert_eq!(
        image_backup_cells(&record),
        vec!["1", "14/11/2023 22:13", "1,00 Mo", "C", "Non"]
    );
}

#[test]
fn test_file_backup_cells_with_missing_fields() {
    let record = BackupRecord {
        id: "42".to_string(),
        backup_time: None,
        size_bytes: None,
        incremental: true,
        letter: None,
    };

    assert_eq!(
        file_backup_cells(&record),
        vec!["42", "", "-", "Fichiers", "Oui"]
    );
}

#[test]
fn test_installer_failure_messages() {
    let message = failure_message(&ApiError::Http {
        status: 500,
        detail: Some("quota exceeded".to_string()),
    });
    assert_eq!(message, "Erreur serveur (500). Détail : quota exceeded");

    let message = failure_message(&ApiError::Http {
        status: 503,
        detail: None,
    });
    assert_eq!(message, "Erreur serveur (503)");

    let message = failure_message(&ApiError::Timeout);
    assert!(message.contains("génération"));
}
