use chrono::DateTime;

/// Formats a byte count as mebioctets with two decimals, comma decimal
/// separator and space thousands grouping: 2 097 152 -> "2,00 Mo".
/// The 1 048 576 divisor matches the service's own display convention.
pub fn format_mo(bytes: u64) -> String {
    let mo = bytes as f64 / 1_048_576.0;
    let fixed = format!("{:.2}", mo);
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    format!("{},{} Mo", grouped, dec_part)
}

/// Backup timestamps arrive as epoch seconds; absent or out-of-range
/// values render as an empty cell.
pub fn format_backup_time(epoch_seconds: Option<i64>) -> String {
    match epoch_seconds.and_then(|s| DateTime::from_timestamp(s, 0)) {
        Some(dt) => dt.format("%d/%m/%Y %H:%M").to_string(),
        None => String::new(),
    }
}
