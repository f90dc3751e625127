use chrono::{Datelike, Duration, NaiveDate};

/// Parse a single date token: `hoje`, `amanhã`, `DD/MM`, `DD/MM/YY` or
/// `DD/MM/YYYY`. Two-digit years mean `20YY`. Calendar-invalid dates
/// (month 13, Feb 30, ...) are rejected.
pub fn parse_date(token: &str, today: NaiveDate) -> Option<NaiveDate> {
    match token {
        "hoje" => return Some(today),
        "amanhã" => return Some(today + Duration::days(1)),
        _ => {}
    }

    let parts: Vec<&str> = token.split('/').collect();
    if parts.len() != 2 && parts.len() != 3 {
        return None;
    }
    if parts.iter().any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }

    let day: u32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let year: i32 = match parts.get(2) {
        None => today.year(),
        Some(y) if y.len() == 2 => 2000 + y.parse::<i32>().ok()?,
        Some(y) if y.len() == 4 => y.parse().ok()?,
        Some(_) => return None,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a single time token: `HH`, `HHh`, `HH:MM` or `HHhMM`, normalized
/// to `HH:MM`. Syntactic validity only; slot membership is checked by the
/// caller.
pub fn parse_time(token: &str) -> Option<String> {
    let (hour_part, minute_part) = if let Some((h, m)) = token.split_once(':') {
        (h, m)
    } else if let Some((h, m)) = token.split_once('h') {
        (h, m)
    } else {
        (token, "")
    };

    if hour_part.is_empty() || !hour_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = hour_part.parse().ok()?;

    let minute: u32 = if minute_part.is_empty() {
        0
    } else {
        if !minute_part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        minute_part.parse().ok()?
    };

    if hour > 23 || minute > 59 {
        return None;
    }
    Some(format!("{hour:02}:{minute:02}"))
}

/// Pull a date and a time out of a free-text message ("amanhã às 14h").
/// The first token that parses as a date wins, then the first remaining
/// token that parses as a time. Both must be present.
pub fn extract_date_time(message: &str, today: NaiveDate) -> Option<(NaiveDate, String)> {
    let tokens: Vec<String> = message
        .to_lowercase()
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| ",.;!?".contains(c)).to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let mut date = None;
    let mut date_idx = usize::MAX;
    for (i, token) in tokens.iter().enumerate() {
        if let Some(d) = parse_date(token, today) {
            date = Some(d);
            date_idx = i;
            break;
        }
    }
    let date = date?;

    let time = tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != date_idx)
        .find_map(|(_, token)| parse_time(token))?;

    Some((date, time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 6).unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_date_relative_tokens() {
        assert_eq!(parse_date("hoje", today()), Some(d("2025-08-06")));
        assert_eq!(parse_date("amanhã", today()), Some(d("2025-08-07")));
        // Accent-sensitive, as the rest of the matching is.
        assert_eq!(parse_date("amanha", today()), None);
    }

    #[test]
    fn test_parse_date_numeric() {
        assert_eq!(parse_date("25/12", today()), Some(d("2025-12-25")));
        assert_eq!(parse_date("01/02/26", today()), Some(d("2026-02-01")));
        assert_eq!(parse_date("01/02/2027", today()), Some(d("2027-02-01")));
    }

    #[test]
    fn test_parse_date_rejects_invalid_calendar() {
        assert_eq!(parse_date("25/13", today()), None);
        assert_eq!(parse_date("32/01", today()), None);
        assert_eq!(parse_date("30/02", today()), None);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date("25/12/1", today()), None);
        assert_eq!(parse_date("a/b", today()), None);
        assert_eq!(parse_date("25-12", today()), None);
        assert_eq!(parse_date("", today()), None);
    }

    #[test]
    fn test_parse_time_forms() {
        assert_eq!(parse_time("14"), Some("14:00".to_string()));
        assert_eq!(parse_time("14h"), Some("14:00".to_string()));
        assert_eq!(parse_time("14:30"), Some("14:30".to_string()));
        assert_eq!(parse_time("14h30"), Some("14:30".to_string()));
        assert_eq!(parse_time("9h"), Some("09:00".to_string()));
    }

    #[test]
    fn test_parse_time_rejects_out_of_range() {
        assert_eq!(parse_time("24"), None);
        assert_eq!(parse_time("14:75"), None);
        assert_eq!(parse_time("25h"), None);
        assert_eq!(parse_time("h30"), None);
        assert_eq!(parse_time("abc"), None);
    }

    #[test]
    fn test_extract_both_present() {
        assert_eq!(
            extract_date_time("amanhã às 14h", today()),
            Some((d("2025-08-07"), "14:00".to_string()))
        );
        assert_eq!(
            extract_date_time("pode ser 25/12 10:30", today()),
            Some((d("2025-12-25"), "10:30".to_string()))
        );
    }

    #[test]
    fn test_extract_missing_piece() {
        assert_eq!(extract_date_time("amanhã", today()), None);
        assert_eq!(extract_date_time("às 14h", today()), None);
        assert_eq!(extract_date_time("qualquer hora", today()), None);
    }

    #[test]
    fn test_extract_invalid_month_fails() {
        assert_eq!(extract_date_time("25/13 às 14h", today()), None);
    }

    #[test]
    fn test_extract_strips_punctuation() {
        assert_eq!(
            extract_date_time("amanhã, 14h!", today()),
            Some((d("2025-08-07"), "14:00".to_string()))
        );
    }
}
