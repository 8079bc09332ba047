use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// メール本文・件名に埋め込む日時の書式。
pub const DATE_TIME_FORMAT: &str = "%A, %B %-d, %Y %-I:%M %p";
pub const DATE_FORMAT: &str = "%A, %B %-d, %Y";
pub const TIME_FORMAT: &str = "%-I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub title: String,
    pub start_date: NaiveDateTime,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub title: String,
    pub start_date_time: NaiveDateTime,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub title: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    #[serde(default)]
    pub description: String,
}

/// 件名用に「タイトル + 開始日時」を組み立てる。
pub fn titled_subject(title: &str, at: &NaiveDateTime) -> String {
    format!("{} {}", title, at.format(DATE_TIME_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn subject_uses_long_date_time() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        assert_eq!(
            titled_subject("Sprint review", &at),
            "Sprint review Monday, March 9, 2026 2:05 PM"
        );
        assert_eq!(at.format(DATE_FORMAT).to_string(), "Monday, March 9, 2026");
        assert_eq!(at.format(TIME_FORMAT).to_string(), "2:05 PM");
    }
}
