use serde::{Deserialize, Serialize};

/// ProjectStatus はプロジェクトのステータスコードを表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Open,
    InProgress,
    OnHold,
    Cancelled,
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Open,
        ProjectStatus::InProgress,
        ProjectStatus::OnHold,
        ProjectStatus::Cancelled,
        ProjectStatus::Completed,
    ];

    /// 「アクティブ」集計から除外するステータスコード。
    pub const TERMINAL_CODES: [i16; 2] = [4, 5];

    pub fn code(self) -> i16 {
        match self {
            ProjectStatus::Open => 1,
            ProjectStatus::InProgress => 2,
            ProjectStatus::OnHold => 3,
            ProjectStatus::Cancelled => 4,
            ProjectStatus::Completed => 5,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn is_terminal_code(code: i16) -> bool {
        Self::TERMINAL_CODES.contains(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for status in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(ProjectStatus::from_code(9), None);
    }

    #[test]
    fn cancelled_and_completed_are_terminal() {
        assert!(ProjectStatus::is_terminal_code(4));
        assert!(ProjectStatus::is_terminal_code(5));
        assert!(!ProjectStatus::is_terminal_code(2));
    }
}
