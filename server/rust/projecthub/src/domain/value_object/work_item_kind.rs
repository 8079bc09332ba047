use std::fmt;

use serde::{Deserialize, Serialize};

/// WorkItemKind はタスク・不具合・インシデントの種別を表す。
/// 種別ごとに異なるステータス体系・プレースホルダー名・詳細画面パスをここに集約する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkItemKind {
    Task,
    Defect,
    Incident,
}

const TASK_STATUSES: &[(i16, &str)] = &[
    (1, "Not Started"),
    (2, "In Progress"),
    (3, "On Hold"),
    (4, "Waiting"),
    (5, "Cancel"),
    (6, "Completed"),
];

const DEFECT_STATUSES: &[(i16, &str)] = &[
    (1, "Assigned"),
    (2, "Closed"),
    (3, "In Progress"),
    (4, "Open"),
    (5, "Solved"),
    (6, "Re-open"),
    (7, "Deferred"),
];

const INCIDENT_STATUSES: &[(i16, &str)] = &[
    (1, "Open"),
    (2, "Assigned"),
    (3, "In Progress"),
    (4, "Solved"),
    (5, "Deferred"),
    (6, "Re-open"),
    (7, "Closed"),
];

impl WorkItemKind {
    pub const ALL: [WorkItemKind; 3] = [
        WorkItemKind::Task,
        WorkItemKind::Defect,
        WorkItemKind::Incident,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkItemKind::Task => "task",
            WorkItemKind::Defect => "defect",
            WorkItemKind::Incident => "incident",
        }
    }

    /// 「未完了」集計から除外するステータスコード。
    pub fn terminal_statuses(self) -> &'static [i16] {
        match self {
            WorkItemKind::Task => &[5, 6],
            WorkItemKind::Defect => &[2, 5],
            WorkItemKind::Incident => &[4, 7],
        }
    }

    pub fn is_terminal(self, status: i16) -> bool {
        self.terminal_statuses().contains(&status)
    }

    pub fn status_label(self, status: i16) -> Option<&'static str> {
        let table = match self {
            WorkItemKind::Task => TASK_STATUSES,
            WorkItemKind::Defect => DEFECT_STATUSES,
            WorkItemKind::Incident => INCIDENT_STATUSES,
        };
        table
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, label)| *label)
    }

    /// フロントエンドの詳細画面パス（`/#/<path>/detail/<id>`）の区画名。
    pub fn detail_area(self) -> &'static str {
        match self {
            WorkItemKind::Task => "tasks",
            WorkItemKind::Defect => "defects",
            WorkItemKind::Incident => "incidents",
        }
    }

    pub fn title_token(self) -> &'static str {
        match self {
            WorkItemKind::Task => "{TASK_NAME}",
            WorkItemKind::Defect => "{DEFECT_TITLE}",
            WorkItemKind::Incident => "{INCIDENT_TITLE}",
        }
    }

    pub fn url_token(self) -> &'static str {
        match self {
            WorkItemKind::Task => "{TASK_URL}",
            WorkItemKind::Defect => "{DEFECT_URL}",
            WorkItemKind::Incident => "{INCIDENT_URL}",
        }
    }
}

impl fmt::Display for WorkItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
