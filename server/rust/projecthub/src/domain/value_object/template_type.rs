use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::work_item_kind::WorkItemKind;

/// DispatchMode は配信方式を表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// その場で送信し、結果を呼び出し元へ返す。
    Immediate,
    /// 固定遅延付きでキューへ投入する。
    Delayed,
}

impl DispatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            DispatchMode::Immediate => "immediate",
            DispatchMode::Delayed => "delayed",
        }
    }
}

/// TemplateType はメールテンプレートの種別キー。イベント種別ごとに 1 テンプレートが対応する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    ActivateAccount,
    ChangeEmail,
    ResetPassword,
    ForgotPassword,
    WelcomeEmail,
    Meeting,
    CancelMeeting,
    Announcement,
    AppointmentMail,
    AssignedProject,
    NotificationClient,
    CompleteProjects,
    ProjectComments,
    ProjectAttachment,
    TaskAssigned,
    TaskUpdated,
    TaskComments,
    TaskAttachment,
    DefectAssigned,
    DefectUpdated,
    DefectComments,
    DefectAttachment,
    IncidentAssigned,
    IncidentUpdated,
    IncidentComments,
    IncidentAttachment,
}

impl TemplateType {
    pub const ALL: [TemplateType; 26] = [
        TemplateType::ActivateAccount,
        TemplateType::ChangeEmail,
        TemplateType::ResetPassword,
        TemplateType::ForgotPassword,
        TemplateType::WelcomeEmail,
        TemplateType::Meeting,
        TemplateType::CancelMeeting,
        TemplateType::Announcement,
        TemplateType::AppointmentMail,
        TemplateType::AssignedProject,
        TemplateType::NotificationClient,
        TemplateType::CompleteProjects,
        TemplateType::ProjectComments,
        TemplateType::ProjectAttachment,
        TemplateType::TaskAssigned,
        TemplateType::TaskUpdated,
        TemplateType::TaskComments,
        TemplateType::TaskAttachment,
        TemplateType::DefectAssigned,
        TemplateType::DefectUpdated,
        TemplateType::DefectComments,
        TemplateType::DefectAttachment,
        TemplateType::IncidentAssigned,
        TemplateType::IncidentUpdated,
        TemplateType::IncidentComments,
        TemplateType::IncidentAttachment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateType::ActivateAccount => "activate_account",
            TemplateType::ChangeEmail => "change_email",
            TemplateType::ResetPassword => "reset_password",
            TemplateType::ForgotPassword => "forgot_password",
            TemplateType::WelcomeEmail => "welcome_email",
            TemplateType::Meeting => "meeting",
            TemplateType::CancelMeeting => "cancel_meeting",
            TemplateType::Announcement => "announcement",
            TemplateType::AppointmentMail => "appointment_mail",
            TemplateType::AssignedProject => "assigned_project",
            TemplateType::NotificationClient => "notification_client",
            TemplateType::CompleteProjects => "complete_projects",
            TemplateType::ProjectComments => "project_comments",
            TemplateType::ProjectAttachment => "project_attachment",
            TemplateType::TaskAssigned => "task_assigned",
            TemplateType::TaskUpdated => "task_updated",
            TemplateType::TaskComments => "task_comments",
            TemplateType::TaskAttachment => "task_attachment",
            TemplateType::DefectAssigned => "defect_assigned",
            TemplateType::DefectUpdated => "defect_updated",
            TemplateType::DefectComments => "defect_comments",
            TemplateType::DefectAttachment => "defect_attachment",
            TemplateType::IncidentAssigned => "incident_assigned",
            TemplateType::IncidentUpdated => "incident_updated",
            TemplateType::IncidentComments => "incident_comments",
            TemplateType::IncidentAttachment => "incident_attachment",
        }
    }

    /// アカウント系とお知らせは即時送信、それ以外のアクティビティ通知は遅延キュー投入。
    pub fn dispatch_mode(self) -> DispatchMode {
        match self {
            TemplateType::ActivateAccount
            | TemplateType::ChangeEmail
            | TemplateType::ResetPassword
            | TemplateType::ForgotPassword
            | TemplateType::WelcomeEmail
            | TemplateType::Announcement => DispatchMode::Immediate,
            _ => DispatchMode::Delayed,
        }
    }

    pub fn assigned(kind: WorkItemKind) -> Self {
        match kind {
            WorkItemKind::Task => TemplateType::TaskAssigned,
            WorkItemKind::Defect => TemplateType::DefectAssigned,
            WorkItemKind::Incident => TemplateType::IncidentAssigned,
        }
    }

    pub fn updated(kind: WorkItemKind) -> Self {
        match kind {
            WorkItemKind::Task => TemplateType::TaskUpdated,
            WorkItemKind::Defect => TemplateType::DefectUpdated,
            WorkItemKind::Incident => TemplateType::IncidentUpdated,
        }
    }

    pub fn comments(kind: WorkItemKind) -> Self {
        match kind {
            WorkItemKind::Task => TemplateType::TaskComments,
            WorkItemKind::Defect => TemplateType::DefectComments,
            WorkItemKind::Incident => TemplateType::IncidentComments,
        }
    }

    pub fn attachment(kind: WorkItemKind) -> Self {
        match kind {
            WorkItemKind::Task => TemplateType::TaskAttachment,
            WorkItemKind::Defect => TemplateType::DefectAttachment,
            WorkItemKind::Incident => TemplateType::IncidentAttachment,
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown template type: {0}")]
pub struct UnknownTemplateType(pub String);

impl FromStr for TemplateType {
    type Err = UnknownTemplateType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTemplateType(s.to_string()))
    }
}
