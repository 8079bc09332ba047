use std::sync::Arc;

use serde::Deserialize;

use crate::domain::entity::notification::{DispatchOutcome, Recipient};
use crate::domain::entity::schedule::{
    titled_subject, Announcement, Appointment, Meeting, DATE_FORMAT, DATE_TIME_FORMAT, TIME_FORMAT,
};
use crate::domain::entity::user::User;
use crate::domain::repository::{SettingRepository, UserRepository};
use crate::domain::service::Substitutions;
use crate::domain::value_object::{SiteConfig, TemplateType};
use crate::usecase::notify::{Envelope, NotifyUseCase};

/// ScheduleEvent は会議・予定・お知らせの通知要求。event はテンプレート種別と同じ名前を使う。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScheduleEvent {
    Meeting {
        user_ids: Vec<i64>,
        meeting: Meeting,
    },
    CancelMeeting {
        user_ids: Vec<i64>,
        meeting: Meeting,
    },
    AppointmentMail {
        user_ids: Vec<i64>,
        appointment: Appointment,
    },
    Announcement {
        user_ids: Vec<i64>,
        announcement: Announcement,
    },
}

impl ScheduleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ScheduleEvent::Meeting { .. } => "meeting",
            ScheduleEvent::CancelMeeting { .. } => "cancel_meeting",
            ScheduleEvent::AppointmentMail { .. } => "appointment_mail",
            ScheduleEvent::Announcement { .. } => "announcement",
        }
    }
}

/// SendScheduleNotificationUseCase は会議・予定・お知らせの通知を扱う。
/// 件名は「タイトル + 開始日時」で組み立て、テンプレートの件名は使わない。
pub struct SendScheduleNotificationUseCase {
    notify: Arc<NotifyUseCase>,
    user_repo: Arc<dyn UserRepository>,
    setting_repo: Arc<dyn SettingRepository>,
    site: SiteConfig,
}

impl SendScheduleNotificationUseCase {
    pub fn new(
        notify: Arc<NotifyUseCase>,
        user_repo: Arc<dyn UserRepository>,
        setting_repo: Arc<dyn SettingRepository>,
        site: SiteConfig,
    ) -> Self {
        Self {
            notify,
            user_repo,
            setting_repo,
            site,
        }
    }

    pub async fn execute(&self, event: &ScheduleEvent) -> Vec<DispatchOutcome> {
        match event {
            ScheduleEvent::Meeting { user_ids, meeting } => {
                self.notify_meeting(user_ids, meeting).await
            }
            ScheduleEvent::CancelMeeting { user_ids, meeting } => {
                self.notify_meeting_cancelled(user_ids, meeting).await
            }
            ScheduleEvent::AppointmentMail {
                user_ids,
                appointment,
            } => self.notify_appointment(user_ids, appointment).await,
            ScheduleEvent::Announcement {
                user_ids,
                announcement,
            } => self.notify_announcement(user_ids, announcement).await,
        }
    }

    pub async fn notify_meeting(&self, user_ids: &[i64], meeting: &Meeting) -> Vec<DispatchOutcome> {
        self.meeting_mail(TemplateType::Meeting, user_ids, meeting).await
    }

    pub async fn notify_meeting_cancelled(
        &self,
        user_ids: &[i64],
        meeting: &Meeting,
    ) -> Vec<DispatchOutcome> {
        self.meeting_mail(TemplateType::CancelMeeting, user_ids, meeting)
            .await
    }

    pub async fn notify_appointment(
        &self,
        user_ids: &[i64],
        appointment: &Appointment,
    ) -> Vec<DispatchOutcome> {
        let users = self.load_users(user_ids).await;
        let at = appointment.start_date_time;
        let subject = titled_subject(&appointment.title, &at);
        let envelopes = users
            .iter()
            .map(|user| {
                let subs = Substitutions::new()
                    .with("{COMPANY_NAME}", self.site.company_name.as_str())
                    .with("{NAME}", user.full_name())
                    .with("{APPOINTEMENT_DATE}", at.format(DATE_FORMAT).to_string())
                    .with("{APPOINTEMENT_TIME}", at.format(TIME_FORMAT).to_string())
                    .with("{DESCRIPTION}", appointment.note.as_str())
                    .with("{LOCATION}", appointment.location.as_str());
                Envelope::new(Recipient::from_user(user), subs).with_subject(subject.clone())
            })
            .collect();
        self.notify
            .execute(TemplateType::AppointmentMail, envelopes)
            .await
    }

    /// お知らせ通知。設定で無効化されている場合は何も送らない。
    pub async fn notify_announcement(
        &self,
        user_ids: &[i64],
        announcement: &Announcement,
    ) -> Vec<DispatchOutcome> {
        match self.setting_repo.announcement_notification_enabled().await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!("announcement notifications disabled");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read announcement setting; nothing sent");
                return Vec::new();
            }
        }

        let users = self.load_users(user_ids).await;
        let subject = titled_subject(&announcement.title, &announcement.start_date);
        let start = announcement.start_date.format(DATE_TIME_FORMAT).to_string();
        let end = announcement.end_date.format(DATE_TIME_FORMAT).to_string();
        let envelopes = users
            .iter()
            .map(|user| {
                let subs = Substitutions::new()
                    .with("{COMPANY_NAME}", self.site.company_name.as_str())
                    .with("{NAME}", user.full_name())
                    .with("{TITLE}", announcement.title.as_str())
                    .with("{START_DATE}", start.as_str())
                    .with("{END_DATE}", end.as_str())
                    .with("{DESCRIPTION}", announcement.description.as_str());
                Envelope::new(Recipient::from_user(user), subs).with_subject(subject.clone())
            })
            .collect();
        self.notify.execute(TemplateType::Announcement, envelopes).await
    }

    async fn meeting_mail(
        &self,
        template_type: TemplateType,
        user_ids: &[i64],
        meeting: &Meeting,
    ) -> Vec<DispatchOutcome> {
        let users = self.load_users(user_ids).await;
        let at = meeting.start_date;
        let subject = titled_subject(&meeting.title, &at);
        let envelopes = users
            .iter()
            .map(|user| {
                let subs = Substitutions::new()
                    .with("{COMPANY_NAME}", self.site.company_name.as_str())
                    .with("{NAME}", user.full_name())
                    .with("{MEETING_DATE}", at.format(DATE_FORMAT).to_string())
                    .with("{MEETING_TIME}", at.format(TIME_FORMAT).to_string())
                    .with("{DESCRIPTION}", meeting.description.as_str())
                    .with("{LOCATION}", meeting.location.as_str());
                Envelope::new(Recipient::from_user(user), subs).with_subject(subject.clone())
            })
            .collect();
        self.notify.execute(template_type, envelopes).await
    }

    async fn load_users(&self, user_ids: &[i64]) -> Vec<User> {
        if user_ids.is_empty() {
            return Vec::new();
        }
        self.user_repo
            .find_by_ids(user_ids)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to load recipients; nothing sent");
                Vec::new()
            })
    }
}
