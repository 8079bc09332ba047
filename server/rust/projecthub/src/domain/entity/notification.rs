use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::user::User;

/// Recipient は宛先解決済みの通知先。メールアドレスを持たない宛先は配信対象外となる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: Option<String>,
    pub name: String,
}

impl Recipient {
    pub fn new(email: &str, name: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            name: name.to_string(),
        }
    }

    pub fn from_user(user: &User) -> Self {
        Self {
            email: Some(user.email.clone()),
            name: user.full_name(),
        }
    }

    /// 空でないメールアドレスを返す。空または未設定なら None。
    pub fn deliverable_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

/// OutgoingMail はメールトランスポートに渡す完成済みメッセージ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub html_body: String,
}

/// NotificationJob は宛先 1 件分の遅延送信ジョブ。
/// 識別子やリトライ回数は持たず、キュー側の管理に任せる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationJob {
    pub recipient_email: String,
    pub recipient_name: String,
    pub subject: String,
    pub body: String,
    pub delay: Duration,
}

impl NotificationJob {
    pub fn to_mail(&self) -> OutgoingMail {
        OutgoingMail {
            to_email: self.recipient_email.clone(),
            to_name: self.recipient_name.clone(),
            subject: self.subject.clone(),
            html_body: self.body.clone(),
        }
    }
}

/// SendResult は同期送信の結果。例外は送出せずこの値に変換する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendResult {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SendResult {
    pub fn ok() -> Self {
        Self {
            status: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: Some(message.into()),
        }
    }
}

/// DispatchOutcome は宛先ごとの配信結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 即時送信に成功した。
    Sent,
    /// 即時送信でトランスポートエラーが発生した。
    Failed(String),
    /// 遅延キューへ投入した。
    Queued,
    /// キュー投入に失敗し、通知は破棄された。
    Dropped(String),
}

impl DispatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Sent => "sent",
            DispatchOutcome::Failed(_) => "failed",
            DispatchOutcome::Queued => "queued",
            DispatchOutcome::Dropped(_) => "dropped",
        }
    }
}

impl From<&DispatchOutcome> for SendResult {
    fn from(outcome: &DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::Sent | DispatchOutcome::Queued => SendResult::ok(),
            DispatchOutcome::Failed(msg) | DispatchOutcome::Dropped(msg) => {
                SendResult::failed(msg.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_email_is_not_deliverable() {
        let missing = Recipient {
            email: None,
            name: "Nobody".to_string(),
        };
        let blank = Recipient::new("   ", "Blank");
        assert_eq!(missing.deliverable_email(), None);
        assert_eq!(blank.deliverable_email(), None);
        assert_eq!(
            Recipient::new("a@example.com", "A").deliverable_email(),
            Some("a@example.com")
        );
    }

    #[test]
    fn failed_result_serializes_status_and_message() {
        let json = serde_json::to_value(SendResult::failed("smtp down")).unwrap();
        assert_eq!(json, serde_json::json!({"status": false, "message": "smtp down"}));
        let ok = serde_json::to_value(SendResult::ok()).unwrap();
        assert_eq!(ok, serde_json::json!({"status": true}));
    }
}
