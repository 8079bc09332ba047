use serde::{Deserialize, Serialize};

/// User はアカウント情報を表す。ロール判定に必要なフラグのみを保持する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
    #[serde(skip_serializing)]
    pub email_verification_code: Option<String>,
    pub is_client: bool,
    pub is_admin: bool,
    pub is_super_admin: bool,
}

impl User {
    pub fn new(id: i64, firstname: &str, lastname: &str, email: &str) -> Self {
        Self {
            id,
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            username: email.split('@').next().unwrap_or_default().to_string(),
            email: email.to_string(),
            avatar: None,
            email_verification_code: None,
            is_client: false,
            is_admin: false,
            is_super_admin: false,
        }
    }

    /// "firstname lastname" 形式の表示名を返す。
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// 管理者ロールまたはスーパー管理者であれば true。
    pub fn has_admin_access(&self) -> bool {
        self.is_admin || self.is_super_admin
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// UserSummary は一覧表示用にカラムを絞ったユーザー情報。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub avatar: Option<String>,
}

impl UserSummary {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}
