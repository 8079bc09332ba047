use std::sync::Arc;

use serde::Deserialize;

use crate::domain::entity::notification::{Recipient, SendResult};
use crate::domain::entity::user::User;
use crate::domain::service::Substitutions;
use crate::domain::value_object::{SiteConfig, TemplateType};
use crate::usecase::notify::{Envelope, NotifyUseCase};

/// AccountEmail はアカウント操作に伴って即時送信するメールの種類と引数。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AccountEmail {
    Activation {
        user_id: i64,
        password: String,
    },
    ChangeEmail {
        user_id: i64,
        new_email: String,
        new_email_token: String,
    },
    ChangePassword {
        user_id: i64,
        new_password: String,
    },
    ResetPassword {
        user_id: i64,
        new_password: String,
    },
    ForgotPassword {
        user_id: i64,
        reset_url: String,
    },
    Invite {
        user_id: i64,
    },
}

impl AccountEmail {
    /// 宛先となるユーザーの ID。
    pub fn user_id(&self) -> i64 {
        match self {
            AccountEmail::Activation { user_id, .. }
            | AccountEmail::ChangeEmail { user_id, .. }
            | AccountEmail::ChangePassword { user_id, .. }
            | AccountEmail::ResetPassword { user_id, .. }
            | AccountEmail::ForgotPassword { user_id, .. }
            | AccountEmail::Invite { user_id } => *user_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AccountEmail::Activation { .. } => "activation",
            AccountEmail::ChangeEmail { .. } => "change_email",
            AccountEmail::ChangePassword { .. } => "change_password",
            AccountEmail::ResetPassword { .. } => "reset_password",
            AccountEmail::ForgotPassword { .. } => "forgot_password",
            AccountEmail::Invite { .. } => "invite",
        }
    }
}

/// SendAccountEmailUseCase はアカウント操作に伴う即時送信メールを扱う。
///
/// 戻り値が None の場合はテンプレート未登録か宛先不備で送信していない。
pub struct SendAccountEmailUseCase {
    notify: Arc<NotifyUseCase>,
    site: SiteConfig,
}

impl SendAccountEmailUseCase {
    pub fn new(notify: Arc<NotifyUseCase>, site: SiteConfig) -> Self {
        Self { notify, site }
    }

    /// user は email.user_id() で解決済みのユーザー。
    pub async fn execute(&self, user: &User, email: &AccountEmail) -> Option<SendResult> {
        match email {
            AccountEmail::Activation { password, .. } => self.send_activation(user, password).await,
            AccountEmail::ChangeEmail {
                new_email,
                new_email_token,
                ..
            } => {
                self.send_change_email(user, new_email, new_email_token)
                    .await
            }
            AccountEmail::ChangePassword { new_password, .. } => {
                self.send_change_password(user, new_password).await
            }
            AccountEmail::ResetPassword { new_password, .. } => {
                self.send_reset_password(user, new_password).await
            }
            AccountEmail::ForgotPassword { reset_url, .. } => {
                self.send_forgot_password(user, reset_url).await
            }
            AccountEmail::Invite { .. } => self.send_invite(user).await,
        }
    }

    /// アカウント有効化メール。
    pub async fn send_activation(&self, user: &User, password: &str) -> Option<SendResult> {
        let code = user.email_verification_code.as_deref().unwrap_or_default();
        let subs = Substitutions::new()
            .with("{ACTIVATE_URL}", self.site.verify_url(code))
            .with("{ACTIVATION_PERIOD}", self.site.activation_period_hours())
            .with("{USERNAME}", user.username.as_str())
            .with("{EMAIL}", user.email.as_str())
            .with("{PASSWORD}", password)
            .with("{SITE_NAME}", self.site.company_name.as_str());
        self.send_one(TemplateType::ActivateAccount, Recipient::from_user(user), subs)
            .await
    }

    /// メールアドレス変更の確認メール。new_email_token は検証リンク末尾に付く呼び出し側生成のトークン。
    pub async fn send_change_email(
        &self,
        user: &User,
        new_email: &str,
        new_email_token: &str,
    ) -> Option<SendResult> {
        let code = user.email_verification_code.as_deref().unwrap_or_default();
        let key_url = format!("{}/{}", self.site.verify_url(code), new_email_token);
        let subs = Substitutions::new()
            .with("{NEW_EMAIL_KEY_URL}", key_url)
            .with("{SITE_URL}", self.site.front_url.as_str())
            .with("{NEW_EMAIL}", new_email)
            .with("{SITE_NAME}", self.site.company_name.as_str());
        let recipient = Recipient::new(new_email, &user.full_name());
        self.send_one(TemplateType::ChangeEmail, recipient, subs).await
    }

    /// 本人によるパスワード変更の通知。
    pub async fn send_change_password(&self, user: &User, new_password: &str) -> Option<SendResult> {
        let subs = Substitutions::new()
            .with("{USERNAME}", user.username.as_str())
            .with("{EMAIL}", user.email.as_str())
            .with("{NEW_PASSWORD}", new_password)
            .with("{SITE_NAME}", self.site.company_name.as_str());
        self.send_one(TemplateType::ResetPassword, Recipient::from_user(user), subs)
            .await
    }

    /// 管理者によるパスワードリセットの通知。宛名は名のみ。
    pub async fn send_reset_password(&self, user: &User, new_password: &str) -> Option<SendResult> {
        let subs = Substitutions::new()
            .with("{SITE_NAME}", self.site.company_name.as_str())
            .with("{USERNAME}", user.username.as_str())
            .with("{EMAIL}", user.email.as_str())
            .with("{NEW_PASSWORD}", new_password);
        let recipient = Recipient::new(&user.email, &user.firstname);
        self.send_one(TemplateType::ResetPassword, recipient, subs).await
    }

    /// パスワード再設定リンクの送付。
    pub async fn send_forgot_password(&self, user: &User, reset_url: &str) -> Option<SendResult> {
        let subs = Substitutions::new()
            .with("{SITE_URL}", self.site.app_url.as_str())
            .with("{PASS_KEY_URL}", reset_url)
            .with("{SITE_NAME}", self.site.company_name.as_str());
        self.send_one(TemplateType::ForgotPassword, Recipient::from_user(user), subs)
            .await
    }

    /// 招待メール。宛名は名のみ。
    pub async fn send_invite(&self, user: &User) -> Option<SendResult> {
        let subs = Substitutions::new()
            .with("{NAME}", user.full_name())
            .with("{COMPANY_URL}", self.site.profile_url(user.id))
            .with("{COMPANY_NAME}", self.site.company_name.as_str());
        let recipient = Recipient::new(&user.email, &user.firstname);
        self.send_one(TemplateType::WelcomeEmail, recipient, subs).await
    }

    async fn send_one(
        &self,
        template_type: TemplateType,
        recipient: Recipient,
        substitutions: Substitutions,
    ) -> Option<SendResult> {
        let outcomes = self
            .notify
            .execute(template_type, vec![Envelope::new(recipient, substitutions)])
            .await;
        outcomes.first().map(SendResult::from)
    }
}
