use serde::{Deserialize, Serialize};

/// SiteConfig はメール本文に埋め込むサイト名とベース URL。
/// 通知処理には起動時に一度だけ注入し、グローバルな設定参照は行わない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_company_name")]
    pub company_name: String,
    /// バックエンドのベース URL（検証リンク用）。
    pub app_url: String,
    /// フロントエンドのベース URL（詳細画面リンク用）。
    pub front_url: String,
    #[serde(default = "default_activation_expire_secs")]
    pub activation_expire_secs: u32,
}

fn default_company_name() -> String {
    "projecthub".to_string()
}

fn default_activation_expire_secs() -> u32 {
    86_400
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), url::ParseError> {
        url::Url::parse(&self.app_url)?;
        url::Url::parse(&self.front_url)?;
        Ok(())
    }

    /// `<front>/#/<area>/detail/<id>`
    pub fn detail_url(&self, area: &str, id: i64) -> String {
        format!("{}/#/{}/detail/{}", trim(&self.front_url), area, id)
    }

    /// `<front>/#/users/profile/<id>`
    pub fn profile_url(&self, user_id: i64) -> String {
        format!("{}/#/users/profile/{}", trim(&self.front_url), user_id)
    }

    /// `<app>/api/verify/user/<code>`
    pub fn verify_url(&self, code: &str) -> String {
        format!("{}/api/verify/user/{}", trim(&self.app_url), code)
    }

    /// 有効期限を時間単位で表す。割り切れない場合は小数で返す。
    pub fn activation_period_hours(&self) -> String {
        let secs = self.activation_expire_secs;
        if secs % 3600 == 0 {
            (secs / 3600).to_string()
        } else {
            (f64::from(secs) / 3600.0).to_string()
        }
    }
}

fn trim(base: &str) -> &str {
    base.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            company_name: "Acme".to_string(),
            app_url: "https://api.example.com/".to_string(),
            front_url: "https://app.example.com".to_string(),
            activation_expire_secs: 86_400,
        }
    }

    #[test]
    fn urls_are_built_without_double_slashes() {
        let s = site();
        assert_eq!(
            s.detail_url("defects", 7),
            "https://app.example.com/#/defects/detail/7"
        );
        assert_eq!(s.profile_url(3), "https://app.example.com/#/users/profile/3");
        assert_eq!(s.verify_url("abc"), "https://api.example.com/api/verify/user/abc");
    }

    #[test]
    fn activation_period_hours() {
        let mut s = site();
        assert_eq!(s.activation_period_hours(), "24");
        s.activation_expire_secs = 5400;
        assert_eq!(s.activation_period_hours(), "1.5");
    }

    #[test]
    fn validate_rejects_relative_urls() {
        let mut s = site();
        assert!(s.validate().is_ok());
        s.front_url = "not a url".to_string();
        assert!(s.validate().is_err());
    }
}
