use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::TemplateType;

/// EmailTemplate は種別ごとに 1 件だけ存在する件名・本文テンプレート。
/// 通知処理からは読み取り専用で、置換は常にコピーに対して行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: i64,
    pub template_type: TemplateType,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmailTemplate {
    pub fn new(id: i64, template_type: TemplateType, subject: &str, body: &str) -> Self {
        let now = Utc::now();
        Self {
            id,
            template_type,
            subject: subject.to_string(),
            body: body.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}
