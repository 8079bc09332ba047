use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;
use crate::domain::entity::email_template::EmailTemplate;
use crate::domain::value_object::TemplateType;
use crate::usecase::update_template::UpdateTemplateInput;

// --- Request / Response DTOs ---

#[derive(Debug, Serialize)]
pub struct TemplateResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub template_type: String,
    pub template_subject: String,
    pub template_body: String,
    pub updated_at: String,
}

impl From<EmailTemplate> for TemplateResponse {
    fn from(t: EmailTemplate) -> Self {
        Self {
            id: t.id,
            template_type: t.template_type.to_string(),
            template_subject: t.subject,
            template_body: t.body,
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListTemplatesResponse {
    pub templates: Vec<TemplateResponse>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTemplateRequest {
    pub template_subject: Option<String>,
    pub template_body: Option<String>,
}

fn parse_type(raw: &str) -> Result<TemplateType, ApiError> {
    raw.parse::<TemplateType>()
        .map_err(|e| ApiError::NotFound(e.to_string()))
}

/// GET /api/v1/email-templates
pub async fn list_templates(
    State(state): State<AppState>,
) -> Result<Json<ListTemplatesResponse>, ApiError> {
    let templates = state.list_templates_uc.execute().await?;
    Ok(Json(ListTemplatesResponse {
        templates: templates.into_iter().map(TemplateResponse::from).collect(),
    }))
}

/// GET /api/v1/email-templates/{template_type}
pub async fn get_template(
    State(state): State<AppState>,
    Path(raw_type): Path<String>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let template_type = parse_type(&raw_type)?;
    let template = state.get_template_uc.execute(template_type).await?;
    Ok(Json(template.into()))
}

/// PUT /api/v1/email-templates/{template_type}
pub async fn update_template(
    State(state): State<AppState>,
    Path(raw_type): Path<String>,
    Json(req): Json<UpdateTemplateRequest>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let input = UpdateTemplateInput {
        template_type: parse_type(&raw_type)?,
        subject: req.template_subject,
        body: req.template_body,
    };
    let template = state.update_template_uc.execute(&input).await?;
    Ok(Json(template.into()))
}
