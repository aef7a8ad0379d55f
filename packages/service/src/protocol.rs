//! JSON-lines request protocol.
//!
//! One request object per line, tagged by `op`; one response envelope per
//! line, `{"success":true,"data":...}` or
//! `{"success":false,"error":"...","code":"..."}`.

use chrono::{DateTime, Utc};
use pedagogy_algo::{ContentContext, ItemParams};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ServiceError;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Sanitize {
        text: String,
        #[serde(default)]
        context: ContentContext,
    },
    #[serde(rename_all = "camelCase")]
    ValidateSubmission { title: String, description: String },
    #[serde(rename_all = "camelCase")]
    AddItem { item_id: String, params: ItemParams },
    #[serde(rename_all = "camelCase")]
    Grade {
        learner_id: String,
        item_id: String,
        is_correct: bool,
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    #[serde(rename_all = "camelCase")]
    NextItem { learner_id: String },
    #[serde(rename_all = "camelCase")]
    Award {
        learner_id: String,
        points: u32,
        #[serde(default)]
        at: Option<DateTime<Utc>>,
    },
    #[serde(rename_all = "camelCase")]
    Learner { learner_id: String },
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sanitize { .. } => "sanitize",
            Self::ValidateSubmission { .. } => "validate_submission",
            Self::AddItem { .. } => "add_item",
            Self::Grade { .. } => "grade",
            Self::NextItem { .. } => "next_item",
            Self::Award { .. } => "award",
            Self::Learner { .. } => "learner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Response {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn error(err: &ServiceError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
            code: Some(err.code().to_string()),
        }
    }
}

/// Parse and execute one line. Never fails; errors become envelopes.
pub fn handle_line(state: &AppState, line: &str) -> Response {
    let result = serde_json::from_str::<Request>(line)
        .map_err(ServiceError::from)
        .and_then(|request| handle(state, request));
    match result {
        Ok(data) => Response::ok(data),
        Err(err) => {
            tracing::warn!(error = %err, code = err.code(), "request failed");
            Response::error(&err)
        }
    }
}

pub fn handle(state: &AppState, request: Request) -> Result<Value, ServiceError> {
    tracing::debug!(op = request.name(), "handling request");
    let data = match request {
        Request::Sanitize { text, context } => {
            serde_json::to_value(state.compliance().check(&text, &context))?
        }
        Request::ValidateSubmission { title, description } => {
            serde_json::to_value(state.compliance().validate_listing(&title, &description))?
        }
        Request::AddItem { item_id, params } => {
            state.assessment().add_item(item_id.clone(), params)?;
            serde_json::json!({ "itemId": item_id })
        }
        Request::Grade {
            learner_id,
            item_id,
            is_correct,
            at,
        } => {
            let now = at.unwrap_or_else(Utc::now);
            let record = state
                .assessment()
                .grade_attempt(&learner_id, &item_id, is_correct, now)?;
            serde_json::to_value(record)?
        }
        Request::NextItem { learner_id } => {
            serde_json::to_value(state.assessment().next_item(&learner_id))?
        }
        Request::Award {
            learner_id,
            points,
            at,
        } => {
            let now = at.unwrap_or_else(Utc::now);
            serde_json::to_value(state.rewards().award(&learner_id, points, now))?
        }
        Request::Learner { learner_id } => {
            serde_json::to_value(state.learners().snapshot(&learner_id))?
        }
    };
    Ok(data)
}
