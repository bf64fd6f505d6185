//! Submission payload and boundary validation.
//!
//! Field names are English; the Portuguese names used by the existing web
//! client are accepted as aliases.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::answers::{AnswerSheet, ANSWER_COUNT};
use crate::calendar::{age_on, elapsed_hms, parse_date, ZERO_DURATION};
use crate::classify::classify;
use crate::error::{FieldError, Result, TemperamentError};
use crate::types::NewReportRecord;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default, alias = "usuario_id")]
    pub user_id: Option<Value>,
    #[serde(default, alias = "nome")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, alias = "telefone")]
    pub phone: Option<String>,
    #[serde(default, alias = "data_nascimento")]
    pub birth_date: Option<String>,
    /// Defaults to the submission day.
    #[serde(default, alias = "data_teste")]
    pub test_date: Option<String>,
    #[serde(default, alias = "inicio")]
    pub started_at: Option<String>,
    #[serde(default, alias = "fim")]
    pub finished_at: Option<String>,
    /// Precomputed duration sent by older clients without start/end times.
    #[serde(default, alias = "tempo_teste")]
    pub test_duration: Option<Value>,
    #[serde(default, alias = "aceite_termos")]
    pub consent_terms: bool,
    #[serde(default, alias = "aceite_contato")]
    pub consent_contact: bool,
    /// Non-string tokens are kept as non-votes.
    #[serde(default, alias = "respostas")]
    pub answers: Option<Vec<Value>>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Numbers and strings both identify a user.
fn value_text(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn token(value: &Value) -> &str {
    value.as_str().unwrap_or("")
}

impl SubmissionRequest {
    /// Checks every field, classifies the answers and derives age and
    /// duration. All field problems are reported together.
    pub fn validate(&self, today: NaiveDate) -> Result<NewReportRecord> {
        let mut errors = Vec::new();
        let mut required = |field: &str, value: Option<&str>| -> Option<String> {
            if value.is_none() {
                errors.push(FieldError::new(field, "is required"));
            }
            value.map(str::to_string)
        };

        let user_id = value_text(&self.user_id);
        if user_id.is_none() {
            required("user_id", None);
        }
        let name = required("name", present(&self.name));
        let email = required("email", present(&self.email));
        let birth_raw = required("birth_date", present(&self.birth_date));

        let birth_date = birth_raw.as_deref().and_then(|raw| {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                errors.push(FieldError::new("birth_date", "is not a valid date"));
            }
            parsed
        });

        let test_date = match present(&self.test_date) {
            None => Some(today),
            Some(raw) => {
                let parsed = parse_date(raw);
                if parsed.is_none() {
                    errors.push(FieldError::new("test_date", "is not a valid date"));
                }
                parsed
            }
        };

        let tokens: Option<Vec<&str>> = match &self.answers {
            None => {
                errors.push(FieldError::new("answers", "is required"));
                None
            }
            Some(answers) if answers.len() != ANSWER_COUNT => {
                errors.push(FieldError::new(
                    "answers",
                    format!("expected {} answers, got {}", ANSWER_COUNT, answers.len()),
                ));
                None
            }
            Some(answers) => Some(answers.iter().map(token).collect()),
        };

        let (
            Some(user_id),
            Some(name),
            Some(email),
            Some(birth_date),
            Some(test_date),
            Some(tokens),
        ) = (user_id, name, email, birth_date, test_date, tokens)
        else {
            return Err(TemperamentError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(TemperamentError::Validation(errors));
        }

        let sheet = AnswerSheet::parse(&tokens)?;
        let non_votes = sheet.non_votes();
        if non_votes > 0 {
            warn!(user_id = %user_id, non_votes, "unrecognized answer tokens counted as non-votes");
        }
        let classification = classify(&sheet);
        info!(
            user_id = %user_id,
            temperament = %classification.temperament,
            subtemperament = %classification.subtemperament,
            "answers classified"
        );

        let started_at = present(&self.started_at).map(str::to_string);
        let finished_at = present(&self.finished_at).map(str::to_string);
        let test_duration = match (&started_at, &self.test_duration) {
            (Some(_), _) | (_, None) => elapsed_hms(started_at.as_deref(), finished_at.as_deref()),
            (None, Some(Value::String(legacy))) if !legacy.trim().is_empty() => {
                legacy.trim().to_string()
            }
            (None, Some(_)) => ZERO_DURATION.to_string(),
        };

        Ok(NewReportRecord {
            user_id,
            name,
            email,
            phone: present(&self.phone).map(str::to_string),
            age: age_on(birth_date, test_date),
            birth_date,
            test_date,
            started_at,
            finished_at,
            test_duration,
            consent_terms: self.consent_terms,
            consent_contact: self.consent_contact,
            classification,
        })
    }
}
