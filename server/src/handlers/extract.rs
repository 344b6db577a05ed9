use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::utils::error::{AppError, FieldError};

/// JSON body that has already passed its `validator` rules.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate().map_err(|errors| AppError::ValidationError(field_errors(&errors)))?;
        Ok(ValidatedJson(value))
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    AppError::ValidationError(vec![FieldError::body("body", rejection.body_text())])
}

/// Flattens validator output into one entry per violated rule, with field
/// names as the client sent them (camelCase).
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, violations)| {
            let name = camel_case(&field);
            violations.iter().map(move |violation| {
                let message = violation
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| violation.code.to_string());
                FieldError::body(name.clone(), message)
            })
        })
        .collect();

    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateEventRequest;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("start_time"), "startTime");
        assert_eq!(camel_case("title"), "title");
    }

    #[test]
    fn test_field_errors_use_client_names() {
        let request = CreateEventRequest {
            title: "Tech Talk".to_string(),
            description: "intro session".to_string(),
            start_time: "soon".to_string(),
            end_time: "2024-05-01T12:00:00Z".to_string(),
            venue: "Hall".to_string(),
        };

        let errors = request.validate().unwrap_err();
        let fields = field_errors(&errors);

        assert_eq!(
            fields,
            vec![
                FieldError::body(
                    "startTime",
                    "must be in format: YYYY-MM-DDTHH:mm:ss.000+05:00"
                ),
                FieldError::body("venue", "at least 5 characters"),
            ]
        );
    }
}
