use validator::{Validate, ValidationErrors};

use crate::domain::{Failure, FieldDetail, ValidationFailure};

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        ValidationFailure::from(&errors)
    }
}

impl From<&ValidationErrors> for ValidationFailure {
    fn from(errors: &ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|(a, _), (b, _)| a.cmp(b));

        let details = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|cow| cow.to_string())
                        .unwrap_or_else(|| format!("\"{}\" failed {} check", field, error.code));
                    FieldDetail::new(field.to_string(), error.code.to_string(), message)
                })
            })
            .collect();

        ValidationFailure::new("", details)
    }
}

impl From<ValidationErrors> for Failure {
    fn from(errors: ValidationErrors) -> Self {
        Failure::Validation(ValidationFailure::from(&errors))
    }
}

/// Validate a payload, reporting problems as a validation failure
pub fn validate_payload<T>(payload: &T) -> Result<(), Failure>
where
    T: Validate,
{
    payload.validate().map_err(Failure::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct SignupRequest {
        #[validate(length(min = 1, message = "\"name\" is not allowed to be empty"))]
        name: String,
        #[validate(email)]
        email: String,
        #[validate(range(min = 18))]
        age: u32,
    }

    fn valid() -> SignupRequest {
        SignupRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            age: 36,
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(validate_payload(&valid()).is_ok());
    }

    #[test]
    fn test_details_sorted_by_field() {
        let request = SignupRequest {
            name: String::new(),
            email: "not-an-email".to_string(),
            age: 3,
        };

        let failure = ValidationFailure::from(request.validate().unwrap_err());
        let paths: Vec<_> = failure.details.iter().map(|d| d.path.as_str()).collect();

        assert_eq!(paths, vec!["age", "email", "name"]);
        assert_eq!(failure.details[1].kind, "email");
        assert_eq!(failure.details[2].message, "\"name\" is not allowed to be empty");
    }

    #[test]
    fn test_message_joins_field_messages() {
        let request = SignupRequest {
            name: String::new(),
            ..valid()
        };

        let failure = validate_payload(&request).unwrap_err();

        assert_eq!(
            failure.to_string(),
            "ValidationError: \"name\" is not allowed to be empty"
        );
    }

    #[test]
    fn test_default_message_names_the_rule() {
        let request = SignupRequest { age: 1, ..valid() };

        let failure = ValidationFailure::from(request.validate().unwrap_err());

        assert_eq!(failure.details.len(), 1);
        assert_eq!(failure.details[0].message, "\"age\" failed range check");
        assert_eq!(failure.details[0].kind, "range");
    }
}
