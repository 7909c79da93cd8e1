use garde::Validate;

use crate::error::{AppError, Result};

/// Runs `garde` validation on a request payload.
///
/// # Arguments
///
/// * `payload` - The deserialized request body.
///
/// # Returns
///
/// A `Result<()>`; the error lists every failing field.
pub fn validate_payload<T>(payload: &T) -> Result<()>
where
    T: Validate,
    T::Context: Default,
{
    payload
        .validate()
        .map_err(|report| AppError::Validation(report.to_string().trim().to_string()))
}

/// Canonical form of an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Signup {
        #[garde(email)]
        email: String,
        #[garde(length(min = 8, max = 128))]
        password: String,
    }

    #[test]
    fn accepts_valid_payload() {
        let payload = Signup {
            email: "walt@breakingbad.com".to_string(),
            password: "correcthorse".to_string(),
        };
        assert!(validate_payload(&payload).is_ok());
    }

    #[test]
    fn reports_bad_fields() {
        let payload = Signup {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        match validate_payload(&payload) {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("email"));
                assert!(msg.contains("password"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn normalizes_email() {
        assert_eq!(normalize_email("  Walt@BreakingBad.com "), "walt@breakingbad.com");
    }
}
