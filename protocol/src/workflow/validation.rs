//! Local input validation. Nothing here touches the network.

use thiserror::Error;

use crate::config;
use crate::issuer::NewIssuerParams;

/// An input field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Name of the offending form field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn invalid(field: &str) -> Self {
        Self {
            field: field.to_string(),
            message: config::INVALID_FIELD_MESSAGE.to_string(),
        }
    }
}

/// One or more ASCII digits: no sign, no decimal point, no whitespace.
pub fn is_integer_amount(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit())
}

/// Check that `input` is an integer amount, reporting failures against
/// `field`.
pub fn validate_amount<'a>(field: &str, input: &'a str) -> Result<&'a str, ValidationError> {
    if is_integer_amount(input) {
        Ok(input)
    } else {
        Err(ValidationError::invalid(field))
    }
}

/// Check the parameters of a new issuer before submitting them.
pub fn validate_new_issuer(params: &NewIssuerParams) -> Result<(), ValidationError> {
    if params.token_symbol.trim().is_empty() {
        return Err(ValidationError::invalid(config::TOKEN_SYMBOL_FIELD));
    }
    validate_amount(config::INITIAL_SUPPLY_FIELD, &params.initial_supply)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_digits_are_valid() {
        assert!(is_integer_amount("1500"));
        assert!(is_integer_amount("0"));
        assert!(is_integer_amount("007"));
    }

    #[test]
    fn anything_else_is_invalid() {
        for input in ["15.0", "-5", "", "abc", "+5", " 5", "5 ", "1e3", "１２"] {
            assert!(!is_integer_amount(input), "{:?} should be invalid", input);
        }
    }

    #[test]
    fn validation_error_names_the_field() {
        let err = validate_amount(config::TRANSFER_AMOUNT_FIELD, "-5").unwrap_err();
        assert_eq!(err.field, config::TRANSFER_AMOUNT_FIELD);
        assert_eq!(err.to_string(), "transferAmount: Invalid");
    }

    #[test]
    fn new_issuer_params_checks_symbol_then_supply() {
        let mut params = NewIssuerParams {
            token_symbol: "  ".to_string(),
            initial_supply: "x".to_string(),
            ..NewIssuerParams::default()
        };
        assert_eq!(
            validate_new_issuer(&params).unwrap_err().field,
            config::TOKEN_SYMBOL_FIELD
        );

        params.token_symbol = "USDX".to_string();
        assert_eq!(
            validate_new_issuer(&params).unwrap_err().field,
            config::INITIAL_SUPPLY_FIELD
        );

        params.initial_supply = "1000000".to_string();
        assert!(validate_new_issuer(&params).is_ok());
    }
}
