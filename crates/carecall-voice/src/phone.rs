use crate::error::VoiceError;

/// Longest number E.164 allows, excluding the leading `+`.
const MAX_E164_DIGITS: usize = 15;

/// Trims `raw` and checks it is an E.164 number: `+` followed by up to 15
/// digits. Returns the trimmed number.
pub fn validate_e164(raw: &str) -> Result<String, VoiceError> {
    let number = raw.trim();
    let Some(digits) = number.strip_prefix('+') else {
        return Err(VoiceError::InvalidPhoneNumber(
            "phone number must start with '+' (E.164 format)".to_string(),
        ));
    };

    if digits.is_empty() || digits.len() > MAX_E164_DIGITS {
        return Err(VoiceError::InvalidPhoneNumber(format!(
            "phone number must have 1 to {MAX_E164_DIGITS} digits after '+'"
        )));
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(VoiceError::InvalidPhoneNumber(
            "phone number may only contain digits after '+'".to_string(),
        ));
    }

    Ok(number.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_e164_numbers() {
        assert_eq!(validate_e164("+821012345678").unwrap(), "+821012345678");
        assert_eq!(validate_e164("  +15551234567\n").unwrap(), "+15551234567");
    }

    #[test]
    fn rejects_missing_plus() {
        let err = validate_e164("0212345678").unwrap_err();
        assert!(err.to_string().contains("must start with '+'"), "got: {err}");
    }

    #[test]
    fn rejects_bad_digits() {
        assert!(validate_e164("+").is_err());
        assert!(validate_e164("+82-10-1234").is_err());
        assert!(validate_e164("+1234567890123456").is_err());
    }
}
