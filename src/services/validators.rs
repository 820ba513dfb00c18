use std::sync::LazyLock;

use regex::Regex;

pub const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];
pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("valid regex"));

// Indian mobile number: optional +91/91/0 prefix, 10 digits starting 6-9.
static CONTACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\+91|91|0)?[6-9]\d{9}$").expect("valid regex"));

/// A field rule rejection. Always recoverable: the conversation re-emits the
/// same prompt and stays in the same state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter your name using letters and spaces only.")]
    InvalidName,

    #[error("Please select your blood group from the options shown.")]
    InvalidBloodGroup,

    #[error("Please enter a valid age (1-120).")]
    InvalidAge,

    #[error("Please select your gender from the options shown.")]
    InvalidGender,

    #[error("Please enter a valid mobile number (e.g., 9876543210 or +919876543210).")]
    InvalidContact,
}

pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() || !NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidName);
    }
    Ok(name.to_string())
}

pub fn validate_blood_group(raw: &str) -> Result<String, ValidationError> {
    let group = raw.trim().to_uppercase();
    BLOOD_GROUPS
        .iter()
        .find(|g| **g == group)
        .map(|g| g.to_string())
        .ok_or(ValidationError::InvalidBloodGroup)
}

pub fn validate_age(raw: &str) -> Result<u8, ValidationError> {
    let age = raw.trim();
    if age.is_empty() || !age.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidAge);
    }
    match age.parse::<u32>() {
        Ok(n) if (1..=120).contains(&n) => Ok(n as u8),
        _ => Err(ValidationError::InvalidAge),
    }
}

pub fn validate_gender(raw: &str) -> Result<String, ValidationError> {
    let gender = raw.trim();
    GENDERS
        .iter()
        .find(|g| g.eq_ignore_ascii_case(gender))
        .map(|g| g.to_string())
        .ok_or(ValidationError::InvalidGender)
}

/// Accepts any prefix variant and normalizes to the trailing 10 digits.
pub fn validate_contact(raw: &str) -> Result<String, ValidationError> {
    let contact = raw.trim();
    if !CONTACT_RE.is_match(contact) {
        return Err(ValidationError::InvalidContact);
    }
    let digits: String = contact.chars().filter(|c| c.is_ascii_digit()).collect();
    Ok(digits[digits.len() - 10..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_accepts_letters_and_spaces() {
        assert_eq!(validate_name("Asha Mehta").unwrap(), "Asha Mehta");
        assert_eq!(validate_name("  Ravi  ").unwrap(), "Ravi");
    }

    #[test]
    fn test_name_rejects_digits_and_empty() {
        assert_eq!(validate_name("R2D2"), Err(ValidationError::InvalidName));
        assert_eq!(validate_name(""), Err(ValidationError::InvalidName));
        assert_eq!(validate_name("   "), Err(ValidationError::InvalidName));
        assert_eq!(validate_name("a@b"), Err(ValidationError::InvalidName));
    }

    #[test]
    fn test_blood_group_case_insensitive() {
        assert_eq!(validate_blood_group("ab+").unwrap(), "AB+");
        assert_eq!(validate_blood_group("o-").unwrap(), "O-");
        assert_eq!(validate_blood_group("B+").unwrap(), "B+");
    }

    #[test]
    fn test_blood_group_rejects_unknown() {
        assert!(validate_blood_group("C+").is_err());
        assert!(validate_blood_group("AB").is_err());
        assert!(validate_blood_group("").is_err());
    }

    #[test]
    fn test_age_bounds() {
        assert_eq!(validate_age("1").unwrap(), 1);
        assert_eq!(validate_age("120").unwrap(), 120);
        assert_eq!(validate_age("0"), Err(ValidationError::InvalidAge));
        assert_eq!(validate_age("121"), Err(ValidationError::InvalidAge));
        assert_eq!(validate_age("150"), Err(ValidationError::InvalidAge));
    }

    #[test]
    fn test_age_digits_only() {
        assert_eq!(validate_age("30"), Ok(30));
        assert_eq!(validate_age("-5"), Err(ValidationError::InvalidAge));
        assert_eq!(validate_age("thirty"), Err(ValidationError::InvalidAge));
        assert_eq!(validate_age("3.5"), Err(ValidationError::InvalidAge));
        assert_eq!(validate_age(""), Err(ValidationError::InvalidAge));
    }

    #[test]
    fn test_gender_normalizes_case() {
        assert_eq!(validate_gender("male").unwrap(), "Male");
        assert_eq!(validate_gender("FEMALE").unwrap(), "Female");
        assert_eq!(validate_gender("other").unwrap(), "Other");
        assert!(validate_gender("unknown").is_err());
    }

    #[test]
    fn test_contact_prefix_variants_normalize_to_last_ten() {
        for raw in ["9876543210", "+919876543210", "919876543210", "09876543210"] {
            assert_eq!(validate_contact(raw).unwrap(), "9876543210", "raw: {raw}");
        }
    }

    #[test]
    fn test_contact_rejects_bad_numbers() {
        // leading digit must be 6-9
        assert!(validate_contact("5876543210").is_err());
        // wrong length
        assert!(validate_contact("987654321").is_err());
        assert!(validate_contact("98765432100").is_err());
        // non-digits
        assert!(validate_contact("98765abcde").is_err());
        assert!(validate_contact("").is_err());
    }
}
