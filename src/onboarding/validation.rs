//! Field-level validation rules shared by both wizard variants.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Field name (wire form) → message, as shown next to the field.
pub type FieldErrors = BTreeMap<&'static str, String>;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email regex"));

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://[a-z0-9-]+(\.[a-z0-9-]+)+(:\d+)?(/\S*)?$").expect("static url regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn is_valid_url(url: &str) -> bool {
    URL_RE.is_match(url.trim())
}

/// Non-empty after trimming.
pub fn require_text(errors: &mut FieldErrors, field: &'static str, value: Option<&str>) {
    match value {
        Some(v) if !v.trim().is_empty() => {}
        _ => {
            errors.insert(field, "This field is required".to_string());
        }
    }
}

/// An enumerated answer must have been picked.
pub fn require_choice<T>(errors: &mut FieldErrors, field: &'static str, value: Option<&T>) {
    if value.is_none() {
        errors.insert(field, "Please select an option".to_string());
    }
}

pub fn require_url(errors: &mut FieldErrors, field: &'static str, value: Option<&str>) {
    match value {
        Some(v) if v.trim().is_empty() => {
            errors.insert(field, "This field is required".to_string());
        }
        Some(v) if !is_valid_url(v) => {
            errors.insert(field, "Enter a valid URL (https://...)".to_string());
        }
        Some(_) => {}
        None => {
            errors.insert(field, "This field is required".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("  first.last+tag@mail.example.org "));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two words@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn url_syntax() {
        assert!(is_valid_url("https://acme.example"));
        assert!(is_valid_url("http://shop.acme.example:8080/store"));
        assert!(!is_valid_url("acme.example"));
        assert!(!is_valid_url("ftp://acme.example"));
        assert!(!is_valid_url("https://localhost"));
    }

    #[test]
    fn require_text_rejects_blank() {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "name", Some("   "));
        require_text(&mut errors, "other", None);
        assert_eq!(errors.len(), 2);

        let mut errors = FieldErrors::new();
        require_text(&mut errors, "name", Some("Acme"));
        assert!(errors.is_empty());
    }

    #[test]
    fn require_url_messages() {
        let mut errors = FieldErrors::new();
        require_url(&mut errors, "url", Some("not a url"));
        assert_eq!(errors["url"], "Enter a valid URL (https://...)");

        let mut errors = FieldErrors::new();
        require_url(&mut errors, "url", None);
        assert_eq!(errors["url"], "This field is required");
    }

    #[test]
    fn require_choice_flags_missing() {
        let mut errors = FieldErrors::new();
        require_choice::<u8>(&mut errors, "age", None);
        require_choice(&mut errors, "teamSize", Some(&1u8));
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec!["age"]);
    }
}
