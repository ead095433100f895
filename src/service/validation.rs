//! Syntax rules for sign-up and profile fields. Pure, no I/O.

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 32;
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 128;
const EMAIL_MAX: usize = 254;

pub fn validate_username(username: &str) -> bool {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return false;
    }

    let mut chars = username.chars();
    let starts_alphanumeric = chars.next().is_some_and(|ch| ch.is_ascii_alphanumeric());
    starts_alphanumeric
        && chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
}

pub fn validate_password(password: &str) -> bool {
    let len = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return false;
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;
    for ch in password.chars() {
        if ch.is_ascii_uppercase() {
            has_upper = true;
        } else if ch.is_ascii_lowercase() {
            has_lower = true;
        } else if ch.is_ascii_digit() {
            has_digit = true;
        } else if !ch.is_whitespace() {
            has_special = true;
        }
    }
    has_upper && has_lower && has_digit && has_special
}

pub fn validate_email(email_address: &str) -> bool {
    if email_address.len() > EMAIL_MAX || email_address.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email_address.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
