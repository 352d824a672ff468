//! Form-level validation rules. Each check reports the first rule that fails,
//! as a message ready to show next to the form.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AppError;

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const BIO_MAX_LENGTH: usize = 500;
pub const POST_BODY_MAX_LENGTH: usize = 1000;
pub const MAX_POST_IMAGES: usize = 4;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("valid email regex")
});

pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::validation("メールアドレスを入力してください"));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::validation(
            "有効なメールアドレスを入力してください",
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(AppError::validation(
            "パスワードは8文字以上で入力してください",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::validation(
            "パスワードには小文字を1文字以上含めてください",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::validation(
            "パスワードには大文字を1文字以上含めてください",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::validation(
            "パスワードには数字を1文字以上含めてください",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_punctuation()) {
        return Err(AppError::validation(
            "パスワードには記号を1文字以上含めてください",
        ));
    }
    Ok(())
}

/// Rejects missing or whitespace-only values, naming the field in the message.
pub fn require<'a>(value: Option<&'a str>, label: &str) -> Result<&'a str, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::validation(format!("{}を入力してください", label))),
    }
}

pub fn validate_bio(bio: Option<&str>) -> Result<(), AppError> {
    if let Some(bio) = bio {
        if bio.chars().count() > BIO_MAX_LENGTH {
            return Err(AppError::validation(
                "自己紹介は500文字以内で入力してください",
            ));
        }
    }
    Ok(())
}

pub fn validate_post_body(body: &str) -> Result<(), AppError> {
    if body.trim().is_empty() {
        return Err(AppError::validation("投稿内容を入力してください"));
    }
    if body.chars().count() > POST_BODY_MAX_LENGTH {
        return Err(AppError::validation(
            "投稿内容は1000文字以内で入力してください",
        ));
    }
    Ok(())
}

/// Parses an ISO `YYYY-MM-DD` birthday.
pub fn parse_birthday(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation("生年月日の形式が正しくありません"))
}

/// Builds an ISO birthday from separate year/month/day form parts.
pub fn birthday_from_parts(year: &str, month: &str, day: &str) -> Result<String, AppError> {
    let parse = |s: &str| s.trim().parse::<u32>().ok();
    match (parse(year), parse(month), parse(day)) {
        (Some(y), Some(m), Some(d)) => {
            let date = NaiveDate::from_ymd_opt(y as i32, m, d)
                .ok_or_else(|| AppError::validation("生年月日の形式が正しくありません"))?;
            Ok(date.format("%Y-%m-%d").to_string())
        }
        _ => Err(AppError::validation("生年月日の形式が正しくありません")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), AppError>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn password_rules_report_first_failure() {
        assert_eq!(
            message(validate_password("Weak1!")),
            "パスワードは8文字以上で入力してください"
        );
        assert_eq!(
            message(validate_password("STRONG1!")),
            "パスワードには小文字を1文字以上含めてください"
        );
        assert_eq!(
            message(validate_password("strong1!")),
            "パスワードには大文字を1文字以上含めてください"
        );
        assert_eq!(
            message(validate_password("Strongg!")),
            "パスワードには数字を1文字以上含めてください"
        );
        assert_eq!(
            message(validate_password("Strong12")),
            "パスワードには記号を1文字以上含めてください"
        );
        assert!(validate_password("Strong1!").is_ok());
    }

    #[test]
    fn email_must_be_present_and_well_formed() {
        assert_eq!(
            message(validate_email("  ")),
            "メールアドレスを入力してください"
        );
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("a@example").is_err());
        assert!(validate_email("a@example.com").is_ok());
    }

    #[test]
    fn bio_limit_is_inclusive() {
        let exact: String = "あ".repeat(BIO_MAX_LENGTH);
        let over: String = "あ".repeat(BIO_MAX_LENGTH + 1);
        assert!(validate_bio(Some(&exact)).is_ok());
        assert_eq!(
            message(validate_bio(Some(&over))),
            "自己紹介は500文字以内で入力してください"
        );
        assert!(validate_bio(None).is_ok());
    }

    #[test]
    fn birthday_parts_are_normalised() {
        assert_eq!(birthday_from_parts("1990", "4", "1").unwrap(), "1990-04-01");
        assert!(birthday_from_parts("1990", "2", "30").is_err());
        assert!(parse_birthday("1990-13-01").is_err());
        assert_eq!(
            parse_birthday("1990-04-01").unwrap(),
            NaiveDate::from_ymd_opt(1990, 4, 1).unwrap()
        );
    }

    #[test]
    fn require_trims_and_names_the_field() {
        assert_eq!(require(Some(" 山田 "), "姓").unwrap(), "山田");
        assert_eq!(
            require(Some("   "), "姓").unwrap_err().to_string(),
            "姓を入力してください"
        );
        assert!(require(None, "名").is_err());
    }
}
