//! Parsing for the new-order and reply prompts.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("expected \"customer, amount\"")]
    MissingAmount,
    #[error("customer name is empty")]
    MissingCustomer,
    #[error("'{0}' is not an amount")]
    BadAmount(String),
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("message is empty")]
    EmptyMessage,
}

/// Parsed "customer, amount" input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub customer: String,
    /// Total in cents
    pub total: i64,
}

impl OrderDraft {
    pub fn parse(input: &str) -> Result<Self, DraftError> {
        let (customer, amount) = input.rsplit_once(',').ok_or(DraftError::MissingAmount)?;
        let customer = customer.trim();
        if customer.is_empty() {
            return Err(DraftError::MissingCustomer);
        }
        let total = parse_cents(amount)?;
        if total <= 0 {
            return Err(DraftError::NonPositiveAmount);
        }
        Ok(Self {
            customer: customer.to_string(),
            total,
        })
    }
}

/// Parse `1234`, `1234.5`, `$1,234.50` into cents; a leading `-` negates
pub fn parse_cents(raw: &str) -> Result<i64, DraftError> {
    let bad = || DraftError::BadAmount(raw.trim().to_string());
    let trimmed = raw.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let cleaned: String = unsigned
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    if cleaned.is_empty() {
        return Err(bad());
    }

    let (whole, frac) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if frac.len() > 2 || !digits(whole) || !digits(frac) {
        return Err(bad());
    }
    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| bad())?
    };
    let frac: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| bad())? * 10,
        _ => frac.parse().map_err(|_| bad())?,
    };
    let cents = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(frac))
        .ok_or_else(bad)?;
    Ok(if negative { -cents } else { cents })
}

/// Body of a reply; only checks it is not blank
pub fn reply_body(input: &str) -> Result<String, DraftError> {
    let body = input.trim();
    if body.is_empty() {
        Err(DraftError::EmptyMessage)
    } else {
        Ok(body.to_string())
    }
}

/// `Re:` prefix unless the subject already carries one
pub fn reply_subject(subject: &str) -> String {
    if subject.to_lowercase().starts_with("re:") {
        subject.to_string()
    } else {
        format!("Re: {subject}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("12"), Ok(1200));
        assert_eq!(parse_cents("12.5"), Ok(1250));
        assert_eq!(parse_cents(" $1,234.56 "), Ok(123_456));
        assert_eq!(parse_cents(".75"), Ok(75));
        assert_eq!(parse_cents("-0.50"), Ok(-50));
        assert_eq!(parse_cents("-$1,200"), Ok(-120_000));
        assert!(matches!(parse_cents("--5"), Err(DraftError::BadAmount(_))));
        assert!(matches!(parse_cents("-"), Err(DraftError::BadAmount(_))));
        assert!(matches!(parse_cents("12.345"), Err(DraftError::BadAmount(_))));
        assert!(matches!(parse_cents("abc"), Err(DraftError::BadAmount(_))));
        assert!(matches!(parse_cents(""), Err(DraftError::BadAmount(_))));
    }

    #[test]
    fn test_order_draft() {
        assert_eq!(
            OrderDraft::parse("Acme, Inc., 99.90"),
            Ok(OrderDraft { customer: "Acme, Inc.".into(), total: 9990 })
        );
        assert_eq!(OrderDraft::parse("Acme"), Err(DraftError::MissingAmount));
        assert_eq!(OrderDraft::parse(" , 10"), Err(DraftError::MissingCustomer));
        assert_eq!(OrderDraft::parse("Acme, 0"), Err(DraftError::NonPositiveAmount));
        assert_eq!(OrderDraft::parse("Acme, -0.50"), Err(DraftError::NonPositiveAmount));
        assert_eq!(OrderDraft::parse("Acme, -12"), Err(DraftError::NonPositiveAmount));
    }

    #[test]
    fn test_reply_helpers() {
        assert_eq!(reply_body("  "), Err(DraftError::EmptyMessage));
        assert_eq!(reply_body(" thanks "), Ok("thanks".to_string()));
        assert_eq!(reply_subject("Intro call"), "Re: Intro call");
        assert_eq!(reply_subject("RE: Intro call"), "RE: Intro call");
    }
}
