use thiserror::Error;

/// Balances and amounts are fixed-point with two decimal places, stored as
/// integer cents. 100.00 = 10000 cents.
pub type Cents = i64;

/// Format cents as a decimal string with exactly two fractional digits.
/// Example: 7000 -> "70.00", -5 -> "-0.05"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a user-entered amount into cents.
///
/// Accepts `"100"`, `"100.5"`, `"100.50"` and `".50"`. A comma is accepted as
/// the decimal separator. Amounts with more than two fractional digits are
/// rejected instead of being silently rounded.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim().replace(',', ".");
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.as_str()),
    };

    let (units_str, fraction_str) = match digits.split_once('.') {
        Some((units, fraction)) => (units, fraction),
        None => (digits, ""),
    };

    if units_str.is_empty() && fraction_str.is_empty() {
        return Err(ParseCentsError::Empty);
    }
    if !units_str.chars().all(|c| c.is_ascii_digit())
        || !fraction_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseCentsError::InvalidFormat(input.clone()));
    }
    if fraction_str.len() > 2 {
        return Err(ParseCentsError::TooPrecise(input.clone()));
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseCentsError::OutOfRange(input.clone()))?
    };
    let fraction: i64 = match fraction_str.len() {
        0 => 0,
        // "5" after the point means fifty cents
        1 => fraction_str.parse::<i64>().unwrap_or(0) * 10,
        _ => fraction_str.parse().unwrap_or(0),
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(fraction))
        .ok_or_else(|| ParseCentsError::OutOfRange(input.clone()))?;

    Ok(if negative { -cents } else { cents })
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("empty amount")]
    Empty,

    #[error("invalid amount '{0}', expected something like 50 or 50.00")]
    InvalidFormat(String),

    #[error("amount '{0}' has more than two decimal places")]
    TooPrecise(String),

    #[error("amount '{0}' is too large")]
    OutOfRange(String),
}
