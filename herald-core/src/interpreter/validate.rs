//! Input validation shared by the SMS wizard

/// Parse a message index: non-empty, decimal digits only, below `count`
pub fn parse_index(token: &str, count: usize) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: usize = token.parse().ok()?;
    if index >= count {
        return None;
    }
    Some(index)
}

/// Destination number: optional leading `+`, then 10 to 15 digits
pub fn is_valid_number(number: &str) -> bool {
    let digits = number.strip_prefix('+').unwrap_or(number);
    (10..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}
