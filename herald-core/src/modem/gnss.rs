//! GNSS response parsing
//!
//! The SIMCOM-style `+CGNSINF:` line carries comma-separated fields:
//! run status, fix status, then the UTC timestamp (YYYYMMDDHHMMSS.sss).

/// Command enabling the GNSS engine
pub const GNSS_POWER_ON: &str = "AT+CGNSPWR=1";

/// Command reading GNSS fix information
pub const GNSS_INFO: &str = "AT+CGNSINF";

/// Extract the UTC timestamp field from a `+CGNSINF` transcript
pub fn utc_timestamp(transcript: &str) -> Option<&str> {
    let line = transcript
        .lines()
        .find(|l| l.trim_start().starts_with("+CGNSINF:"))?;
    let fields = line.split_once(':')?.1;
    let utc = fields.split(',').nth(2)?.trim();
    if utc.is_empty() {
        return None;
    }
    Some(utc)
}
