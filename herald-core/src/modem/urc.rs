//! Unsolicited result code classification
//!
//! Lines received while no transaction owns the transport are scanned
//! here. Matches become typed status events; anything else is logged and
//! discarded by the engine, never fatal.

/// Recognized unsolicited result codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Urc {
    /// Registered on the cellular network (home or roaming)
    NetworkRegistered,
    /// Incoming SMS notification
    SmsReceived,
    /// Incoming call
    Ring,
}

/// Classify one received line
pub fn classify(line: &str) -> Option<Urc> {
    let line = line.trim();
    if line.starts_with("+CMT:") {
        return Some(Urc::SmsReceived);
    }
    if line == "RING" {
        return Some(Urc::Ring);
    }
    for prefix in ["+CREG:", "+CEREG:"] {
        if let Some(rest) = line.strip_prefix(prefix) {
            if registration_ok(rest) {
                return Some(Urc::NetworkRegistered);
            }
            return None;
        }
    }
    if let Some(rest) = line.strip_prefix("+CGATT:") {
        if rest.trim() == "1" {
            return Some(Urc::NetworkRegistered);
        }
        return None;
    }
    None
}

/// Registration status field: 1 = home network, 5 = roaming.
/// Accepts both the URC form (`<stat>`) and the query form (`<n>,<stat>`).
fn registration_ok(rest: &str) -> bool {
    let stat = match rest.rsplit_once(',') {
        Some((_, stat)) => stat,
        None => rest,
    };
    matches!(stat.trim(), "1" | "5")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_urcs() {
        assert_eq!(classify("+CREG: 0,1"), Some(Urc::NetworkRegistered));
        assert_eq!(classify("+CREG: 0,5"), Some(Urc::NetworkRegistered));
        assert_eq!(classify("+CREG: 1"), Some(Urc::NetworkRegistered));
        assert_eq!(classify("+CEREG: 0,1"), Some(Urc::NetworkRegistered));
        assert_eq!(classify("+CGATT: 1"), Some(Urc::NetworkRegistered));
    }

    #[test]
    fn test_unregistered_states_ignored() {
        assert_eq!(classify("+CREG: 0,0"), None);
        assert_eq!(classify("+CREG: 0,2"), None);
        assert_eq!(classify("+CREG: 0,3"), None);
        assert_eq!(classify("+CGATT: 0"), None);
    }

    #[test]
    fn test_sms_notification() {
        assert_eq!(
            classify("+CMT: \"+15551234567\",\"\",\"24/06/01,12:00:00\""),
            Some(Urc::SmsReceived)
        );
    }

    #[test]
    fn test_ring() {
        assert_eq!(classify("RING"), Some(Urc::Ring));
        // RING must be the whole line
        assert_eq!(classify("BORING"), None);
    }

    #[test]
    fn test_unmatched_lines_ignored() {
        assert_eq!(classify("+CSQ: 18,0"), None);
        assert_eq!(classify("random noise"), None);
        assert_eq!(classify(""), None);
    }
}
