//! Command tokenizer
//!
//! Turns a `/`-prefixed line into a structured command. Verbs match
//! case-insensitively; arguments keep the user's original text. First
//! match wins, anything else is `Unknown`.

/// Prefix distinguishing commands from echoable text
pub const COMMAND_PREFIX: char = '/';

/// A parsed command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Clear,
    Status,
    /// Hardware restart
    EspRst,
    /// Pulse the modem power key
    SimOn,
    /// Shut the modem down
    SimOff,
    /// Query network registration
    SimNet,
    /// List all stored messages
    SmsReadAll,
    /// List unread messages
    SmsReadUnread,
    /// Start the send wizard with a destination number
    SmsSend { number: &'a str },
    /// Enter AT passthrough mode
    AtEnter,
    /// Run a single AT command without entering the mode
    AtOnce { command: &'a str },
    /// Read GNSS fix data, optionally just the UTC field
    Gnss { utc: bool },
    /// Leave the current modal mode
    Exit,
    Unknown,
}

/// Parse one submitted line; `None` when it is not a command at all
pub fn parse(line: &str) -> Option<Command<'_>> {
    let line = line.trim();
    let body = line.strip_prefix(COMMAND_PREFIX)?;

    let (verb, rest) = match body.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (body, ""),
    };

    let cmd = if verb.eq_ignore_ascii_case("help") {
        Command::Help
    } else if verb.eq_ignore_ascii_case("clear") {
        Command::Clear
    } else if verb.eq_ignore_ascii_case("status") {
        Command::Status
    } else if verb.eq_ignore_ascii_case("esp") && rest.eq_ignore_ascii_case("rst") {
        Command::EspRst
    } else if verb.eq_ignore_ascii_case("sim") {
        if rest.eq_ignore_ascii_case("on") {
            Command::SimOn
        } else if rest.eq_ignore_ascii_case("off") {
            Command::SimOff
        } else if rest.eq_ignore_ascii_case("net") {
            Command::SimNet
        } else {
            Command::Unknown
        }
    } else if verb.eq_ignore_ascii_case("sms") {
        let (sub, arg) = match rest.split_once(char::is_whitespace) {
            Some((sub, arg)) => (sub, arg.trim()),
            None => (rest, ""),
        };
        if sub.eq_ignore_ascii_case("ra") {
            Command::SmsReadAll
        } else if sub.eq_ignore_ascii_case("ru") {
            Command::SmsReadUnread
        } else if sub.eq_ignore_ascii_case("s") {
            Command::SmsSend { number: arg }
        } else {
            Command::Unknown
        }
    } else if verb.eq_ignore_ascii_case("at") {
        if rest.is_empty() {
            Command::AtEnter
        } else {
            Command::AtOnce { command: rest }
        }
    } else if verb.eq_ignore_ascii_case("gnss") {
        Command::Gnss {
            utc: rest.eq_ignore_ascii_case("utc"),
        }
    } else if verb.eq_ignore_ascii_case("exit") {
        Command::Exit
    } else {
        Command::Unknown
    };
    Some(cmd)
}
