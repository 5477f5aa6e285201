//! Modal command interpreter
//!
//! `handle` consumes one submitted line against the current mode and
//! produces a reply for the command history, possibly with a side effect
//! for the caller to apply. Dispatch order, first match wins:
//!
//! 1. `/exit` while a modal mode is active
//! 2. SMS compose body
//! 3. SMS browse index / delete
//! 4. AT passthrough forwarding
//! 5. plain text echo
//! 6. command tokens

pub mod command;
pub mod mode;
pub mod sanitize;
pub mod validate;

pub use command::{parse, Command, COMMAND_PREFIX};
pub use mode::{InterpreterMode, NUMBER_MAX};
pub use sanitize::{sanitize, REPLY_MAX};

use core::fmt::Write;

use heapless::String;

use crate::config::DeviceConfig;
use crate::error::ModemError;
use crate::modem::{classify, gnss, Urc, COMMAND_MAX};
use crate::traits::ModemControl;

const HELP_TEXT: &str = "Available commands:\n\
/help                 - show this message\n\
/clear                - clear command history\n\
/status               - show system status\n\
/esp rst              - restart the device\n\
/sim on|off|net       - modem power and network\n\
/sms ra|ru|s <number> - read or send SMS\n\
/at [command]         - send AT command(!) ex. AT+CREG?\n\
/gnss [utc]           - get GNSS data\n\
/exit                 - leave the current mode";

/// Side effect the caller applies after showing the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Effect {
    /// Wipe the command history ring
    ClearHistory,
    /// Hardware restart
    Restart,
}

/// Result of handling one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String<REPLY_MAX>,
    pub effect: Option<Effect>,
}

impl Reply {
    /// Truncating copy of a fixed message
    fn new(text: &str) -> Self {
        let mut copied = String::new();
        for c in text.chars() {
            if copied.push(c).is_err() {
                break;
            }
        }
        Self {
            text: copied,
            effect: None,
        }
    }

    fn with_effect(text: &str, effect: Effect) -> Self {
        let mut reply = Self::new(text);
        reply.effect = Some(effect);
        reply
    }

    fn transcript(transcript: &str) -> Self {
        Self {
            text: sanitize(transcript),
            effect: None,
        }
    }
}

/// Map a transaction failure to its user-facing reply
fn error_reply(err: ModemError) -> Reply {
    match err {
        ModemError::Protocol(transcript) => Reply::transcript(&transcript),
        other => Reply::new(other.message()),
    }
}

/// Prefix `AT` onto a passthrough line unless it already carries it
fn at_command(line: &str) -> Result<String<COMMAND_MAX>, ModemError> {
    let mut cmd: String<COMMAND_MAX> = String::new();
    let prefixed = line.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("AT"));
    if !prefixed {
        cmd.push_str("AT").map_err(|_| ModemError::Invalid)?;
    }
    cmd.push_str(line).map_err(|_| ModemError::Invalid)?;
    Ok(cmd)
}

/// The interpreter: modal state plus its modem seam
pub struct Interpreter<M: ModemControl> {
    mode: InterpreterMode,
    modem: M,
    config: DeviceConfig,
}

impl<M: ModemControl> Interpreter<M> {
    pub fn new(modem: M, config: DeviceConfig) -> Self {
        Self {
            mode: InterpreterMode::Normal,
            modem,
            config,
        }
    }

    pub fn mode(&self) -> &InterpreterMode {
        &self.mode
    }

    /// Interpret one submitted line
    pub async fn handle(&mut self, line: &str) -> Reply {
        let trimmed = line.trim();

        if self.mode.is_modal() && trimmed.eq_ignore_ascii_case("/exit") {
            self.mode = InterpreterMode::Normal;
            return Reply::new("Exited mode");
        }

        match core::mem::take(&mut self.mode) {
            InterpreterMode::SmsCompose { number } => {
                // Back to Normal regardless of transport outcome
                return match self.modem.send_sms(&number, line).await {
                    Ok(()) => Reply::new("Message sent"),
                    Err(err) => error_reply(err),
                };
            }
            InterpreterMode::SmsBrowse { count, show_all } => {
                return self.browse(trimmed, count, show_all).await;
            }
            InterpreterMode::AtPassthrough => {
                self.mode = InterpreterMode::AtPassthrough;
                return self.run_at(trimmed).await;
            }
            InterpreterMode::Normal => {}
        }

        let Some(cmd) = command::parse(line) else {
            // Plain text passes through unchanged
            return Reply::new(line);
        };

        match cmd {
            Command::Help => Reply::new(HELP_TEXT),
            Command::Clear => Reply::with_effect("History cleared", Effect::ClearHistory),
            Command::Status => self.status().await,
            Command::EspRst => Reply::with_effect("Restarting", Effect::Restart),
            Command::SimOn => {
                self.modem.toggle_power().await;
                Reply::new("Modem power toggled")
            }
            Command::SimOff => {
                self.modem.power_off().await;
                Reply::new("Modem powered off")
            }
            Command::SimNet => self.sim_net().await,
            Command::SmsReadAll => self.sms_list(true).await,
            Command::SmsReadUnread => self.sms_list(false).await,
            Command::SmsSend { number } => self.sms_send_entry(number).await,
            Command::AtEnter => {
                self.mode = InterpreterMode::AtPassthrough;
                Reply::new("AT mode: /exit to leave")
            }
            Command::AtOnce { command } => self.run_at(command).await,
            Command::Gnss { utc } => self.gnss(utc).await,
            Command::Exit => Reply::new("No active mode"),
            Command::Unknown => Reply::new("Error: Unknown command"),
        }
    }

    async fn status(&self) -> Reply {
        fn yes_no(flag: bool) -> &'static str {
            if flag {
                "yes"
            } else {
                "no"
            }
        }
        let flags = self.modem.readiness().await;
        let mut text: String<REPLY_MAX> = String::new();
        let _ = write!(
            text,
            "Modem powered: {}\nModem ready: {}\nNetwork registered: {}\nUnread SMS: {}",
            yes_no(flags.modem_powered),
            yes_no(flags.modem_ready),
            yes_no(flags.network_registered),
            flags.sms_pending,
        );
        Reply { text, effect: None }
    }

    /// Network registration query; a registered reply also updates the
    /// tracked flags, the same as the unsolicited form would
    async fn sim_net(&self) -> Reply {
        match self
            .modem
            .send_at("AT+CREG?", self.config.modem.net_timeout_ms)
            .await
        {
            Ok(transcript) => {
                let registered = transcript
                    .lines()
                    .any(|line| classify(line) == Some(Urc::NetworkRegistered));
                if registered {
                    self.modem.note_network_registered().await;
                }
                Reply::transcript(&transcript)
            }
            Err(err) => error_reply(err),
        }
    }

    async fn run_at(&self, line: &str) -> Reply {
        let cmd = match at_command(line) {
            Ok(cmd) => cmd,
            Err(err) => return error_reply(err),
        };
        match self
            .modem
            .send_at(&cmd, self.config.modem.at_timeout_ms)
            .await
        {
            Ok(transcript) => Reply::transcript(&transcript),
            Err(err) => error_reply(err),
        }
    }

    async fn sms_list(&mut self, show_all: bool) -> Reply {
        if !self.modem.readiness().await.modem_ready {
            return error_reply(ModemError::NotReady);
        }
        if let Err(err) = self
            .modem
            .send_at("AT+CMGF=1", self.config.modem.at_timeout_ms)
            .await
        {
            return error_reply(err);
        }
        let list = if show_all {
            "AT+CMGL=\"ALL\""
        } else {
            "AT+CMGL=\"REC UNREAD\""
        };
        match self
            .modem
            .send_at(list, self.config.modem.sms_timeout_ms)
            .await
        {
            Ok(transcript) => {
                let marker = self.config.sms.list_marker.as_str();
                let count = transcript
                    .lines()
                    .filter(|l| l.trim_start().starts_with(marker))
                    .count();
                if count == 0 {
                    return Reply::new("No messages found");
                }
                self.modem.mark_sms_read().await;
                self.mode = InterpreterMode::SmsBrowse { count, show_all };
                Reply::transcript(&transcript)
            }
            Err(err) => error_reply(err),
        }
    }

    async fn sms_send_entry(&mut self, number: &str) -> Reply {
        if !self.modem.readiness().await.modem_ready {
            return error_reply(ModemError::NotReady);
        }
        if !validate::is_valid_number(number) {
            return error_reply(ModemError::Invalid);
        }
        if let Err(err) = self
            .modem
            .send_at("AT+CMGF=1", self.config.modem.at_timeout_ms)
            .await
        {
            return error_reply(err);
        }
        let mut stored: String<NUMBER_MAX> = String::new();
        if stored.push_str(number).is_err() {
            return error_reply(ModemError::Invalid);
        }
        self.mode = InterpreterMode::SmsCompose { number: stored };
        let mut text: String<REPLY_MAX> = String::new();
        let _ = write!(text, "Number set: {number}");
        Reply { text, effect: None }
    }

    /// Browse-mode line: `/d <index>` deletes, a bare index reads
    async fn browse(&mut self, line: &str, count: usize, show_all: bool) -> Reply {
        if let Some(rest) = line.strip_prefix("/d") {
            let Some(index) = validate::parse_index(rest.trim(), count) else {
                self.mode = InterpreterMode::SmsBrowse { count, show_all };
                return error_reply(ModemError::Invalid);
            };
            let mut cmd: String<COMMAND_MAX> = String::new();
            let _ = write!(cmd, "AT+CMGD={index}");
            return match self
                .modem
                .send_at(&cmd, self.config.modem.sms_timeout_ms)
                .await
            {
                Ok(_) => {
                    self.mode = InterpreterMode::SmsBrowse {
                        count: count - 1,
                        show_all,
                    };
                    Reply::new("Message deleted")
                }
                Err(err) => {
                    self.mode = InterpreterMode::SmsBrowse { count, show_all };
                    error_reply(err)
                }
            };
        }

        let Some(index) = validate::parse_index(line, count) else {
            self.mode = InterpreterMode::SmsBrowse { count, show_all };
            return error_reply(ModemError::Invalid);
        };
        let mut cmd: String<COMMAND_MAX> = String::new();
        let _ = write!(cmd, "AT+CMGR={index}");
        match self
            .modem
            .send_at(&cmd, self.config.modem.sms_timeout_ms)
            .await
        {
            Ok(transcript) => {
                let remaining = if show_all { count } else { count - 1 };
                self.mode = InterpreterMode::SmsBrowse {
                    count: remaining,
                    show_all,
                };
                Reply::transcript(&transcript)
            }
            Err(err) => {
                self.mode = InterpreterMode::SmsBrowse { count, show_all };
                error_reply(err)
            }
        }
    }

    async fn gnss(&self, utc: bool) -> Reply {
        if !self.modem.readiness().await.modem_ready {
            return error_reply(ModemError::NotReady);
        }
        match self.modem.gnss_read().await {
            Ok(transcript) => {
                if !utc {
                    return Reply::transcript(&transcript);
                }
                match gnss::utc_timestamp(&transcript) {
                    Some(ts) => {
                        let mut text: String<REPLY_MAX> = String::new();
                        let _ = write!(text, "UTC: {ts}");
                        Reply { text, effect: None }
                    }
                    None => Reply::new("Error: no GNSS fix"),
                }
            }
            Err(err) => error_reply(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modem::Transcript;
    use crate::readiness::ReadinessFlags;
    use core::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::string::{String as StdString, ToString};
    use std::vec::Vec;

    /// Single-poll executor for futures that never actually suspend
    fn block_on<F: core::future::Future>(fut: F) -> F::Output {
        let mut fut = core::pin::pin!(fut);
        let mut cx = core::task::Context::from_waker(core::task::Waker::noop());
        loop {
            if let core::task::Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
                return out;
            }
        }
    }

    fn transcript(text: &str) -> Transcript {
        let mut t = Transcript::new();
        t.push_str(text).unwrap();
        t
    }

    #[derive(Default)]
    struct FakeModem {
        flags: Cell<ReadinessFlags>,
        at_log: RefCell<Vec<StdString>>,
        at_replies: RefCell<VecDeque<Result<Transcript, ModemError>>>,
        sms_log: RefCell<Vec<(StdString, StdString)>>,
        sms_reply: RefCell<Option<ModemError>>,
        gnss_reply: RefCell<Option<Result<Transcript, ModemError>>>,
        power_toggles: Cell<u32>,
        power_offs: Cell<u32>,
        marked_read: Cell<bool>,
        network_notes: Cell<u32>,
    }

    impl FakeModem {
        fn ready() -> Self {
            let fake = Self::default();
            fake.flags.set(ReadinessFlags {
                modem_powered: true,
                modem_ready: true,
                network_registered: true,
                sms_pending: 0,
            });
            fake
        }

        fn queue_at(&self, reply: Result<Transcript, ModemError>) {
            self.at_replies.borrow_mut().push_back(reply);
        }
    }

    impl ModemControl for FakeModem {
        async fn send_at(
            &self,
            command: &str,
            _timeout_ms: u32,
        ) -> Result<Transcript, ModemError> {
            self.at_log.borrow_mut().push(command.to_string());
            self.at_replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(transcript("OK\n")))
        }

        async fn send_sms(&self, number: &str, body: &str) -> Result<(), ModemError> {
            self.sms_log
                .borrow_mut()
                .push((number.to_string(), body.to_string()));
            match self.sms_reply.borrow().clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        async fn gnss_read(&self) -> Result<Transcript, ModemError> {
            self.gnss_reply
                .borrow()
                .clone()
                .unwrap_or_else(|| Ok(transcript("OK\n")))
        }

        async fn toggle_power(&self) {
            self.power_toggles.set(self.power_toggles.get() + 1);
        }

        async fn power_off(&self) {
            self.power_offs.set(self.power_offs.get() + 1);
        }

        async fn readiness(&self) -> ReadinessFlags {
            self.flags.get()
        }

        async fn mark_sms_read(&self) {
            self.marked_read.set(true);
        }

        async fn note_network_registered(&self) {
            self.network_notes.set(self.network_notes.get() + 1);
        }
    }

    fn interpreter(modem: FakeModem) -> Interpreter<FakeModem> {
        Interpreter::new(modem, DeviceConfig::default())
    }

    #[test]
    fn test_plain_text_echoed_unchanged() {
        let mut interp = interpreter(FakeModem::default());
        let reply = block_on(interp.handle("hello world"));
        assert_eq!(reply.text, "hello world");
        assert_eq!(reply.effect, None);
        assert_eq!(*interp.mode(), InterpreterMode::Normal);
    }

    #[test]
    fn test_unknown_command() {
        let mut interp = interpreter(FakeModem::default());
        let reply = block_on(interp.handle("/bogus"));
        assert_eq!(reply.text, "Error: Unknown command");
    }

    #[test]
    fn test_help_is_idempotent() {
        let mut interp = interpreter(FakeModem::default());
        let first = block_on(interp.handle("/help"));
        let second = block_on(interp.handle("/help"));
        assert_eq!(first, second);
        assert!(first.text.starts_with("Available commands:"));
        assert_eq!(*interp.mode(), InterpreterMode::Normal);
    }

    #[test]
    fn test_clear_requests_history_wipe() {
        let mut interp = interpreter(FakeModem::default());
        let first = block_on(interp.handle("/clear"));
        assert_eq!(first.text, "History cleared");
        assert_eq!(first.effect, Some(Effect::ClearHistory));
        let second = block_on(interp.handle("/clear"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_status_reports_flags() {
        let modem = FakeModem::default();
        modem.flags.set(ReadinessFlags {
            modem_powered: true,
            modem_ready: true,
            network_registered: false,
            sms_pending: 2,
        });
        let mut interp = interpreter(modem);
        let reply = block_on(interp.handle("/status"));
        assert_eq!(
            reply.text,
            "Modem powered: yes\nModem ready: yes\nNetwork registered: no\nUnread SMS: 2"
        );
    }

    #[test]
    fn test_esp_rst_requests_restart() {
        let mut interp = interpreter(FakeModem::default());
        let reply = block_on(interp.handle("/esp rst"));
        assert_eq!(reply.effect, Some(Effect::Restart));
    }

    #[test]
    fn test_sim_power_commands() {
        let mut interp = interpreter(FakeModem::default());
        block_on(interp.handle("/sim on"));
        assert_eq!(interp.modem.power_toggles.get(), 1);
        let reply = block_on(interp.handle("/sim off"));
        assert_eq!(interp.modem.power_offs.get(), 1);
        assert_eq!(reply.text, "Modem powered off");
    }

    #[test]
    fn test_sim_net_returns_sanitized_transcript() {
        let modem = FakeModem::ready();
        modem.queue_at(Ok(transcript("+CREG: 0,1\nOK\n")));
        let mut interp = interpreter(modem);
        let reply = block_on(interp.handle("/sim net"));
        assert_eq!(reply.text, "+CREG: 0,1 OK");
        assert_eq!(interp.modem.at_log.borrow()[0], "AT+CREG?");
    }

    #[test]
    fn test_sim_net_marks_positive_registration() {
        let modem = FakeModem::ready();
        modem.queue_at(Ok(transcript("+CREG: 0,5\nOK\n")));
        let mut interp = interpreter(modem);
        block_on(interp.handle("/sim net"));
        assert_eq!(interp.modem.network_notes.get(), 1);
    }

    #[test]
    fn test_sim_net_leaves_flags_when_unregistered() {
        let modem = FakeModem::ready();
        modem.queue_at(Ok(transcript("+CREG: 0,0\nOK\n")));
        let mut interp = interpreter(modem);
        let reply = block_on(interp.handle("/sim net"));
        assert_eq!(reply.text, "+CREG: 0,0 OK");
        assert_eq!(interp.modem.network_notes.get(), 0);
    }

    #[test]
    fn test_sms_send_wizard_end_to_end() {
        let mut interp = interpreter(FakeModem::ready());
        let reply = block_on(interp.handle("/sms s +15551234567"));
        assert_eq!(reply.text, "Number set: +15551234567");
        assert_eq!(interp.modem.at_log.borrow()[0], "AT+CMGF=1");
        assert!(matches!(
            interp.mode(),
            InterpreterMode::SmsCompose { number } if number.as_str() == "+15551234567"
        ));

        let reply = block_on(interp.handle("hello"));
        assert_eq!(reply.text, "Message sent");
        assert_eq!(
            *interp.modem.sms_log.borrow(),
            [("+15551234567".to_string(), "hello".to_string())]
        );
        assert_eq!(*interp.mode(), InterpreterMode::Normal);
    }

    #[test]
    fn test_sms_compose_failure_still_returns_to_normal() {
        let modem = FakeModem::ready();
        *modem.sms_reply.borrow_mut() = Some(ModemError::Timeout);
        let mut interp = interpreter(modem);
        block_on(interp.handle("/sms s +15551234567"));
        let reply = block_on(interp.handle("hello"));
        assert_eq!(reply.text, "Error: timeout");
        assert_eq!(*interp.mode(), InterpreterMode::Normal);
    }

    #[test]
    fn test_sms_requires_ready_modem() {
        let mut interp = interpreter(FakeModem::default());
        let reply = block_on(interp.handle("/sms s +15551234567"));
        assert_eq!(reply.text, "Error: modem not ready");
        assert!(interp.modem.at_log.borrow().is_empty());
    }

    #[test]
    fn test_sms_send_rejects_bad_number() {
        let mut interp = interpreter(FakeModem::ready());
        let reply = block_on(interp.handle("/sms s 12345"));
        assert_eq!(reply.text, "Error: invalid input");
        // Rejected before any transaction
        assert!(interp.modem.at_log.borrow().is_empty());
        assert_eq!(*interp.mode(), InterpreterMode::Normal);
    }

    #[test]
    fn test_sms_read_all_enters_browse() {
        let modem = FakeModem::ready();
        modem.queue_at(Ok(transcript("OK\n"))); // CMGF
        modem.queue_at(Ok(transcript(
            "+CMGL: 0,\"REC READ\",\"+15550001111\"\nhi\n+CMGL: 1,\"REC UNREAD\",\"+15550002222\"\nyo\nOK\n",
        )));
        let mut interp = interpreter(modem);
        let reply = block_on(interp.handle("/sms ra"));
        assert!(reply.text.starts_with("+CMGL: 0"));
        assert_eq!(
            *interp.mode(),
            InterpreterMode::SmsBrowse {
                count: 2,
                show_all: true
            }
        );
        assert!(interp.modem.marked_read.get());
        assert_eq!(
            interp.modem.at_log.borrow().as_slice(),
            ["AT+CMGF=1", "AT+CMGL=\"ALL\""]
        );
    }

    #[test]
    fn test_sms_read_unread_with_no_matches() {
        let modem = FakeModem::ready();
        modem.queue_at(Ok(transcript("OK\n"))); // CMGF
        modem.queue_at(Ok(transcript("OK\n")));
        let mut interp = interpreter(modem);
        let reply = block_on(interp.handle("/sms ru"));
        assert_eq!(reply.text, "No messages found");
        assert_eq!(*interp.mode(), InterpreterMode::Normal);
        assert_eq!(
            interp.modem.at_log.borrow()[1],
            "AT+CMGL=\"REC UNREAD\""
        );
    }

    fn browsing(count: usize, show_all: bool) -> Interpreter<FakeModem> {
        let mut interp = interpreter(FakeModem::ready());
        interp.mode = InterpreterMode::SmsBrowse { count, show_all };
        interp
    }

    #[test]
    fn test_browse_read_decrements_unread_count() {
        let mut interp = browsing(3, false);
        interp
            .modem
            .queue_at(Ok(transcript("+CMGR: \"REC UNREAD\"\nhello\nOK\n")));
        let reply = block_on(interp.handle("1"));
        assert_eq!(reply.text, "+CMGR: \"REC UNREAD\" hello OK");
        assert_eq!(interp.modem.at_log.borrow()[0], "AT+CMGR=1");
        assert_eq!(
            *interp.mode(),
            InterpreterMode::SmsBrowse {
                count: 2,
                show_all: false
            }
        );
    }

    #[test]
    fn test_browse_read_keeps_count_when_browsing_all() {
        let mut interp = browsing(3, true);
        let _ = block_on(interp.handle("2"));
        assert_eq!(
            *interp.mode(),
            InterpreterMode::SmsBrowse {
                count: 3,
                show_all: true
            }
        );
    }

    #[test]
    fn test_browse_delete() {
        let mut interp = browsing(5, true);
        let reply = block_on(interp.handle("/d 3"));
        assert_eq!(reply.text, "Message deleted");
        assert_eq!(interp.modem.at_log.borrow()[0], "AT+CMGD=3");
        assert_eq!(
            *interp.mode(),
            InterpreterMode::SmsBrowse {
                count: 4,
                show_all: true
            }
        );
    }

    #[test]
    fn test_browse_rejects_invalid_indexes() {
        for bad in ["5", "3a", "", "/d 5", "/d x"] {
            let mut interp = browsing(5, true);
            let reply = block_on(interp.handle(bad));
            assert_eq!(reply.text, "Error: invalid input", "input {bad:?}");
            assert!(interp.modem.at_log.borrow().is_empty());
            assert_eq!(
                *interp.mode(),
                InterpreterMode::SmsBrowse {
                    count: 5,
                    show_all: true
                }
            );
        }
    }

    #[test]
    fn test_exit_leaves_any_modal_mode() {
        for mode in [
            InterpreterMode::AtPassthrough,
            InterpreterMode::SmsCompose {
                number: String::try_from("+15551234567").unwrap(),
            },
            InterpreterMode::SmsBrowse {
                count: 4,
                show_all: false,
            },
        ] {
            let mut interp = interpreter(FakeModem::ready());
            interp.mode = mode;
            let reply = block_on(interp.handle("/exit"));
            assert_eq!(reply.text, "Exited mode");
            assert_eq!(*interp.mode(), InterpreterMode::Normal);
        }
    }

    #[test]
    fn test_exit_without_mode_is_a_no_op() {
        let mut interp = interpreter(FakeModem::default());
        let reply = block_on(interp.handle("/exit"));
        assert_eq!(reply.text, "No active mode");
    }

    #[test]
    fn test_at_passthrough_mode() {
        let modem = FakeModem::ready();
        modem.queue_at(Ok(transcript("+CSQ: 18,0\nOK\n")));
        let mut interp = interpreter(modem);
        let reply = block_on(interp.handle("/at"));
        assert_eq!(reply.text, "AT mode: /exit to leave");
        assert_eq!(*interp.mode(), InterpreterMode::AtPassthrough);

        let reply = block_on(interp.handle("+CSQ"));
        assert_eq!(reply.text, "+CSQ: 18,0 OK");
        // Prefix added since the line did not carry it
        assert_eq!(interp.modem.at_log.borrow()[0], "AT+CSQ");
        assert_eq!(*interp.mode(), InterpreterMode::AtPassthrough);
    }

    #[test]
    fn test_at_prefix_not_doubled() {
        let modem = FakeModem::ready();
        modem.queue_at(Ok(transcript("OK\n")));
        let mut interp = interpreter(modem);
        let _ = block_on(interp.handle("/at at+creg?"));
        assert_eq!(interp.modem.at_log.borrow()[0], "at+creg?");
    }

    #[test]
    fn test_at_timeout_surfaces_failure_string() {
        let modem = FakeModem::ready();
        modem.queue_at(Err(ModemError::Timeout));
        let mut interp = interpreter(modem);
        let reply = block_on(interp.handle("/at AT+CREG?"));
        assert_eq!(reply.text, "Error: timeout");
    }

    #[test]
    fn test_protocol_failure_shows_sanitized_transcript() {
        let modem = FakeModem::ready();
        modem.queue_at(Err(ModemError::Protocol(transcript("+CME ERROR: 10\n"))));
        let mut interp = interpreter(modem);
        let reply = block_on(interp.handle("/at AT+CPIN?"));
        assert_eq!(reply.text, "+CME ERROR: 10");
    }

    #[test]
    fn test_gnss_utc() {
        let modem = FakeModem::ready();
        *modem.gnss_reply.borrow_mut() = Some(Ok(transcript(
            "+CGNSINF: 1,1,20240601120000.000,37.77,-122.41\nOK\n",
        )));
        let mut interp = interpreter(modem);
        let reply = block_on(interp.handle("/gnss utc"));
        assert_eq!(reply.text, "UTC: 20240601120000.000");
    }

    #[test]
    fn test_gnss_without_fix() {
        let modem = FakeModem::ready();
        *modem.gnss_reply.borrow_mut() = Some(Ok(transcript("+CGNSINF: 1,0,,,,\nOK\n")));
        let mut interp = interpreter(modem);
        let reply = block_on(interp.handle("/gnss utc"));
        assert_eq!(reply.text, "Error: no GNSS fix");
    }
}
