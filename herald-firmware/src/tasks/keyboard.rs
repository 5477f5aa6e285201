//! Keyboard task
//!
//! Polls the I2C keyboard controller, feeds keycodes through the line
//! editor, and runs submitted lines through the interpreter. The shared
//! command buffer is locked only for field copies, never across a modem
//! transaction; a lock that cannot be taken quickly skips the update
//! rather than stalling the pipeline.

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_time::{with_timeout, Duration, Ticker};
use embedded_hal_async::i2c::I2c as I2cBus;

use herald_core::buffer::CommandState;
use herald_core::config::DeviceConfig;
use herald_core::editor::{EditorEvent, LineEditor};
use herald_core::interpreter::{Effect, Interpreter, Reply};
use herald_protocol::{DisplayEvent, FunctionKey, KEY_NONE};

use crate::channels::{post_display_event, COMMAND_BUFFER};
use crate::modem_client::ModemClient;

/// Keycode register on the keyboard controller
const KEY_REGISTER: u8 = 0x00;

/// Longest the task will wait for the shared buffer
const LOCK_WAIT_MS: u64 = 100;

struct PageState {
    on_command_page: bool,
    screen_on: bool,
}

/// Keyboard task - polls keycodes and drives the interpreter pipeline
#[embassy_executor::task]
pub async fn keyboard_task(mut i2c: I2c<'static, Async>, config: &'static DeviceConfig) {
    info!("Keyboard task started");

    let mut editor = LineEditor::new();
    let mut interpreter = Interpreter::new(ModemClient::new(config), config.clone());
    let mut page = PageState {
        on_command_page: false,
        screen_on: true,
    };

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(config.keyboard.poll_ms)));
    loop {
        ticker.next().await;

        let mut code = [0u8; 1];
        match i2c
            .write_read(config.keyboard.address, &[KEY_REGISTER], &mut code)
            .await
        {
            Ok(()) if code[0] != KEY_NONE => {
                handle_key(code[0], &mut editor, &mut interpreter, &mut page).await;
            }
            Ok(()) => {}
            Err(e) => {
                warn!("keyboard I2C error: {:?}", e);
            }
        }
    }
}

async fn handle_key(
    code: u8,
    editor: &mut LineEditor,
    interpreter: &mut Interpreter<ModemClient>,
    page: &mut PageState,
) {
    match editor.feed(code) {
        EditorEvent::Pending => {}
        EditorEvent::Changed => {
            update_input(editor.line()).await;
        }
        EditorEvent::Overflow => {
            warn!("input line full, key dropped");
        }
        EditorEvent::Submitted => {
            let line = editor.take_line();
            submit(&line, interpreter).await;
        }
        EditorEvent::Cancelled => {
            // Escape wipes the page and returns home
            if let Ok(mut buffer) = lock_buffer().await {
                buffer.clear();
            }
            page.on_command_page = false;
            editor.set_active(false);
            post_display_event(DisplayEvent::ShowHome);
        }
        EditorEvent::Function(key) => {
            apply_function_key(key, editor, page).await;
        }
        EditorEvent::UnmappedFunction(raw) => {
            warn!("unmapped function keycode {=u8:x}", raw);
        }
    }
}

async fn apply_function_key(key: FunctionKey, editor: &mut LineEditor, page: &mut PageState) {
    match key {
        FunctionKey::ShowCommand => {
            page.on_command_page = true;
            editor.set_active(page.screen_on);
            post_display_event(DisplayEvent::ShowCommand);
        }
        FunctionKey::ShowHome => {
            page.on_command_page = false;
            editor.set_active(false);
            post_display_event(DisplayEvent::ShowHome);
        }
        FunctionKey::ShowIdle => {
            page.on_command_page = false;
            editor.set_active(false);
            post_display_event(DisplayEvent::ShowIdle);
        }
        FunctionKey::SleepWake => {
            page.screen_on = !page.screen_on;
            editor.set_active(page.screen_on && page.on_command_page);
            post_display_event(if page.screen_on {
                DisplayEvent::Wake
            } else {
                DisplayEvent::Sleep
            });
        }
    }
}

/// Run one submitted line through the interpreter
async fn submit(line: &str, interpreter: &mut Interpreter<ModemClient>) {
    debug!("submit: {}", line);

    // Copy the line in and mark the page busy, then release the lock
    // for the duration of the transaction
    match lock_buffer().await {
        Ok(mut buffer) => {
            buffer.set_input(line);
            buffer.push_history(line);
            buffer.set_state(CommandState::Processing);
        }
        Err(()) => return,
    }
    post_display_event(DisplayEvent::ShowCommand);

    let reply = interpreter.handle(line).await;
    finish(line, &reply).await;
    post_display_event(DisplayEvent::ShowCommand);

    if reply.effect == Some(Effect::Restart) {
        info!("restart requested");
        cortex_m::peripheral::SCB::sys_reset();
    }
}

/// Write the result back to the shared buffer
async fn finish(line: &str, reply: &Reply) {
    let Ok(mut buffer) = lock_buffer().await else {
        return;
    };
    debug!("reply: {} -> {}", line, reply.text.as_str());
    buffer.set_output(&reply.text);
    buffer.push_history(&reply.text);
    buffer.clear_input();
    buffer.set_state(CommandState::Done);
    if reply.effect == Some(Effect::ClearHistory) {
        buffer.clear_history();
    }
}

async fn update_input(line: &str) {
    let Ok(mut buffer) = lock_buffer().await else {
        return;
    };
    buffer.set_input(line);
    buffer.set_state(CommandState::Typing);
}

/// Bounded wait on the shared buffer; a miss skips the update
async fn lock_buffer() -> Result<
    embassy_sync::mutex::MutexGuard<
        'static,
        embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex,
        herald_core::buffer::CommandBuffer,
    >,
    (),
> {
    match with_timeout(Duration::from_millis(LOCK_WAIT_MS), COMMAND_BUFFER.lock()).await {
        Ok(guard) => Ok(guard),
        Err(_) => {
            warn!("command buffer lock timed out");
            Err(())
        }
    }
}
