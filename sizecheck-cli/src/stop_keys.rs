use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
    tty::IsTty,
};

/// Keyboard listener for stopping a running scan with q, Esc or Ctrl-C.
///
/// The terminal is put in raw mode while listening, so Ctrl-C arrives as a
/// key press instead of killing the process. Raw mode ends on drop.
pub struct StopKeys {
    active: bool,
}

impl StopKeys {
    /// Listen on stdin when it is a terminal, otherwise never report a key
    pub fn listen() -> io::Result<Self> {
        if !io::stdin().is_tty() {
            return Ok(Self::disabled());
        }
        enable_raw_mode()?;
        Ok(Self { active: true })
    }

    pub fn disabled() -> Self {
        Self { active: false }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Wait up to `timeout` for a key. True when it was a stop key.
    pub fn poll(&self, timeout: Duration) -> io::Result<bool> {
        if !self.active || !event::poll(timeout)? {
            return Ok(false);
        }
        match event::read()? {
            Event::Key(key) => Ok(is_stop_key(key)),
            _ => Ok(false),
        }
    }
}

impl Drop for StopKeys {
    fn drop(&mut self) {
        if self.active {
            let _ = disable_raw_mode();
        }
    }
}

pub fn is_stop_key(key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_stop_keys() {
        assert!(is_stop_key(plain(KeyCode::Char('q'))));
        assert!(is_stop_key(plain(KeyCode::Esc)));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(is_stop_key(ctrl_c));
        assert!(!is_stop_key(plain(KeyCode::Char('c'))));
        assert!(!is_stop_key(plain(KeyCode::Enter)));
    }

    #[test]
    fn test_key_release_does_not_stop() {
        let mut key = plain(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert!(!is_stop_key(key));
    }

    #[test]
    fn test_disabled_listener_never_fires() {
        let keys = StopKeys::disabled();
        assert!(!keys.is_active());
        assert!(!keys.poll(Duration::from_millis(1)).unwrap());
    }
}
