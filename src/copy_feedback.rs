use std::io::{self, Write};
use std::time::{Duration, Instant};

use log::debug;

/// How long the "copied" indicator stays visible after a successful copy.
pub const COPIED_INDICATOR_DURATION: Duration = Duration::from_millis(1200);

/// Destination for the copied code. Behind a trait so the timed-indicator
/// logic is testable without a real clipboard.
pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> io::Result<()>;
}

/// Clipboard sink that emits an OSC 52 escape sequence, letting the terminal
/// emulator place the text on the system clipboard. Works over SSH and needs
/// no display server.
pub struct Osc52Clipboard;

impl ClipboardSink for Osc52Clipboard {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "\x1b]52;c;{}\x07", base64_encode(text.as_bytes()))?;
        stdout.flush()
    }
}

/// Transient "copied" indicator around a clipboard write: after a successful
/// copy the indicator shows for a fixed duration, then reverts. A timed UI
/// state, nothing more.
pub struct CopyFeedback {
    copied_at: Option<Instant>,
    duration: Duration,
}

impl CopyFeedback {
    pub fn new() -> Self {
        Self::with_duration(COPIED_INDICATOR_DURATION)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            copied_at: None,
            duration,
        }
    }

    /// Copy `text` into the sink and start the indicator window. On failure
    /// the indicator stays off.
    pub fn copy(&mut self, sink: &mut dyn ClipboardSink, text: &str) -> io::Result<()> {
        sink.copy(text)?;
        debug!("copy_feedback: copied '{}'", text);
        self.copied_at = Some(Instant::now());
        Ok(())
    }

    /// True while the indicator window is open.
    pub fn is_copied(&self) -> bool {
        self.copied_at
            .map(|at| at.elapsed() < self.duration)
            .unwrap_or(false)
    }

    /// Hide the indicator immediately (e.g. when a new result replaces the
    /// displayed record).
    pub fn clear(&mut self) {
        self.copied_at = None;
    }
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new()
    }
}

// Plain RFC 4648 base64, enough for OSC 52 payloads.
fn base64_encode(input: &[u8]) -> String {
    const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut out = String::with_capacity((input.len() + 2) / 3 * 4);
    for chunk in input.chunks(3) {
        let b = [
            chunk[0],
            chunk.get(1).copied().unwrap_or(0),
            chunk.get(2).copied().unwrap_or(0),
        ];
        let n = u32::from(b[0]) << 16 | u32::from(b[1]) << 8 | u32::from(b[2]);
        out.push(TABLE[(n >> 18 & 0x3f) as usize] as char);
        out.push(TABLE[(n >> 12 & 0x3f) as usize] as char);
        out.push(if chunk.len() > 1 {
            TABLE[(n >> 6 & 0x3f) as usize] as char
        } else {
            '='
        });
        out.push(if chunk.len() > 2 {
            TABLE[(n & 0x3f) as usize] as char
        } else {
            '='
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSink {
        copied: Vec<String>,
        fail: bool,
    }

    impl ClipboardSink for RecordingSink {
        fn copy(&mut self, text: &str) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::Other, "no clipboard"));
            }
            self.copied.push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn indicator_shows_after_copy_and_reverts_after_duration() {
        let mut sink = RecordingSink {
            copied: Vec::new(),
            fail: false,
        };
        let mut feedback = CopyFeedback::with_duration(Duration::from_millis(30));
        assert!(!feedback.is_copied());

        feedback.copy(&mut sink, "SBIN0000001").unwrap();
        assert!(feedback.is_copied());
        assert_eq!(sink.copied, vec!["SBIN0000001".to_string()]);

        std::thread::sleep(Duration::from_millis(40));
        assert!(!feedback.is_copied());
    }

    #[test]
    fn failed_copy_leaves_indicator_off() {
        let mut sink = RecordingSink {
            copied: Vec::new(),
            fail: true,
        };
        let mut feedback = CopyFeedback::new();
        assert!(feedback.copy(&mut sink, "SBIN0000001").is_err());
        assert!(!feedback.is_copied());
    }

    #[test]
    fn clear_hides_the_indicator() {
        let mut sink = RecordingSink {
            copied: Vec::new(),
            fail: false,
        };
        let mut feedback = CopyFeedback::new();
        feedback.copy(&mut sink, "SBIN0000001").unwrap();
        feedback.clear();
        assert!(!feedback.is_copied());
    }

    #[test]
    fn base64_matches_known_vectors() {
        assert_eq!(base64_encode(b""), "");
        assert_eq!(base64_encode(b"f"), "Zg==");
        assert_eq!(base64_encode(b"fo"), "Zm8=");
        assert_eq!(base64_encode(b"foo"), "Zm9v");
        assert_eq!(base64_encode(b"SBIN0000001"), "U0JJTjAwMDAwMDE=");
    }
}
