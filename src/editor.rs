use crate::hal::Serial;

/// Audible alert
pub const BELL: u8 = 0x07;
/// Backspace, both as an erase key and in the erase sequence
pub const BS: u8 = 0x08;
/// Line feed, alternate terminator
pub const LF: u8 = 0x0A;
/// Carriage return, primary terminator
pub const CR: u8 = 0x0D;
/// Delete, treated like backspace
pub const DEL: u8 = 0x7F;

/// Moves the terminal cursor back over the last character and blanks it
pub const ERASE_SEQUENCE: [u8; 3] = [BS, b' ', BS];

/// What happened to a single input byte, and what to echo for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditEvent {
    /// Byte was stored at the cursor
    Inserted(u8),
    /// Last character was removed
    Erased,
    /// Backspace on an empty line
    NothingToErase,
    /// Buffer already holds `size - 1` characters, byte dropped
    BufferFull,
    /// A terminator arrived; the line is `buf[..len]` followed by a 0
    LineReady { terminator: u8, len: usize },
}

impl EditEvent {
    /// Bytes to send back to the terminal
    pub fn echo(&self) -> &[u8] {
        match self {
            EditEvent::Inserted(byte) => core::slice::from_ref(byte),
            EditEvent::LineReady { terminator, .. } => core::slice::from_ref(terminator),
            EditEvent::Erased => &ERASE_SEQUENCE,
            EditEvent::NothingToErase | EditEvent::BufferFull => &[BELL],
        }
    }

    pub fn is_line_ready(&self) -> bool {
        matches!(self, EditEvent::LineReady { .. })
    }

    /// True for events answered with a bell
    pub fn is_rejected(&self) -> bool {
        matches!(self, EditEvent::NothingToErase | EditEvent::BufferFull)
    }
}

/// Line editing state for one input stream.
///
/// Only the cursor lives here; the caller owns the buffer and hands it in on
/// every call. Any byte other than CR, LF, BS and DEL is stored as-is,
/// control characters included.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineEditor {
    cursor: usize,
}

impl LineEditor {
    pub const fn new() -> Self {
        Self { cursor: 0 }
    }

    /// Current write offset in the buffer
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Discard the line in progress
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Process one input byte into `buf`.
    ///
    /// At most `buf.len() - 1` characters are kept so there is always room
    /// for the terminating 0.
    pub fn process(&mut self, byte: u8, buf: &mut [u8]) -> EditEvent {
        let size = buf.len();
        if self.cursor >= size {
            // buffer shrank since the last call
            self.cursor = size.saturating_sub(1);
        }

        match byte {
            CR | LF => {
                let len = self.cursor;
                if let Some(slot) = buf.get_mut(len) {
                    *slot = 0;
                }
                self.cursor = 0;
                trace!("line ready, {} bytes", len);
                EditEvent::LineReady {
                    terminator: byte,
                    len,
                }
            }
            BS | DEL => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    EditEvent::Erased
                } else {
                    EditEvent::NothingToErase
                }
            }
            _ => {
                if self.cursor + 1 < size {
                    buf[self.cursor] = byte;
                    self.cursor += 1;
                    EditEvent::Inserted(byte)
                } else {
                    trace!("buffer full, dropped {=u8:#x}", byte);
                    EditEvent::BufferFull
                }
            }
        }
    }

    /// Process one byte and write its echo to `serial`.
    ///
    /// Returns `true` when the byte completed a line.
    pub fn feed<S: Serial + ?Sized>(
        &mut self,
        byte: u8,
        buf: &mut [u8],
        serial: &mut S,
    ) -> Result<bool, S::Error> {
        let event = self.process(byte, buf);
        serial.write_all(event.echo())?;
        Ok(event.is_line_ready())
    }

    /// Feed every byte `serial` has waiting.
    ///
    /// Stops at the first completed line and returns its length; returns
    /// `None` once no more input is available. Bytes after the terminator
    /// stay unread for the next call.
    pub fn poll<S: Serial + ?Sized>(
        &mut self,
        serial: &mut S,
        buf: &mut [u8],
    ) -> Result<Option<usize>, S::Error> {
        while serial.available()? {
            let Some(byte) = serial.read_byte()? else {
                break;
            };
            let event = self.process(byte, buf);
            serial.write_all(event.echo())?;
            if let EditEvent::LineReady { len, .. } = event {
                return Ok(Some(len));
            }
        }
        Ok(None)
    }
}

/// The bytes of `buf` before its first 0, or all of it if there is none
pub fn terminated(buf: &[u8]) -> &[u8] {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    &buf[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use heapless::{Deque, Vec};

    /// Runs `input` through a fresh editor, returning the editor and events
    fn run(input: &[u8], buf: &mut [u8]) -> (LineEditor, Vec<EditEvent, 32>) {
        let mut editor = LineEditor::new();
        let mut events = Vec::new();
        for &b in input {
            events.push(editor.process(b, buf)).unwrap();
        }
        (editor, events)
    }

    fn bells(events: &[EditEvent]) -> usize {
        events.iter().filter(|e| e.echo() == [BELL]).count()
    }

    #[test]
    fn test_no_terminator_never_ready() {
        let mut buf = [0u8; 8];
        let (_, events) = run(b"ab\x08\x01c\x7fzzzzzzzz", &mut buf);
        assert!(events.iter().all(|e| !e.is_line_ready()));
    }

    #[test]
    fn test_terminators_reset_cursor() {
        for term in [CR, LF] {
            let mut buf = [0u8; 8];
            let mut editor = LineEditor::new();
            editor.process(b'a', &mut buf);
            editor.process(b'b', &mut buf);
            let event = editor.process(term, &mut buf);
            assert_eq!(event, EditEvent::LineReady { terminator: term, len: 2 });
            assert_eq!(event.echo(), [term]);
            assert_eq!(editor.cursor(), 0);
            assert_eq!(terminated(&buf), b"ab");
        }
    }

    #[test]
    fn test_backspace_scenario() {
        let mut buf = [0u8; 8];
        let (_, events) = run(b"abc\x08x\r", &mut buf);
        let ready: Vec<bool, 8> = events.iter().map(|e| e.is_line_ready()).collect();
        assert_eq!(ready.as_slice(), [false, false, false, false, false, true]);
        assert_eq!(events[3], EditEvent::Erased);
        assert_eq!(events[3].echo(), [BS, b' ', BS]);
        assert_eq!(terminated(&buf), b"abx");
    }

    #[test]
    fn test_delete_erases_too() {
        let mut buf = [0u8; 8];
        let (_, events) = run(b"ab\x7f\r", &mut buf);
        assert_eq!(events[2], EditEvent::Erased);
        assert_eq!(terminated(&buf), b"a");
    }

    #[test]
    fn test_full_buffer_drops_with_bell() {
        let mut buf = [0u8; 4];
        let (_, events) = run(b"abcd\r", &mut buf);
        assert_eq!(events[3], EditEvent::BufferFull);
        assert_eq!(bells(&events), 1);
        assert_eq!(events[4], EditEvent::LineReady { terminator: CR, len: 3 });
        assert_eq!(&buf, b"abc\0");
    }

    #[test]
    fn test_capacity_plus_one_keeps_size_minus_one() {
        let mut buf = [0u8; 6];
        let (_, events) = run(b"qwerty\r", &mut buf);
        assert_eq!(bells(&events), 1);
        assert_eq!(terminated(&buf), b"qwert");
    }

    #[test]
    fn test_backspace_on_empty_line() {
        let mut buf = [0u8; 8];
        let mut editor = LineEditor::new();
        let event = editor.process(BS, &mut buf);
        assert_eq!(event, EditEvent::NothingToErase);
        assert_eq!(event.echo(), [BELL]);
        assert_eq!(editor.cursor(), 0);

        editor.process(b'z', &mut buf);
        assert_eq!(buf[0], b'z');
    }

    #[test]
    fn test_repeated_terminator_gives_empty_lines() {
        let mut buf = [0u8; 8];
        let mut editor = LineEditor::new();
        editor.process(b'x', &mut buf);
        editor.process(CR, &mut buf);
        for _ in 0..2 {
            let event = editor.process(CR, &mut buf);
            assert_eq!(event, EditEvent::LineReady { terminator: CR, len: 0 });
            assert_eq!(terminated(&buf), b"");
        }
    }

    #[test]
    fn test_control_bytes_pass_through() {
        let mut buf = [0u8; 8];
        let (_, events) = run(b"\x01\x1b[\r", &mut buf);
        assert_eq!(events[0], EditEvent::Inserted(0x01));
        assert_eq!(events[1].echo(), [0x1b]);
        assert_eq!(terminated(&buf), b"\x01\x1b[");
    }

    #[test]
    fn test_independent_sessions() {
        let mut left = [0u8; 8];
        let mut right = [0u8; 8];
        let mut a = LineEditor::new();
        let mut b = LineEditor::new();
        a.process(b'1', &mut left);
        b.process(b'x', &mut right);
        a.process(b'2', &mut left);
        assert_eq!(a.cursor(), 2);
        assert_eq!(b.cursor(), 1);
        b.process(LF, &mut right);
        a.process(CR, &mut left);
        assert_eq!(terminated(&left), b"12");
        assert_eq!(terminated(&right), b"x");
    }

    #[test]
    fn test_single_byte_buffer_holds_only_terminator() {
        let mut buf = [0xAAu8; 1];
        let (_, events) = run(b"a\r", &mut buf);
        assert_eq!(events[0], EditEvent::BufferFull);
        assert_eq!(events[1], EditEvent::LineReady { terminator: CR, len: 0 });
        assert_eq!(buf, [0]);
    }

    #[test]
    fn test_zero_size_buffer() {
        let mut buf: [u8; 0] = [];
        let (editor, events) = run(b"a\x08\r", &mut buf);
        assert_eq!(events[0], EditEvent::BufferFull);
        assert_eq!(events[1], EditEvent::NothingToErase);
        assert_eq!(events[2], EditEvent::LineReady { terminator: CR, len: 0 });
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_cursor_clamped_when_buffer_shrinks() {
        let mut big = [0u8; 8];
        let mut small = [0u8; 3];
        let mut editor = LineEditor::new();
        for &b in b"abcdef" {
            editor.process(b, &mut big);
        }
        let event = editor.process(b'g', &mut small);
        assert_eq!(event, EditEvent::BufferFull);
        assert_eq!(editor.cursor(), 2);
        let event = editor.process(CR, &mut small);
        assert_eq!(event, EditEvent::LineReady { terminator: CR, len: 2 });
    }

    #[test]
    fn test_reset_discards_line() {
        let mut buf = [0u8; 8];
        let (mut editor, _) = run(b"abc", &mut buf);
        assert!(!editor.is_empty());
        editor.reset();
        assert!(editor.is_empty());
        assert_eq!(editor.process(BS, &mut buf), EditEvent::NothingToErase);
    }

    #[test]
    fn test_terminated_without_zero() {
        assert_eq!(terminated(b"abc"), b"abc");
        assert_eq!(terminated(b"ab\0c"), b"ab");
    }

    struct Port {
        rx: Deque<u8, 32>,
        tx: Vec<u8, 64>,
    }

    impl Port {
        fn with_input(input: &[u8]) -> Self {
            let mut rx = Deque::new();
            for &b in input {
                rx.push_back(b).unwrap();
            }
            Self { rx, tx: Vec::new() }
        }
    }

    impl Serial for Port {
        type Error = Infallible;

        fn begin(&mut self, _baud: u32) -> Result<(), Infallible> {
            Ok(())
        }

        fn write_byte(&mut self, byte: u8) -> Result<(), Infallible> {
            self.tx.push(byte).unwrap();
            Ok(())
        }

        fn read_byte(&mut self) -> Result<Option<u8>, Infallible> {
            Ok(self.rx.pop_front())
        }

        fn available(&mut self) -> Result<bool, Infallible> {
            Ok(!self.rx.is_empty())
        }
    }

    #[test]
    fn test_feed_echoes_to_serial() {
        let mut port = Port::with_input(b"");
        let mut buf = [0u8; 3];
        let mut editor = LineEditor::new();
        let mut ready = Vec::<bool, 8>::new();
        for &b in b"\x08abc\x08\r" {
            ready.push(editor.feed(b, &mut buf, &mut port).unwrap()).unwrap();
        }
        assert_eq!(ready.as_slice(), [false, false, false, false, false, true]);
        assert_eq!(port.tx.as_slice(), b"\x07ab\x07\x08 \x08\r");
        assert_eq!(terminated(&buf), b"a");
    }

    #[test]
    fn test_poll_stops_at_line() {
        let mut port = Port::with_input(b"hi\rnext");
        let mut buf = [0u8; 16];
        let mut editor = LineEditor::new();

        assert_eq!(editor.poll(&mut port, &mut buf).unwrap(), Some(2));
        assert_eq!(terminated(&buf), b"hi");
        assert_eq!(port.tx.as_slice(), b"hi\r");

        assert_eq!(editor.poll(&mut port, &mut buf).unwrap(), None);
        assert_eq!(editor.cursor(), 4);
        assert_eq!(port.tx.as_slice(), b"hi\rnext");
    }
}
