use embedded_io_async::Write as AsyncWrite;

use crate::editor::EditEvent;

/// ANSI "erase to end of line"
const ERASE_TO_EOL: &[u8] = b"\x1b[K";

/// Console writer for echo output and prompts.
///
/// Every write is flushed so echo reaches the terminal immediately.
pub struct EchoWriter<'a, W: AsyncWrite> {
    writer: &'a mut W,
}

impl<'a, W: AsyncWrite> EchoWriter<'a, W> {
    /// Create a new echo writer
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }

    /// Write raw bytes and flush
    pub async fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), W::Error> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await
    }

    /// Write a string
    pub async fn write_str(&mut self, s: &str) -> Result<(), W::Error> {
        self.write_bytes(s.as_bytes()).await
    }

    /// Write the prompt
    pub async fn write_prompt(&mut self, prompt: &str) -> Result<(), W::Error> {
        self.write_str(prompt).await
    }

    /// Write the echo for an edit event
    pub async fn write_echo(&mut self, event: &EditEvent) -> Result<(), W::Error> {
        self.write_bytes(event.echo()).await
    }

    /// Return to column 0, blanking the old text when `ansi` is set.
    ///
    /// Without ANSI the old text stays until it is overwritten.
    pub async fn clear_line(&mut self, ansi: bool) -> Result<(), W::Error> {
        self.writer.write_all(b"\r").await?;
        if ansi {
            self.writer.write_all(ERASE_TO_EOL).await?;
        }
        self.writer.flush().await
    }
}
