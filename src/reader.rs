use core::fmt;

use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};
use embedded_io_async::{Read, Write as AsyncWrite};
use heapless::{String, Vec};

use crate::editor::{EditEvent, LineEditor};
use crate::writer::EchoWriter;

/// Configuration for the line reader
#[derive(Clone, Copy)]
pub struct EditorConfig {
    /// Prompt string to display
    pub prompt: &'static str,
    /// Echo typed characters, erase sequences and the end-of-line. Bells
    /// are always sent.
    pub echo: bool,
    /// Enable ANSI escape codes when redrawing the line
    pub ansi_enabled: bool,
    /// Answer a terminator with "\r\n" instead of echoing it verbatim.
    /// Has no effect while `echo` is off.
    pub expand_newline: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            prompt: "> ",
            echo: true,
            ansi_enabled: true,
            expand_newline: true,
        }
    }
}

/// Async line reader owning an `N`-byte edit buffer.
///
/// Lines hold at most `N - 1` bytes.
pub struct LineReader<const N: usize> {
    config: EditorConfig,
    editor: LineEditor,
    buffer: [u8; N],
}

impl<const N: usize> LineReader<N> {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            editor: LineEditor::new(),
            buffer: [0; N],
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The partial line typed so far
    pub fn pending(&self) -> &[u8] {
        &self.buffer[..self.editor.cursor()]
    }

    /// Discard the partial line
    pub fn clear(&mut self) {
        self.editor.reset();
    }

    /// Read a complete, non-empty line from the input.
    ///
    /// Empty lines re-print the prompt, so a CR LF pair from the terminal
    /// does not produce a spurious empty result. If `redraw_signal` fires
    /// while waiting, the prompt and partial line are written again.
    pub async fn read_line<R, W, M>(
        &mut self,
        reader: &mut R,
        writer: &mut EchoWriter<'_, W>,
        redraw_signal: Option<&Signal<M, ()>>,
    ) -> Result<Vec<u8, N>, ReadLineError>
    where
        R: Read,
        W: AsyncWrite,
        M: RawMutex,
    {
        writer
            .write_prompt(self.config.prompt)
            .await
            .map_err(|_| ReadLineError::IoError)?;

        let mut byte_buf = [0u8; 1];

        loop {
            let read = match redraw_signal {
                Some(signal) => match select(reader.read(&mut byte_buf), signal.wait()).await {
                    Either::First(result) => Some(result),
                    Either::Second(()) => None,
                },
                None => Some(reader.read(&mut byte_buf).await),
            };

            let Some(read) = read else {
                if let Some(signal) = redraw_signal {
                    signal.reset();
                }
                self.redraw(writer).await?;
                continue;
            };

            match read {
                Ok(0) => return Err(ReadLineError::EndOfFile),
                Ok(_) => {}
                Err(_) => return Err(ReadLineError::IoError),
            }

            let event = self.editor.process(byte_buf[0], &mut self.buffer);
            match event {
                EditEvent::LineReady { len: 0, .. } => {
                    self.finish_line(writer, &event).await?;
                    writer
                        .write_prompt(self.config.prompt)
                        .await
                        .map_err(|_| ReadLineError::IoError)?;
                }
                EditEvent::LineReady { len, .. } => {
                    self.finish_line(writer, &event).await?;
                    debug!("read line of {} bytes", len);
                    // len < N, so the line always fits
                    return Ok(self.buffer[..len].iter().copied().collect());
                }
                _ if event.is_rejected() || self.config.echo => {
                    writer
                        .write_echo(&event)
                        .await
                        .map_err(|_| ReadLineError::IoError)?;
                }
                _ => {}
            }
        }
    }

    /// Like [`read_line`](Self::read_line), but the line must be UTF-8
    pub async fn read_line_str<R, W, M>(
        &mut self,
        reader: &mut R,
        writer: &mut EchoWriter<'_, W>,
        redraw_signal: Option<&Signal<M, ()>>,
    ) -> Result<String<N>, ReadLineError>
    where
        R: Read,
        W: AsyncWrite,
        M: RawMutex,
    {
        let line = self.read_line(reader, writer, redraw_signal).await?;
        String::from_utf8(line).map_err(|_| ReadLineError::Utf8Error)
    }

    async fn finish_line<W: AsyncWrite>(
        &self,
        writer: &mut EchoWriter<'_, W>,
        event: &EditEvent,
    ) -> Result<(), ReadLineError> {
        let result = if !self.config.echo {
            Ok(())
        } else if self.config.expand_newline {
            writer.write_str("\r\n").await
        } else {
            writer.write_echo(event).await
        };
        result.map_err(|_| ReadLineError::IoError)
    }

    async fn redraw<W: AsyncWrite>(
        &self,
        writer: &mut EchoWriter<'_, W>,
    ) -> Result<(), ReadLineError> {
        trace!("redraw");
        writer
            .clear_line(self.config.ansi_enabled)
            .await.map_err(|_| ReadLineError::IoError)?;
        writer
            .write_prompt(self.config.prompt)
            .await
            .map_err(|_| ReadLineError::IoError)?;
        if self.config.echo {
            writer
                .write_bytes(self.pending())
                .await
                .map_err(|_| ReadLineError::IoError)?;
        }
        Ok(())
    }
}

/// Errors that can occur while reading a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadLineError {
    IoError,
    Utf8Error,
    EndOfFile,
}

impl fmt::Display for ReadLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadLineError::IoError => f.write_str("serial I/O error"),
            ReadLineError::Utf8Error => f.write_str("line is not valid UTF-8"),
            ReadLineError::EndOfFile => f.write_str("end of input"),
        }
    }
}
