//! Line-oriented terminals that an order session talks through.
//!
//! # Implementations
//!
//! - [`StreamTerminal`] - any async byte stream pair, used for TCP peers
//! - [`LocalTerminal`] - the process's own stdin/stdout/stderr

use std::io::{self, IsTerminal};

use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stderr, Stdin, Stdout,
};

use crate::telnet;

/// Longest line kept from a peer, in bytes. The rest of an over-long line is
/// discarded up to its newline.
const MAX_LINE_BYTES: usize = 4096;

/// Read one newline-terminated line, keeping at most [`MAX_LINE_BYTES`].
///
/// Returns `Ok(None)` at end of stream. A truncated line is cut back to the
/// last complete UTF-8 character.
async fn read_bounded_line<R>(reader: &mut R) -> io::Result<Option<Vec<u8>>>
where
    R: AsyncBufRead + Unpin + ?Sized,
{
    let mut line = Vec::new();
    let mut read_any = false;
    let mut discarded = 0usize;

    loop {
        let (consumed, complete) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                break;
            }
            read_any = true;

            let newline = available.iter().position(|&b| b == b'\n');
            let consumed = newline.map_or(available.len(), |i| i + 1);
            let keep = consumed.min(MAX_LINE_BYTES.saturating_sub(line.len()));
            line.extend_from_slice(available.get(..keep).unwrap_or_default());
            discarded += consumed - keep;
            (consumed, newline.is_some())
        };
        reader.consume(consumed);
        if complete {
            break;
        }
    }

    if !read_any {
        return Ok(None);
    }
    if discarded > 0 {
        tracing::debug!(discarded, "Over-long input line truncated");
        match std::str::from_utf8(&line) {
            Err(e) if e.error_len().is_none() => line.truncate(e.valid_up_to()),
            _ => {}
        }
    }
    Ok(Some(line))
}

/// Duplex text channel for one session.
#[async_trait]
pub trait Terminal: Send {
    /// Whether the peer is a character-oriented interactive terminal.
    fn is_interactive(&self) -> bool;

    /// Read one line with the line ending and surrounding whitespace removed.
    ///
    /// Returns `Ok(None)` at end of stream.
    async fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Write text to the output stream.
    async fn write(&mut self, text: &str) -> io::Result<()>;

    /// Write text to the error stream.
    async fn write_error(&mut self, text: &str) -> io::Result<()>;
}

/// Terminal over an async reader/writer pair.
///
/// Errors are written to the same stream as normal output. Input that is not
/// valid UTF-8 is decoded lossily.
#[derive(Debug)]
pub struct StreamTerminal<R, W> {
    reader: R,
    writer: W,
    interactive: bool,
    telnet: bool,
}

impl<R, W> StreamTerminal<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Wrap a stream pair. Stream peers are treated as interactive.
    pub const fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            interactive: true,
            telnet: false,
        }
    }

    /// Override whether the peer counts as interactive.
    #[must_use]
    pub const fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Speak telnet: strip commands from input and end output lines with CRLF.
    #[must_use]
    pub const fn telnet(mut self) -> Self {
        self.telnet = true;
        self
    }

    /// Take back the underlying reader and writer.
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

#[async_trait]
impl<R, W> Terminal for StreamTerminal<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    async fn read_line(&mut self) -> io::Result<Option<String>> {
        let Some(mut line) = read_bounded_line(&mut self.reader).await? else {
            return Ok(None);
        };
        if self.telnet {
            line = telnet::strip_commands(&line);
        }
        Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
    }

    async fn write(&mut self, text: &str) -> io::Result<()> {
        if self.telnet {
            self.writer
                .write_all(text.replace('\n', "\r\n").as_bytes())
                .await?;
        } else {
            self.writer.write_all(text.as_bytes()).await?;
        }
        self.writer.flush().await
    }

    async fn write_error(&mut self, text: &str) -> io::Result<()> {
        self.write(text).await
    }
}

/// Terminal over the process's standard streams.
#[derive(Debug)]
pub struct LocalTerminal {
    stream: StreamTerminal<BufReader<Stdin>, Stdout>,
    stderr: Stderr,
}

impl LocalTerminal {
    /// Attach to stdin/stdout/stderr.
    ///
    /// Interactive only when both stdin and stdout are TTYs.
    #[must_use]
    pub fn new() -> Self {
        let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
        Self {
            stream: StreamTerminal::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .interactive(interactive),
            stderr: tokio::io::stderr(),
        }
    }
}

impl Default for LocalTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Terminal for LocalTerminal {
    fn is_interactive(&self) -> bool {
        self.stream.is_interactive()
    }

    async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.stream.read_line().await
    }

    async fn write(&mut self, text: &str) -> io::Result<()> {
        self.stream.write(text).await
    }

    async fn write_error(&mut self, text: &str) -> io::Result<()> {
        self.stderr.write_all(text.as_bytes()).await?;
        self.stderr.flush().await
    }
}
