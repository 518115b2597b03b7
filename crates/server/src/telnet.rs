//! Telnet option handling for TCP peers.
//!
//! Before a session starts the server asks the client for its terminal type
//! (RFC 1091). Clients that answer are real terminals; clients that refuse,
//! send plain data, or stay silent are not. Commands arriving later in the
//! input are stripped before a line is handed to the session.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

pub const IAC: u8 = 255;
pub const DONT: u8 = 254;
pub const DO: u8 = 253;
pub const WONT: u8 = 252;
pub const WILL: u8 = 251;
pub const SB: u8 = 250;
pub const SE: u8 = 240;

/// Terminal-type option code.
pub const TERMINAL_TYPE: u8 = 24;
/// Subnegotiation verb carrying the client's answer.
pub const IS: u8 = 0;
/// Subnegotiation verb asking the client for its terminal type.
pub const SEND: u8 = 1;

/// Longest subnegotiation payload accepted.
const MAX_SUBNEGOTIATION_BYTES: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Data(u8),
    Will(u8),
    Wont(u8),
    Do(u8),
    Dont(u8),
    Subnegotiation(u8, Vec<u8>),
    Command(u8),
}

async fn next_event<R: AsyncRead + Unpin + ?Sized>(reader: &mut R) -> io::Result<Event> {
    let byte = reader.read_u8().await?;
    if byte != IAC {
        return Ok(Event::Data(byte));
    }

    Ok(match reader.read_u8().await? {
        IAC => Event::Data(IAC),
        WILL => Event::Will(reader.read_u8().await?),
        WONT => Event::Wont(reader.read_u8().await?),
        DO => Event::Do(reader.read_u8().await?),
        DONT => Event::Dont(reader.read_u8().await?),
        SB => {
            let option = reader.read_u8().await?;
            let mut payload = Vec::new();
            loop {
                let byte = reader.read_u8().await?;
                let byte = if byte == IAC {
                    match reader.read_u8().await? {
                        SE => break,
                        escaped => escaped,
                    }
                } else {
                    byte
                };
                if payload.len() == MAX_SUBNEGOTIATION_BYTES {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "telnet subnegotiation too long",
                    ));
                }
                payload.push(byte);
            }
            Event::Subnegotiation(option, payload)
        }
        command => Event::Command(command),
    })
}

/// Ask the peer for its terminal type.
///
/// Returns `Ok(None)` when the peer refuses the option, sends ordinary data
/// first, or does not answer within `wait`. Other options the client offers
/// are declined.
///
/// # Errors
///
/// Returns an error if the stream fails or closes mid-negotiation.
pub async fn negotiate_terminal_type<R, W>(
    reader: &mut R,
    writer: &mut W,
    wait: Duration,
) -> io::Result<Option<String>>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(&[IAC, DO, TERMINAL_TYPE]).await?;
    writer.flush().await?;

    tokio::time::timeout(wait, await_terminal_type(reader, writer))
        .await
        .unwrap_or(Ok(None))
}

async fn await_terminal_type<R, W>(reader: &mut R, writer: &mut W) -> io::Result<Option<String>>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    loop {
        match next_event(reader).await? {
            Event::Will(TERMINAL_TYPE) => {
                writer
                    .write_all(&[IAC, SB, TERMINAL_TYPE, SEND, IAC, SE])
                    .await?;
                writer.flush().await?;
            }
            Event::Wont(TERMINAL_TYPE) | Event::Data(_) => return Ok(None),
            Event::Subnegotiation(TERMINAL_TYPE, payload) => {
                return Ok(terminal_type_from(&payload));
            }
            Event::Do(option) => {
                writer.write_all(&[IAC, WONT, option]).await?;
                writer.flush().await?;
            }
            Event::Will(option) => {
                writer.write_all(&[IAC, DONT, option]).await?;
                writer.flush().await?;
            }
            Event::Wont(_) | Event::Dont(_) | Event::Subnegotiation(..) | Event::Command(_) => {}
        }
    }
}

fn terminal_type_from(payload: &[u8]) -> Option<String> {
    match payload.split_first() {
        Some((&IS, name)) => {
            let name = String::from_utf8_lossy(name).trim().to_string();
            (!name.is_empty()).then_some(name)
        }
        _ => None,
    }
}

/// Whether a reported terminal type can drive an interactive session.
#[must_use]
pub fn is_interactive_type(name: &str) -> bool {
    !(name.eq_ignore_ascii_case("dumb") || name.eq_ignore_ascii_case("unknown"))
}

/// Remove telnet commands from a line of input, unescaping doubled `IAC`
/// bytes and dropping the NUL that follows a bare carriage return.
#[must_use]
pub fn strip_commands(line: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len());
    let mut bytes = line.iter().copied();

    while let Some(byte) = bytes.next() {
        match byte {
            IAC => match bytes.next() {
                Some(IAC) => out.push(IAC),
                Some(WILL | WONT | DO | DONT) => {
                    bytes.next();
                }
                Some(SB) => {
                    let mut previous = 0;
                    for byte in bytes.by_ref() {
                        if previous == IAC && byte == SE {
                            break;
                        }
                        previous = byte;
                    }
                }
                _ => {}
            },
            0 => {}
            _ => out.push(byte),
        }
    }
    out
}
