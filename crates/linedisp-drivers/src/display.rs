/*!
 * Display engine.
 *
 * A [`Display`] owns one [`RawChannel`] and shares one [`Protocol`]. Every
 * command asks the protocol for its bytes and writes them to the channel in
 * a single call while holding the display lock, so commands issued from
 * different threads never interleave on the wire.
 */
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::encoding::{encode_text, CodePage};
use crate::error::{DisplayError, Result};
use crate::protocol::{Command, CursorMove, Protocol, ScrollMode};

/// Minimal duplex byte stream a display talks through.
///
/// Implemented by transports (a serial port, a test double); the display
/// never implements it.
pub trait RawChannel: Send {
    /// Write `data`, returning how many bytes the transport accepted
    fn write(&mut self, data: &[u8]) -> io::Result<usize>;

    /// Read into `buf`, returning how many bytes were read
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Release the transport
    fn close(&mut self) -> io::Result<()>;
}

enum Link {
    Detached,
    Open(Box<dyn RawChannel>),
    Closed,
}

impl Link {
    fn state(&self) -> &'static str {
        match self {
            Link::Detached => "detached",
            Link::Open(_) => "open",
            Link::Closed => "closed",
        }
    }
}

struct Inner {
    link: Link,
    code_page: Option<CodePage>,
}

impl Inner {
    fn channel(&mut self) -> Result<&mut dyn RawChannel> {
        match &mut self.link {
            Link::Open(channel) => Ok(channel.as_mut()),
            Link::Detached | Link::Closed => Err(DisplayError::NotInitialized),
        }
    }
}

/// A line display bound to a protocol and, once opened, a channel
pub struct Display {
    protocol: Arc<dyn Protocol>,
    inner: Mutex<Inner>,
}

impl Display {
    /// Create a display with no channel. Every command fails with
    /// [`DisplayError::NotInitialized`] until a channel is attached.
    pub fn new(protocol: Arc<dyn Protocol>) -> Self {
        Self {
            protocol,
            inner: Mutex::new(Inner {
                link: Link::Detached,
                code_page: None,
            }),
        }
    }

    /// Attach the channel, making the display usable.
    ///
    /// Only a detached display accepts a channel; on an open or closed
    /// display the new channel is dropped unused.
    pub fn attach<C: RawChannel + 'static>(self, channel: C) -> Self {
        self.attach_boxed(Box::new(channel))
    }

    /// Attach an already boxed channel
    pub fn attach_boxed(mut self, channel: Box<dyn RawChannel>) -> Self {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Link::Detached = inner.link {
            inner.link = Link::Open(channel);
            debug!(protocol = self.protocol.name(), "Display channel attached");
        } else {
            debug!(
                protocol = self.protocol.name(),
                state = inner.link.state(),
                "Ignoring channel for a display that is not detached"
            );
        }
        self
    }

    /// The protocol this display speaks
    pub fn protocol(&self) -> &Arc<dyn Protocol> {
        &self.protocol
    }

    /// Whether a channel is attached and not yet closed
    pub fn is_open(&self) -> bool {
        matches!(self.lock().link, Link::Open(_))
    }

    /// The code page applied to row text, if any
    pub fn encoding(&self) -> Option<CodePage> {
        self.lock().code_page
    }

    /// Set the code page for subsequent [`print_row`](Self::print_row)
    /// calls. `None` sends text as UTF-8. Allowed in any state.
    pub fn set_encoding(&self, code_page: Option<CodePage>) {
        self.lock().code_page = code_page;
    }

    /// Close the channel.
    ///
    /// If the channel fails to close the display stays open and the error is
    /// returned. A closed display cannot be reopened.
    pub fn close(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.channel()?.close()?;
        inner.link = Link::Closed;
        debug!(protocol = self.protocol.name(), "Display closed");
        Ok(())
    }

    /// Reset the controller
    pub fn init(&self) -> Result<()> {
        self.execute(Command::Init)
    }

    /// Clear the display
    pub fn clear(&self) -> Result<()> {
        self.execute(Command::Clear)
    }

    /// Run the controller self-test
    pub fn test(&self) -> Result<()> {
        self.execute(Command::SelfTest)
    }

    /// Clear the current row
    pub fn clear_row(&self) -> Result<()> {
        self.execute(Command::ClearRow)
    }

    /// Show or hide the cursor
    pub fn cursor_visible(&self, visible: bool) -> Result<()> {
        self.execute(Command::CursorVisible(visible))
    }

    /// Overwrite mode
    pub fn mode_rewrite(&self) -> Result<()> {
        self.execute(Command::Mode(ScrollMode::Overwrite))
    }

    /// Vertical scroll mode
    pub fn mode_vscroll(&self) -> Result<()> {
        self.execute(Command::Mode(ScrollMode::VerticalScroll))
    }

    /// Horizontal scroll mode
    pub fn mode_hscroll(&self) -> Result<()> {
        self.execute(Command::Mode(ScrollMode::HorizontalScroll))
    }

    /// Set the brightness level
    pub fn brightness(&self, level: u8) -> Result<()> {
        self.execute(Command::Brightness(level))
    }

    /// Cursor one row up
    pub fn cursor_move_up(&self) -> Result<()> {
        self.execute(Command::CursorMove(CursorMove::Up))
    }

    /// Cursor one row down
    pub fn cursor_move_down(&self) -> Result<()> {
        self.execute(Command::CursorMove(CursorMove::Down))
    }

    /// Cursor one column right
    pub fn cursor_move_right(&self) -> Result<()> {
        self.execute(Command::CursorMove(CursorMove::Right))
    }

    /// Cursor one column left
    pub fn cursor_move_left(&self) -> Result<()> {
        self.execute(Command::CursorMove(CursorMove::Left))
    }

    /// Cursor to the top-left corner
    pub fn cursor_move_left_top(&self) -> Result<()> {
        self.execute(Command::CursorMove(CursorMove::TopLeft))
    }

    /// Cursor to the start of the current row
    pub fn cursor_move_begin_in_row(&self) -> Result<()> {
        self.execute(Command::CursorMove(CursorMove::RowStart))
    }

    /// Cursor to the end of the current row
    pub fn cursor_move_end_in_row(&self) -> Result<()> {
        self.execute(Command::CursorMove(CursorMove::RowEnd))
    }

    /// Cursor to the bottom row
    pub fn cursor_move_bottom(&self) -> Result<()> {
        self.execute(Command::CursorMove(CursorMove::Bottom))
    }

    /// Cursor to an absolute position
    pub fn cursor_move(&self, row: u8, col: u8) -> Result<()> {
        self.execute(Command::CursorMove(CursorMove::To { row, col }))
    }

    /// Print `text` on `row`, converting it to the configured code page first
    pub fn print_row(&self, row: u8, text: &str) -> Result<()> {
        let mut inner = self.lock();
        let code_page = inner.code_page;
        let channel = inner.channel()?;
        let encoded = encode_text(code_page.as_ref(), text)?;
        self.dispatch(channel, &Command::PrintRow { row, text: &encoded })
    }

    /// Turn an annunciator flag on or off
    pub fn flag_enable(&self, enabled: bool, num: u8) -> Result<()> {
        self.execute(Command::FlagEnable { enabled, num })
    }

    /// Turn every annunciator flag off
    pub fn flags_disable(&self) -> Result<()> {
        self.execute(Command::FlagsDisable)
    }

    /// Write raw bytes, bypassing the protocol
    pub fn send(&self, data: &[u8]) -> Result<()> {
        let mut inner = self.lock();
        write_checked(inner.channel()?, data)
    }

    /// Fill `buf` from the channel, bypassing the protocol.
    ///
    /// Reads repeatedly until the buffer is full, so short reads are
    /// absorbed. Stops at the first channel error; a read of zero bytes is
    /// reported as [`io::ErrorKind::UnexpectedEof`]. On error the count read
    /// so far is not returned, but those bytes are left at the front of
    /// `buf`. Holds the display lock for the whole fill, so commands wait
    /// for it to finish.
    pub fn receive(&self, buf: &mut [u8]) -> Result<usize> {
        let mut inner = self.lock();
        let channel = inner.channel()?;
        let mut filled = 0;
        while filled < buf.len() {
            match channel.read(&mut buf[filled..])? {
                0 => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("channel closed after {} of {} byte(s)", filled, buf.len()),
                    )
                    .into())
                }
                n => filled += n,
            }
        }
        Ok(filled)
    }

    fn execute(&self, command: Command<'_>) -> Result<()> {
        let mut inner = self.lock();
        let channel = inner.channel()?;
        self.dispatch(channel, &command)
    }

    fn dispatch(&self, channel: &mut dyn RawChannel, command: &Command<'_>) -> Result<()> {
        let data = self.protocol.encode(command);
        if data.is_empty() {
            return Err(DisplayError::NotSupported {
                command: command.name(),
            });
        }
        trace!(command = command.name(), len = data.len(), "Writing command");
        write_checked(channel, &data)
    }

    // Protocol and channel code runs under the lock and may panic. `link`
    // only changes after a channel call has returned, so a poisoned guard
    // still holds a consistent state.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn write_checked(channel: &mut dyn RawChannel, data: &[u8]) -> Result<()> {
    let written = channel.write(data)?;
    if written < data.len() {
        return Err(DisplayError::ShortWrite {
            expected: data.len(),
            actual: written,
        });
    }
    Ok(())
}

impl fmt::Debug for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("Display")
            .field("protocol", &self.protocol.name())
            .field("state", &inner.link.state())
            .field("encoding", &inner.code_page)
            .finish()
    }
}
