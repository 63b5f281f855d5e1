/*!
 * Protocol definitions for linedisp.
 *
 * A protocol maps logical display commands to the exact bytes a controller
 * family expects. Protocols hold no state, so one instance can serve any
 * number of displays.
 */
use std::fmt::Debug;

use bytes::Bytes;

/// Scroll/overwrite behaviour when text reaches the end of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollMode {
    /// Overwrite from the start of the row
    Overwrite,
    /// Scroll rows vertically
    VerticalScroll,
    /// Scroll the current row horizontally
    HorizontalScroll,
}

/// A cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorMove {
    /// One row up
    Up,
    /// One row down
    Down,
    /// One column right
    Right,
    /// One column left
    Left,
    /// Top-left corner
    TopLeft,
    /// Start of the current row
    RowStart,
    /// End of the current row
    RowEnd,
    /// Bottom row
    Bottom,
    /// Absolute position
    To {
        /// Row index
        row: u8,
        /// Column index
        col: u8,
    },
}

/// One logical display command and its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Reset the controller
    Init,
    /// Clear the whole display
    Clear,
    /// Run the controller self-test
    SelfTest,
    /// Clear the current row
    ClearRow,
    /// Show or hide the cursor
    CursorVisible(bool),
    /// Select the scroll mode
    Mode(ScrollMode),
    /// Set the brightness level
    Brightness(u8),
    /// Move the cursor
    CursorMove(CursorMove),
    /// Print already-encoded text on a row
    PrintRow {
        /// Row index
        row: u8,
        /// Text in the display code page
        text: &'a [u8],
    },
    /// Turn an annunciator flag on or off
    FlagEnable {
        /// Whether the flag is lit
        enabled: bool,
        /// Flag number
        num: u8,
    },
    /// Turn every annunciator flag off
    FlagsDisable,
}

impl Command<'_> {
    /// A stable name for the command, used in errors and logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Init => "init",
            Command::Clear => "clear",
            Command::SelfTest => "test",
            Command::ClearRow => "clear_row",
            Command::CursorVisible(_) => "cursor_visible",
            Command::Mode(ScrollMode::Overwrite) => "mode_rewrite",
            Command::Mode(ScrollMode::VerticalScroll) => "mode_vscroll",
            Command::Mode(ScrollMode::HorizontalScroll) => "mode_hscroll",
            Command::Brightness(_) => "brightness",
            Command::CursorMove(CursorMove::Up) => "cursor_move_up",
            Command::CursorMove(CursorMove::Down) => "cursor_move_down",
            Command::CursorMove(CursorMove::Right) => "cursor_move_right",
            Command::CursorMove(CursorMove::Left) => "cursor_move_left",
            Command::CursorMove(CursorMove::TopLeft) => "cursor_move_left_top",
            Command::CursorMove(CursorMove::RowStart) => "cursor_move_begin_in_row",
            Command::CursorMove(CursorMove::RowEnd) => "cursor_move_end_in_row",
            Command::CursorMove(CursorMove::Bottom) => "cursor_move_bottom",
            Command::CursorMove(CursorMove::To { .. }) => "cursor_move",
            Command::PrintRow { .. } => "print_row",
            Command::FlagEnable { .. } => "flag_enable",
            Command::FlagsDisable => "flags_disable",
        }
    }
}

/// Protocol trait for display controller command sets
///
/// Every method returns the bytes for one command. An empty result means the
/// protocol cannot express the command; there is no other error channel.
/// The defaults return empty, so a protocol only overrides what its
/// controller understands.
pub trait Protocol: Send + Sync + Debug {
    /// Get the protocol name
    fn name(&self) -> &'static str;

    /// Controller reset
    fn init_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Clear the display
    fn clear_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Self-test
    fn test_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Clear the current row
    fn clear_row_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Cursor visibility
    fn cursor_visible_cmd(&self, _visible: bool) -> Bytes {
        Bytes::new()
    }

    /// Overwrite mode
    fn mode_rewrite_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Vertical scroll mode
    fn mode_vscroll_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Horizontal scroll mode
    fn mode_hscroll_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Brightness level
    fn brightness_cmd(&self, _level: u8) -> Bytes {
        Bytes::new()
    }

    /// Cursor one row up
    fn cursor_move_up_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Cursor one row down
    fn cursor_move_down_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Cursor one column right
    fn cursor_move_right_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Cursor one column left
    fn cursor_move_left_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Cursor to the top-left corner
    fn cursor_move_left_top_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Cursor to the start of the row
    fn cursor_move_begin_in_row_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Cursor to the end of the row
    fn cursor_move_end_in_row_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Cursor to the bottom row
    fn cursor_move_bottom_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Cursor to an absolute position
    fn cursor_move_cmd(&self, _row: u8, _col: u8) -> Bytes {
        Bytes::new()
    }

    /// Print a row. `text` is already in the display code page and the
    /// protocol adds its own framing. Unknown rows may return empty.
    fn print_row_cmd(&self, _row: u8, _text: &[u8]) -> Bytes {
        Bytes::new()
    }

    /// Annunciator flag on/off
    fn flag_enable_cmd(&self, _enabled: bool, _num: u8) -> Bytes {
        Bytes::new()
    }

    /// All annunciator flags off
    fn flags_disable_cmd(&self) -> Bytes {
        Bytes::new()
    }

    /// Encode a [`Command`] through the matching method
    fn encode(&self, command: &Command<'_>) -> Bytes {
        match *command {
            Command::Init => self.init_cmd(),
            Command::Clear => self.clear_cmd(),
            Command::SelfTest => self.test_cmd(),
            Command::ClearRow => self.clear_row_cmd(),
            Command::CursorVisible(visible) => self.cursor_visible_cmd(visible),
            Command::Mode(ScrollMode::Overwrite) => self.mode_rewrite_cmd(),
            Command::Mode(ScrollMode::VerticalScroll) => self.mode_vscroll_cmd(),
            Command::Mode(ScrollMode::HorizontalScroll) => self.mode_hscroll_cmd(),
            Command::Brightness(level) => self.brightness_cmd(level),
            Command::CursorMove(CursorMove::Up) => self.cursor_move_up_cmd(),
            Command::CursorMove(CursorMove::Down) => self.cursor_move_down_cmd(),
            Command::CursorMove(CursorMove::Right) => self.cursor_move_right_cmd(),
            Command::CursorMove(CursorMove::Left) => self.cursor_move_left_cmd(),
            Command::CursorMove(CursorMove::TopLeft) => self.cursor_move_left_top_cmd(),
            Command::CursorMove(CursorMove::RowStart) => self.cursor_move_begin_in_row_cmd(),
            Command::CursorMove(CursorMove::RowEnd) => self.cursor_move_end_in_row_cmd(),
            Command::CursorMove(CursorMove::Bottom) => self.cursor_move_bottom_cmd(),
            Command::CursorMove(CursorMove::To { row, col }) => self.cursor_move_cmd(row, col),
            Command::PrintRow { row, text } => self.print_row_cmd(row, text),
            Command::FlagEnable { enabled, num } => self.flag_enable_cmd(enabled, num),
            Command::FlagsDisable => self.flags_disable_cmd(),
        }
    }

    /// Whether the protocol can express `command`
    fn supports(&self, command: &Command<'_>) -> bool {
        !self.encode(command).is_empty()
    }
}
