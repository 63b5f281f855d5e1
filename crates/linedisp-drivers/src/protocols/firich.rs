/*!
 * Firich customer display protocol.
 *
 * Two-row VFD controllers using ESC-prefixed command sequences. Only rows 1
 * and 2 can be addressed by the print command.
 */
use bytes::{BufMut, Bytes, BytesMut};

use crate::protocol::Protocol;

/// Protocol name used for lookup
pub const NAME: &str = "firich";

const ESC: u8 = 0x1B;
const US: u8 = 0x1F;
const CR: u8 = 0x0D;

/// Firich command set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirichProtocol;

impl FirichProtocol {
    /// Create a new Firich protocol instance
    pub fn new() -> Self {
        Self
    }

    fn row_select(row: u8) -> Option<u8> {
        match row {
            1 => Some(0x41),
            2 => Some(0x42),
            _ => None,
        }
    }
}

impl Protocol for FirichProtocol {
    fn name(&self) -> &'static str {
        NAME
    }

    fn init_cmd(&self) -> Bytes {
        Bytes::from_static(&[ESC, 0x40])
    }

    fn clear_cmd(&self) -> Bytes {
        Bytes::from_static(&[0x0C])
    }

    fn test_cmd(&self) -> Bytes {
        Bytes::from_static(&[US, 0x40])
    }

    fn clear_row_cmd(&self) -> Bytes {
        Bytes::from_static(&[0x18])
    }

    fn cursor_visible_cmd(&self, visible: bool) -> Bytes {
        Bytes::copy_from_slice(&[ESC, 0x5F, u8::from(visible)])
    }

    fn mode_rewrite_cmd(&self) -> Bytes {
        Bytes::from_static(&[ESC, 0x11])
    }

    fn mode_vscroll_cmd(&self) -> Bytes {
        Bytes::from_static(&[ESC, 0x12])
    }

    fn mode_hscroll_cmd(&self) -> Bytes {
        Bytes::from_static(&[ESC, 0x13])
    }

    fn brightness_cmd(&self, level: u8) -> Bytes {
        Bytes::copy_from_slice(&[ESC, 0x2A, level])
    }

    fn cursor_move_up_cmd(&self) -> Bytes {
        Bytes::from_static(&[ESC, 0x5B, 0x41])
    }

    fn cursor_move_down_cmd(&self) -> Bytes {
        Bytes::from_static(&[ESC, 0x5B, 0x42])
    }

    fn cursor_move_right_cmd(&self) -> Bytes {
        Bytes::from_static(&[ESC, 0x5B, 0x43])
    }

    fn cursor_move_left_cmd(&self) -> Bytes {
        Bytes::from_static(&[ESC, 0x5B, 0x44])
    }

    fn cursor_move_left_top_cmd(&self) -> Bytes {
        Bytes::from_static(&[ESC, 0x5B, 0x48])
    }

    fn cursor_move_begin_in_row_cmd(&self) -> Bytes {
        Bytes::from_static(&[ESC, 0x5B, 0x4C])
    }

    fn cursor_move_end_in_row_cmd(&self) -> Bytes {
        Bytes::from_static(&[ESC, 0x5B, 0x52])
    }

    fn cursor_move_bottom_cmd(&self) -> Bytes {
        Bytes::from_static(&[ESC, 0x5B, 0x4B])
    }

    // Column comes before row on the wire.
    fn cursor_move_cmd(&self, row: u8, col: u8) -> Bytes {
        Bytes::copy_from_slice(&[ESC, 0x6C, col, row])
    }

    fn print_row_cmd(&self, row: u8, text: &[u8]) -> Bytes {
        let Some(select) = Self::row_select(row) else {
            return Bytes::new();
        };
        let mut buf = BytesMut::with_capacity(text.len() + 4);
        buf.put_slice(&[ESC, 0x51, select]);
        buf.put_slice(text);
        buf.put_u8(CR);
        buf.freeze()
    }

    fn flag_enable_cmd(&self, enabled: bool, num: u8) -> Bytes {
        Bytes::copy_from_slice(&[US, 0x23, u8::from(enabled), num])
    }

    fn flags_disable_cmd(&self) -> Bytes {
        Bytes::from_static(&[ESC, 0x7A])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Command, CursorMove, ScrollMode};

    fn encoded(command: Command<'_>) -> Vec<u8> {
        FirichProtocol.encode(&command).to_vec()
    }

    #[test]
    fn test_fixed_commands() {
        assert_eq!(encoded(Command::Init), [0x1B, 0x40]);
        assert_eq!(encoded(Command::Clear), [0x0C]);
        assert_eq!(encoded(Command::SelfTest), [0x1F, 0x40]);
        assert_eq!(encoded(Command::ClearRow), [0x18]);
        assert_eq!(encoded(Command::FlagsDisable), [0x1B, 0x7A]);
    }

    #[test]
    fn test_modes() {
        assert_eq!(encoded(Command::Mode(ScrollMode::Overwrite)), [0x1B, 0x11]);
        assert_eq!(encoded(Command::Mode(ScrollMode::VerticalScroll)), [0x1B, 0x12]);
        assert_eq!(encoded(Command::Mode(ScrollMode::HorizontalScroll)), [0x1B, 0x13]);
    }

    #[test]
    fn test_parameterized_commands() {
        assert_eq!(encoded(Command::CursorVisible(true)), [0x1B, 0x5F, 0x01]);
        assert_eq!(encoded(Command::CursorVisible(false)), [0x1B, 0x5F, 0x00]);
        assert_eq!(encoded(Command::Brightness(4)), [0x1B, 0x2A, 0x04]);
        assert_eq!(
            encoded(Command::FlagEnable { enabled: true, num: 3 }),
            [0x1F, 0x23, 0x01, 0x03]
        );
        assert_eq!(
            encoded(Command::FlagEnable { enabled: false, num: 7 }),
            [0x1F, 0x23, 0x00, 0x07]
        );
    }

    #[test]
    fn test_cursor_moves() {
        let cases = [
            (CursorMove::Up, 0x41u8),
            (CursorMove::Down, 0x42),
            (CursorMove::Right, 0x43),
            (CursorMove::Left, 0x44),
            (CursorMove::TopLeft, 0x48),
            (CursorMove::RowStart, 0x4C),
            (CursorMove::RowEnd, 0x52),
            (CursorMove::Bottom, 0x4B),
        ];
        for (movement, code) in cases {
            assert_eq!(encoded(Command::CursorMove(movement)), [0x1B, 0x5B, code]);
        }
        assert_eq!(
            encoded(Command::CursorMove(CursorMove::To { row: 2, col: 10 })),
            [0x1B, 0x6C, 10, 2]
        );
    }

    #[test]
    fn test_print_row_framing() {
        assert_eq!(
            encoded(Command::PrintRow { row: 1, text: b"Total" }),
            [0x1B, 0x51, 0x41, b'T', b'o', b't', b'a', b'l', 0x0D]
        );
        assert_eq!(
            encoded(Command::PrintRow { row: 2, text: b"" }),
            [0x1B, 0x51, 0x42, 0x0D]
        );
    }

    #[test]
    fn test_print_row_unknown_row_is_unsupported() {
        assert!(encoded(Command::PrintRow { row: 0, text: b"x" }).is_empty());
        assert!(encoded(Command::PrintRow { row: 3, text: b"x" }).is_empty());
    }
}
