//! Drive zones and the command table.
//!
//! Every zone of the control panel maps to one ASCII byte understood by the
//! vehicle. Bytes go out verbatim, with no framing or terminator.

use std::fmt;

/// A named region of the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Zone {
    #[default]
    None = 0,
    Up = 1,
    Down = 2,
    Left = 3,
    Right = 4,
    UpLeft = 5,
    UpRight = 6,
    DownLeft = 7,
    DownRight = 8,
    TurboUp = 9,
    TurboUpLeft = 10,
    TurboUpRight = 11,
}

/// Rows of the control panel, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelRow {
    Turbo,
    Up,
    Middle,
    Down,
}

impl PanelRow {
    pub const ALL: [PanelRow; 4] = [
        PanelRow::Turbo,
        PanelRow::Up,
        PanelRow::Middle,
        PanelRow::Down,
    ];

    /// Button slots of the row from left to right. `None` is an empty cell.
    pub fn slots(self) -> [Option<Zone>; 3] {
        match self {
            PanelRow::Turbo => [
                Some(Zone::TurboUpLeft),
                Some(Zone::TurboUp),
                Some(Zone::TurboUpRight),
            ],
            PanelRow::Up => [Some(Zone::UpLeft), Some(Zone::Up), Some(Zone::UpRight)],
            PanelRow::Middle => [Some(Zone::Left), None, Some(Zone::Right)],
            PanelRow::Down => [
                Some(Zone::DownLeft),
                Some(Zone::Down),
                Some(Zone::DownRight),
            ],
        }
    }
}

impl Zone {
    /// Hit-test order. When rectangles overlap, the zone tested last wins.
    pub const EVALUATION_ORDER: [Zone; 11] = [
        Zone::Right,
        Zone::Left,
        Zone::Up,
        Zone::Down,
        Zone::DownRight,
        Zone::DownLeft,
        Zone::UpRight,
        Zone::UpLeft,
        Zone::TurboUpRight,
        Zone::TurboUpLeft,
        Zone::TurboUp,
    ];

    /// Byte written to the link while this zone is active.
    pub fn command_byte(self) -> Option<u8> {
        match self {
            Zone::None => None,
            Zone::DownLeft => Some(b'0'),
            Zone::DownRight => Some(b'1'),
            Zone::UpLeft => Some(b'2'),
            Zone::UpRight => Some(b'3'),
            Zone::Up => Some(b'c'),
            Zone::Left => Some(b'b'),
            Zone::Down => Some(b'a'),
            Zone::Right => Some(b'd'),
            Zone::TurboUpLeft => Some(b'x'),
            Zone::TurboUpRight => Some(b'y'),
            Zone::TurboUp => Some(b'z'),
        }
    }

    /// Row that hosts the zone's button.
    pub fn row(self) -> Option<PanelRow> {
        match self {
            Zone::None => None,
            Zone::Up | Zone::UpLeft | Zone::UpRight => Some(PanelRow::Up),
            Zone::Left | Zone::Right => Some(PanelRow::Middle),
            Zone::Down | Zone::DownLeft | Zone::DownRight => Some(PanelRow::Down),
            Zone::TurboUp | Zone::TurboUpLeft | Zone::TurboUpRight => Some(PanelRow::Turbo),
        }
    }

    /// Short glyph drawn on the panel button.
    pub fn glyph(self) -> &'static str {
        match self {
            Zone::None => "",
            Zone::Up => "▲",
            Zone::Down => "▼",
            Zone::Left => "◀",
            Zone::Right => "▶",
            Zone::UpLeft => "◤",
            Zone::UpRight => "◥",
            Zone::DownLeft => "◣",
            Zone::DownRight => "◢",
            Zone::TurboUp => "⏫",
            Zone::TurboUpLeft => "T◤",
            Zone::TurboUpRight => "T◥",
        }
    }

    pub(crate) fn from_u8(value: u8) -> Zone {
        match value {
            1 => Zone::Up,
            2 => Zone::Down,
            3 => Zone::Left,
            4 => Zone::Right,
            5 => Zone::UpLeft,
            6 => Zone::UpRight,
            7 => Zone::DownLeft,
            8 => Zone::DownRight,
            9 => Zone::TurboUp,
            10 => Zone::TurboUpLeft,
            11 => Zone::TurboUpRight,
            _ => Zone::None,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Zone::None => "None",
            Zone::Up => "Up",
            Zone::Down => "Down",
            Zone::Left => "Left",
            Zone::Right => "Right",
            Zone::UpLeft => "UpLeft",
            Zone::UpRight => "UpRight",
            Zone::DownLeft => "DownLeft",
            Zone::DownRight => "DownRight",
            Zone::TurboUp => "TurboUp",
            Zone::TurboUpLeft => "TurboUpLeft",
            Zone::TurboUpRight => "TurboUpRight",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_table() {
        let table = [
            (Zone::DownLeft, b'0'),
            (Zone::DownRight, b'1'),
            (Zone::UpLeft, b'2'),
            (Zone::UpRight, b'3'),
            (Zone::Up, b'c'),
            (Zone::Left, b'b'),
            (Zone::Down, b'a'),
            (Zone::Right, b'd'),
            (Zone::TurboUpLeft, b'x'),
            (Zone::TurboUpRight, b'y'),
            (Zone::TurboUp, b'z'),
        ];
        for (zone, byte) in table {
            assert_eq!(zone.command_byte(), Some(byte), "{zone}");
        }
        assert_eq!(Zone::None.command_byte(), None);
    }

    #[test]
    fn test_evaluation_order_covers_every_drive_zone_once() {
        for zone in Zone::EVALUATION_ORDER {
            assert_ne!(zone, Zone::None);
            let count = Zone::EVALUATION_ORDER
                .iter()
                .filter(|z| **z == zone)
                .count();
            assert_eq!(count, 1, "{zone} listed {count} times");
        }
    }

    #[test]
    fn test_rows_host_their_zones() {
        for row in PanelRow::ALL {
            for zone in row.slots().into_iter().flatten() {
                assert_eq!(zone.row(), Some(row));
            }
        }
    }

    #[test]
    fn test_u8_representation_is_stable() {
        for zone in Zone::EVALUATION_ORDER {
            assert_eq!(Zone::from_u8(zone as u8), zone);
        }
        assert_eq!(Zone::from_u8(0), Zone::None);
        assert_eq!(Zone::from_u8(200), Zone::None);
    }
}
