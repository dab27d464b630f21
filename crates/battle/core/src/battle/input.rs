/// Keyboard input forwarded by the driver during ally selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputKey {
    Up,
    Down,
    Left,
    Right,
    /// SELECT / ENTER.
    Select,
    /// CANCEL / ESCAPE.
    Cancel,
    /// Alphabetic jump-scroll in skill and item lists.
    Char(char),
}
