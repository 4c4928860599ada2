//! Keyboard shortcut table

/// Keys the player reacts to, normalized by the host from its raw key
/// events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    K,
    J,
    L,
    M,
    F,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    /// `,` and `<`
    Comma,
    /// `.` and `>`
    Period,
    /// 0 through 9
    Digit(u8),
    Other,
}

/// Where keyboard focus sits when a key arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The player container itself
    Player,

    /// The page body; global shortcuts stay active
    Body,

    /// A text input, textarea, select, or content-editable element;
    /// shortcuts must not steal these keystrokes
    TextEntry,

    Other,
}

/// What a key press asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyCommand {
    TogglePlay,
    /// Short seek, ±1 step of the configured arrow-key amount
    SeekShort(i8),
    /// Long seek, ±1 step of the configured J/L amount
    SeekLong(i8),
    /// Volume nudge, ±1 step of the configured amount
    VolumeStep(i8),
    ToggleMute,
    ToggleFullscreen,
    /// One position through the fixed rate list
    RateStep(i8),
    /// Seek to digit × 10 percent of the duration
    SeekTenth(u8),
}

/// Outcome of routing one key press
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyDispatch {
    pub command: KeyCommand,

    /// Whether the host should suppress its default handling; only the
    /// volume arrows do, so horizontal arrows keep their page behavior
    pub prevent_default: bool,
}

/// Route a key press to a command, honoring the focus rules
///
/// Returns `None` for keys outside the table and for presses that arrived
/// while a text-entry element held focus.
pub fn route_key(key: Key, target: FocusTarget) -> Option<KeyDispatch> {
    match target {
        FocusTarget::Player | FocusTarget::Body => {}
        FocusTarget::TextEntry | FocusTarget::Other => return None,
    }

    let (command, prevent_default) = match key {
        Key::Space | Key::K => (KeyCommand::TogglePlay, false),
        Key::J => (KeyCommand::SeekLong(-1), false),
        Key::L => (KeyCommand::SeekLong(1), false),
        Key::ArrowLeft => (KeyCommand::SeekShort(-1), false),
        Key::ArrowRight => (KeyCommand::SeekShort(1), false),
        Key::ArrowUp => (KeyCommand::VolumeStep(1), true),
        Key::ArrowDown => (KeyCommand::VolumeStep(-1), true),
        Key::M => (KeyCommand::ToggleMute, false),
        Key::F => (KeyCommand::ToggleFullscreen, false),
        Key::Comma => (KeyCommand::RateStep(-1), false),
        Key::Period => (KeyCommand::RateStep(1), false),
        Key::Digit(digit) if digit <= 9 => (KeyCommand::SeekTenth(digit), false),
        Key::Digit(_) | Key::Other => return None,
    };

    Some(KeyDispatch {
        command,
        prevent_default,
    })
}
