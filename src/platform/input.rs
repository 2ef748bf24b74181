//! Keyboard mapping and per-tick command buffering

use crate::sim::Command;

/// Map a key name (DOM `KeyboardEvent.key` / `code` style) to a command
pub fn command_for_key(key: &str) -> Option<Command> {
    match key {
        "ArrowLeft" | "a" | "A" | "KeyA" => Some(Command::MoveLeft),
        "ArrowRight" | "d" | "D" | "KeyD" => Some(Command::MoveRight),
        "ArrowUp" | "Space" | " " | "w" | "W" | "KeyW" => Some(Command::Jump),
        _ => None,
    }
}

/// Commands collected between ticks
///
/// Key events arrive at the host's pace; the frame driver drains the buffer
/// into the first tick of the next frame so no press is applied twice.
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    pending: Vec<Command>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns the command it mapped to, if any.
    pub fn press_key(&mut self, key: &str) -> Option<Command> {
        let command = command_for_key(key)?;
        self.pending.push(command);
        Some(command)
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Take everything recorded since the last drain
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        for key in ["ArrowLeft", "a", "A"] {
            assert_eq!(command_for_key(key), Some(Command::MoveLeft));
        }
        for key in ["ArrowRight", "d", "D"] {
            assert_eq!(command_for_key(key), Some(Command::MoveRight));
        }
        for key in ["ArrowUp", "Space", " ", "w", "W"] {
            assert_eq!(command_for_key(key), Some(Command::Jump));
        }
        assert_eq!(command_for_key("ArrowDown"), None);
        assert_eq!(command_for_key("Enter"), None);
    }

    #[test]
    fn test_buffer_drains_once() {
        let mut buffer = CommandBuffer::new();
        assert_eq!(buffer.press_key("a"), Some(Command::MoveLeft));
        assert_eq!(buffer.press_key("x"), None);
        buffer.push(Command::Jump);

        assert_eq!(buffer.drain(), vec![Command::MoveLeft, Command::Jump]);
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_empty());
    }
}
