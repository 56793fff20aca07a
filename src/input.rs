use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::{Duration, Instant};

/// conventional layout using left-hand side of qwerty keyboard
///   1 2 3 C      1 2 3 4
///   4 5 6 D  ->  q w e r
///   7 8 9 E  ->  a s d f
///   A 0 B F      z x c v
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// terminals only report presses, so a key counts as down for this long
/// after its last press (auto-repeat keeps a held key alive)
const KEY_HOLD: Duration = Duration::from_millis(150);

/// reads the 16-key keypad; keys are numbered 0x0..=0xf
pub trait Input {
    /// is `key` currently down
    fn is_pressed(&mut self, key: u8) -> Result<bool, io::Error>;

    /// block until a key is pressed and return it
    fn wait_key(&mut self) -> Result<u8, io::Error>;

    /// drain pending host events without blocking; called by the host between
    /// frames
    fn pump(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}

fn interrupted() -> io::Error {
    io::Error::new(io::ErrorKind::Interrupted, "quit requested from keyboard")
}

/// Input implementation reading the terminal in raw mode
pub struct StdinInput {
    pressed_at: [Option<Instant>; 16],
    keymap: HashMap<char, u8>,
}

impl StdinInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            pressed_at: [None; 16],
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
        })
    }

    /// map a key event to a keypad key; Esc and Ctrl-C are errors so they
    /// unwind through the interpreter to the host
    fn map_event(&self, evt: KeyEvent) -> Result<Option<u8>, io::Error> {
        match evt.code {
            KeyCode::Esc => Err(interrupted()),
            KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                Err(interrupted())
            }
            KeyCode::Char(key) => Ok(self.keymap.get(&key.to_ascii_lowercase()).copied()),
            _ => Ok(None),
        }
    }

    fn read_stdin(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                if let Some(key) = self.map_event(evt)? {
                    self.pressed_at[key as usize] = Some(Instant::now());
                }
            }
        }
        Ok(())
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for StdinInput {
    fn is_pressed(&mut self, key: u8) -> Result<bool, io::Error> {
        self.read_stdin()?;
        Ok(self.pressed_at[(key & 0xf) as usize]
            .map_or(false, |at| at.elapsed() < KEY_HOLD))
    }

    fn wait_key(&mut self) -> Result<u8, io::Error> {
        loop {
            if let Event::Key(evt) = read()? {
                if let Some(key) = self.map_event(evt)? {
                    self.pressed_at[key as usize] = Some(Instant::now());
                    return Ok(key);
                }
            }
        }
    }

    fn pump(&mut self) -> Result<(), io::Error> {
        self.read_stdin()
    }
}

/// scripted Input implementation for testing and headless runs
///
/// `held` keys always read as down; `wait_key` hands out `queued` keys in
/// order and fails once they run out rather than blocking forever
pub struct ScriptedInput {
    held: [bool; 16],
    queued: VecDeque<u8>,
}

impl ScriptedInput {
    pub fn new(held: &[u8], queued: &[u8]) -> Self {
        let mut keys = [false; 16];
        for &key in held {
            keys[(key & 0xf) as usize] = true;
        }
        ScriptedInput {
            held: keys,
            queued: queued.iter().copied().collect(),
        }
    }

    pub fn idle() -> Self {
        Self::new(&[], &[])
    }
}

impl Input for ScriptedInput {
    fn is_pressed(&mut self, key: u8) -> Result<bool, io::Error> {
        Ok(self.held[(key & 0xf) as usize])
    }

    fn wait_key(&mut self) -> Result<u8, io::Error> {
        self.queued.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted key left to wait for")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_covers_keypad() {
        let mut keys: Vec<u8> = CHIP8_CONVENTIONAL_KEYMAP.iter().map(|&(_, k)| k).collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_scripted_held_keys() -> Result<(), io::Error> {
        let mut input = ScriptedInput::new(&[0x1, 0xf], &[]);
        assert!(input.is_pressed(0x1)?);
        assert!(input.is_pressed(0xf)?);
        assert!(!input.is_pressed(0x2)?);
        Ok(())
    }

    #[test]
    fn test_scripted_wait_key_in_order() -> Result<(), io::Error> {
        let mut input = ScriptedInput::new(&[], &[0xa, 0x3]);
        assert_eq!(input.wait_key()?, 0xa);
        assert_eq!(input.wait_key()?, 0x3);
        assert_eq!(
            input.wait_key().unwrap_err().kind(),
            io::ErrorKind::UnexpectedEof
        );
        Ok(())
    }

    #[test]
    fn test_default_pump_is_noop() {
        assert!(ScriptedInput::idle().pump().is_ok());
    }
}
