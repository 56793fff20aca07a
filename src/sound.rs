use beep::beep;
use std::io;

/// the buzzer; the interpreter tells it whether a tone should be audible
/// once per timer tick while the sound timer runs
pub trait Sound {
    fn set_tone(&mut self, active: bool) -> Result<(), io::Error>;
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// PC speaker beeper; only talks to the device when the tone changes
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn set_tone(&mut self, active: bool) -> Result<(), io::Error> {
        if active == self.is_beeping {
            return Ok(());
        }
        let pitch = if active { SIMPLEBEEP_PITCH } else { 0 };
        beep(pitch).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        self.is_beeping = active;
        Ok(())
    }
}

impl Drop for SimpleBeep {
    fn drop(&mut self) {
        if self.is_beeping {
            let _ = beep(0);
        }
    }
}

/// silent; remembers every request so tests can inspect them
#[derive(Default)]
pub struct Mute {
    pub history: Vec<bool>,
}

impl Mute {
    pub fn new() -> Self {
        Mute::default()
    }
}

impl Sound for Mute {
    fn set_tone(&mut self, active: bool) -> Result<(), io::Error> {
        self.history.push(active);
        Ok(())
    }
}
