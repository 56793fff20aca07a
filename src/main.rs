use clap::Parser;
use std::error::Error;
use std::fs;

use chip8_vm::config::Config;
use chip8_vm::display::{Display, HeadlessDisplay, MonoTermDisplay};
use chip8_vm::input::{Input, ScriptedInput, StdinInput};
use chip8_vm::interpreter::Chip8Interpreter;
use chip8_vm::scheduler::{self, Schedule};
use chip8_vm::sound::{Mute, SimpleBeep, Sound};

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    let rom = fs::read(&config.rom)
        .map_err(|e| format!("can't read {}: {}", config.rom.display(), e))?;

    // initialise
    let mut display: Box<dyn Display> = if config.headless {
        Box::new(HeadlessDisplay::new())
    } else {
        Box::new(MonoTermDisplay::new()?)
    };
    let mut input: Box<dyn Input> = if config.headless {
        Box::new(ScriptedInput::idle())
    } else {
        Box::new(StdinInput::new()?)
    };
    let mut sound: Box<dyn Sound> = if config.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    let outcome = {
        let mut interpreter =
            Chip8Interpreter::new(display.as_mut(), input.as_mut(), sound.as_mut());
        if let Some(seed) = config.seed {
            interpreter = interpreter.with_seed(seed);
        }
        interpreter.reset();
        interpreter.load_program(&rom)?;

        let schedule = Schedule {
            instructions_per_frame: config.instructions_per_frame,
            frame_period: config.frame_period(),
            timer_period: config.timer_period(),
            max_frames: config.frames,
        };
        scheduler::run(&mut interpreter, &schedule)
            .map_err(|e| (e, interpreter.pc(), *interpreter.registers()))
    };

    // put the terminal back before saying anything
    drop(input);
    drop(display);
    drop(sound);
    println!();

    match outcome {
        Ok(frames) => {
            eprintln!("stopped after {} frames", frames);
            Ok(())
        }
        Err((e, _, _)) if e.is_interrupt() => Ok(()),
        Err((e, pc, v)) => {
            eprintln!("halted at pc={:#06x} v={:02x?}", pc, v);
            Err(e.into())
        }
    }
}

