//! CHIP-8 emulator binary.
//!
//! Runs a ROM in the terminal:
//!
//! ```bash
//! chip8vm --rom-path roms/pong.ch8
//! ```
//!
//! Optional parameters:
//! - `--frame-rate`: display refresh and timer rate in Hz (default: 60)
//! - `--speed`: instructions executed per frame, 1-100 (default: 10)
//!
//! The CHIP-8 keypad is mapped to QWERTY keys:
//!
//! ```text
//! CHIP-8 Keypad    QWERTY Keyboard
//! 1 2 3 C          1 2 3 4
//! 4 5 6 D          Q W E R
//! 7 8 9 E          A S D F
//! A 0 B F          Z X C V
//! ```
//!
//! Press **Space** to pause and **Escape** to exit. Diagnostics (unknown
//! opcodes, stack faults) are logged through `env_logger`; set `RUST_LOG` to
//! see them.

use clap::Parser;

use chip8vm::host::{Host, Settings, DEFAULT_FRAME_RATE};
use chip8vm::state::DEFAULT_SPEED;
use chip8vm::Chip8;

#[doc(hidden)]
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = DEFAULT_FRAME_RATE, help = "Frame rate in frames per second")]
    frame_rate: u64,

    #[arg(short, long, default_value_t = DEFAULT_SPEED, help = "Instructions executed per frame (1-100)")]
    speed: u32,

    #[arg(short, long, help = "Path to the ROM file to run")]
    rom_path: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let settings = Settings::new(args.frame_rate, args.speed, args.rom_path);
    let mut host = Host::new(Chip8::new(), settings);

    host.run()?;

    Ok(())
}
