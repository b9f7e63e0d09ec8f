//! Terminal frontend for the virtual machine.
//!
//! This module is the outer loop the VM itself stays ignorant of: it loads
//! the ROM, drives [`Chip8::emulate_cycle`] at the configured frame rate,
//! feeds key events into the input gate, and renders the framebuffer plus a
//! small debug readout with ratatui.
//!
//! Keyboard input arrives on a background rdev listener thread and is only
//! mirrored into thread-safe snapshots there; the emulator thread drains the
//! snapshot into the VM once per frame, so the VM itself sees a strictly
//! single-threaded caller.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::{
    event,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use rdev::{listen, EventType, Key as RdevKey};

use crate::disasm;
use crate::state::{DISPLAY_HEIGHT, DISPLAY_WIDTH, NUM_KEYS};
use crate::vm::Chip8;

/// Default frame rate in frames per second. Driving the VM at 60 Hz gives
/// the canonical 60 Hz timer rate.
pub const DEFAULT_FRAME_RATE: u64 = 60;

/// Runtime configuration for the host, typically filled from the command
/// line.
pub struct Settings {
    /// Frame rate in frames per second for display updates and timer
    /// decrements.
    pub frame_rate: u64,

    /// Instructions executed per emulation cycle (the VM speed multiplier).
    pub speed: u32,

    /// Path to the ROM file to run.
    pub rom: PathBuf,
}

impl Settings {
    pub fn new(frame_rate: u64, speed: u32, rom: String) -> Self {
        Settings {
            frame_rate,
            speed,
            rom: rom.into(),
        }
    }
}

/// Converts an rdev keyboard key to the corresponding CHIP-8 key index.
///
/// The mapping follows the common 4x4 convention:
///
/// ```text
/// Keyboard    CHIP-8
/// 1 2 3 4  →  1 2 3 C
/// Q W E R  →  4 5 6 D
/// A S D F  →  7 8 9 E
/// Z X C V  →  A 0 B F
/// ```
fn chip8_key(key: rdev::Key) -> Option<u8> {
    match key {
        RdevKey::Num1 => Some(0x1),
        RdevKey::Num2 => Some(0x2),
        RdevKey::Num3 => Some(0x3),
        RdevKey::Num4 => Some(0xC),
        RdevKey::KeyQ => Some(0x4),
        RdevKey::KeyW => Some(0x5),
        RdevKey::KeyE => Some(0x6),
        RdevKey::KeyR => Some(0xD),
        RdevKey::KeyA => Some(0x7),
        RdevKey::KeyS => Some(0x8),
        RdevKey::KeyD => Some(0x9),
        RdevKey::KeyF => Some(0xE),
        RdevKey::KeyZ => Some(0xA),
        RdevKey::KeyX => Some(0x0),
        RdevKey::KeyC => Some(0xB),
        RdevKey::KeyV => Some(0xF),
        _ => None,
    }
}

/// Global keyboard listener for the host.
///
/// A background thread listens for key events using `rdev` and mirrors them
/// into thread-safe snapshots. The emulator thread polls those snapshots;
/// it never blocks on input and the listener never touches the VM.
pub struct Keypad {
    /// CHIP-8 key indices currently held down.
    pressed_keys: Arc<Mutex<HashSet<u8>>>,

    /// Whether Escape is currently held, used to exit the emulator.
    escape_pressed: Arc<Mutex<bool>>,

    /// Latched on a Space press and taken by the host to toggle pause.
    pause_requested: Arc<Mutex<bool>>,
}

impl Keypad {
    /// Creates the keypad and starts the background listener thread. The
    /// thread runs for the lifetime of the process.
    pub fn new() -> Self {
        let pressed_keys = Arc::new(Mutex::new(HashSet::new()));
        let escape_pressed = Arc::new(Mutex::new(false));
        let pause_requested = Arc::new(Mutex::new(false));
        let pressed_keys_clone = pressed_keys.clone();
        let escape_pressed_clone = escape_pressed.clone();
        let pause_requested_clone = pause_requested.clone();

        std::thread::spawn(move || {
            if let Err(error) = listen(move |event| {
                match event.event_type {
                    EventType::KeyPress(key) => {
                        if key == RdevKey::Escape {
                            *escape_pressed_clone.lock().unwrap() = true;
                        } else if key == RdevKey::Space {
                            *pause_requested_clone.lock().unwrap() = true;
                        } else if let Some(chip8_key) = chip8_key(key) {
                            pressed_keys_clone.lock().unwrap().insert(chip8_key);
                        }
                    }
                    EventType::KeyRelease(key) => {
                        if key == RdevKey::Escape {
                            *escape_pressed_clone.lock().unwrap() = false;
                        } else if let Some(chip8_key) = chip8_key(key) {
                            pressed_keys_clone.lock().unwrap().remove(&chip8_key);
                        }
                    }
                    _ => {}
                }
            }) {
                log::error!("error listening for key events: {:?}", error);
            }
        });

        Keypad {
            pressed_keys,
            escape_pressed,
            pause_requested,
        }
    }

    /// Checks if a specific CHIP-8 key is currently pressed (non-blocking).
    pub fn is_key_pressed(&self, key: u8) -> bool {
        self.pressed_keys.lock().unwrap().contains(&key)
    }

    /// Checks if the Escape key is currently pressed.
    pub fn is_escape_pressed(&self) -> bool {
        *self.escape_pressed.lock().unwrap()
    }

    /// Takes a pending pause toggle, clearing it.
    pub fn take_pause_request(&self) -> bool {
        std::mem::take(&mut *self.pause_requested.lock().unwrap())
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal host wrapping a [`Chip8`] VM.
pub struct Host {
    vm: Chip8,
    keypad: Keypad,
    settings: Settings,
}

impl Host {
    /// Creates a host around an already-constructed VM.
    pub fn new(vm: Chip8, settings: Settings) -> Self {
        Host {
            vm,
            keypad: Keypad::new(),
            settings,
        }
    }

    /// Loads the configured ROM and runs the emulation loop until Escape is
    /// pressed.
    ///
    /// Each frame: drain terminal events so they are not echoed, apply any
    /// pause toggle, mirror the keyboard snapshot into the VM, run one
    /// emulation cycle, render, and sleep out the rest of the frame budget.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.settings.frame_rate as f64);
        let rom_stem: String = self
            .settings
            .rom
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Unknown ROM".to_string());
        let rom_data = std::fs::read(&self.settings.rom)?;

        self.vm.reset();
        self.vm.set_speed(self.settings.speed);
        self.vm.load_rom(&rom_data)?;

        enable_raw_mode()?;
        let stdout = std::io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        'mainloop: loop {
            let frame_start = Instant::now();

            if self.keypad.is_escape_pressed() {
                terminal.clear()?;
                break 'mainloop;
            }

            // Throw away pending terminal events so keystrokes don't echo
            // into the UI; real input comes from the rdev listener.
            while event::poll(Duration::ZERO)? {
                let _ = event::read()?;
            }

            if self.keypad.take_pause_request() {
                let paused = self.vm.paused();
                self.vm.set_paused(!paused);
            }
            self.sync_keys();
            self.vm.emulate_cycle();

            terminal.draw(|frame| self.draw(frame, frame.area(), &rom_stem))?;
            if self.vm.draw_flag() {
                self.vm.set_draw_flag(false);
            }

            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                std::thread::sleep(frame_duration - elapsed);
            }
        }
        disable_raw_mode()?;

        Ok(())
    }

    /// Mirrors the keyboard snapshot into the VM's input gate.
    fn sync_keys(&mut self) {
        for key in 0..NUM_KEYS as u8 {
            let pressed = self.keypad.is_key_pressed(key);
            if pressed == self.vm.keys()[key as usize] {
                continue;
            }
            if pressed {
                self.vm.key_press(key);
            } else {
                self.vm.key_release(key);
            }
        }
    }

    /// Renders the complete interface: game screen, keypad legend, and the
    /// machine debug readout.
    fn draw(&self, frame: &mut ratatui::Frame, area: Rect, rom_name: &str) {
        // Half-block rendering halves the terminal rows the screen needs.
        let game_height = (DISPLAY_HEIGHT as u16) / 2 + 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(game_height),
                Constraint::Length(7),
                Constraint::Min(0),
            ])
            .split(area);

        self.draw_game_screen(frame, chunks[0], rom_name);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(chunks[1]);

        self.draw_keypad_help(frame, panels[0]);
        self.draw_machine_panel(frame, panels[1]);
    }

    /// Renders the framebuffer, packing two pixel rows into every terminal
    /// row with half-block characters.
    fn draw_game_screen(&self, frame: &mut ratatui::Frame, area: Rect, rom_name: &str) {
        let panel_width = DISPLAY_WIDTH as u16 + 2;
        let panel_height = (DISPLAY_HEIGHT as u16) / 2 + 2;
        let margin = area.width.saturating_sub(panel_width) / 2;
        let panel = Rect {
            x: area.x + margin,
            y: area.y,
            width: panel_width.min(area.width),
            height: panel_height.min(area.height),
        };

        let mut text = String::new();
        for pair in 0..DISPLAY_HEIGHT / 2 {
            for col in 0..DISPLAY_WIDTH {
                let top = self.vm.pixel(2 * pair, col);
                let bottom = self.vm.pixel(2 * pair + 1, col);
                text.push(match (top, bottom) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                });
            }
            text.push('\n');
        }

        let title = if self.vm.paused() {
            format!("{} [paused]", rom_name)
        } else {
            rom_name.to_string()
        };
        frame.render_widget(
            Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title)),
            panel,
        );
    }

    /// Renders the keypad legend. Each cell pairs a CHIP-8 key with the
    /// keyboard key that drives it, mirroring [`chip8_key`].
    fn draw_keypad_help(&self, frame: &mut ratatui::Frame, area: Rect) {
        const LEGEND: [[(char, char); 4]; 4] = [
            [('1', '1'), ('2', '2'), ('3', '3'), ('C', '4')],
            [('4', 'Q'), ('5', 'W'), ('6', 'E'), ('D', 'R')],
            [('7', 'A'), ('8', 'S'), ('9', 'D'), ('E', 'F')],
            [('A', 'Z'), ('0', 'X'), ('B', 'C'), ('F', 'V')],
        ];

        let mut text = String::new();
        for legend_row in LEGEND {
            for (pad, keyboard) in legend_row {
                text.push_str(&format!("  {} [{}]", pad, keyboard));
            }
            text.push('\n');
        }
        text.push_str("  Space pauses, Esc quits");

        frame.render_widget(
            Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).title("Keypad [keyboard]"))
                .style(Style::default().fg(Color::Gray)),
            area,
        );
    }

    /// Renders registers, timers, and the disassembly of the last executed
    /// instruction.
    fn draw_machine_panel(&self, frame: &mut ratatui::Frame, area: Rect) {
        let vm = &self.vm;
        let mut lines = String::new();

        lines.push_str(&format!(
            "PC {:03X}   I {:03X}   SP {:X}   DT {:02X}   ST {:02X}\n",
            vm.pc(),
            vm.i(),
            vm.sp(),
            vm.delay_timer(),
            vm.sound_timer()
        ));
        for half in 0..2 {
            for reg in (half * 8)..(half * 8 + 8) {
                lines.push_str(&format!("V{:X} {:02X}  ", reg, vm.v()[reg]));
            }
            lines.push('\n');
        }
        let op = vm.last_instruction();
        lines.push_str(&format!("{:04X}  {}\n", op, disasm::disassemble(op)));
        if vm.waiting_for_key_press() {
            lines.push_str("waiting for key press\n");
        } else {
            lines.push_str(&format!("{}\n", disasm::describe(op)));
        }

        let machine_paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Machine"))
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(machine_paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chip8_key_mapping_covers_all_sixteen_keys() {
        let mapped: HashSet<u8> = [
            RdevKey::Num1,
            RdevKey::Num2,
            RdevKey::Num3,
            RdevKey::Num4,
            RdevKey::KeyQ,
            RdevKey::KeyW,
            RdevKey::KeyE,
            RdevKey::KeyR,
            RdevKey::KeyA,
            RdevKey::KeyS,
            RdevKey::KeyD,
            RdevKey::KeyF,
            RdevKey::KeyZ,
            RdevKey::KeyX,
            RdevKey::KeyC,
            RdevKey::KeyV,
        ]
        .into_iter()
        .filter_map(chip8_key)
        .collect();
        assert_eq!(mapped.len(), NUM_KEYS);
        assert!(chip8_key(RdevKey::KeyP).is_none());
    }
}
