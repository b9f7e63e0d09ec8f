//! A CHIP-8 virtual machine.
//!
//! The core of this crate is [`Chip8`], a self-contained interpreter for the
//! CHIP-8 instruction set: 4KB of memory, sixteen 8-bit registers, a 16-entry
//! call stack, two 60 Hz timers, a 64x32 monochrome framebuffer, and a
//! sixteen-key hexadecimal keypad. The VM is deliberately host-agnostic: it
//! exposes `emulate_cycle`, `key_press`/`key_release`, and read accessors,
//! and the [`host`] module supplies a terminal frontend on top of them.
//!
//! # Compatibility
//!
//! CHIP-8 interpreters disagree on a handful of opcodes; this implementation
//! fixes the following variants:
//!
//! - 8XY6/8XYE shift VX in place and ignore VY.
//! - FX55/FX65 leave the index register unchanged after the block transfer
//!   (classic interpreters advance it by X + 1).
//! - FX1E sets VF to 1 when the index register overflows past 0xFFF, a
//!   non-standard but widespread Amiga-interpreter behavior.
//!
//! ROMs relying on the opposite conventions will misbehave.

pub mod disasm;
pub mod host;
pub mod instruction;
pub mod state;
pub mod vm;

pub use vm::Chip8;
