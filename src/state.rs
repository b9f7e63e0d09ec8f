//! Machine geometry and the memory subsystem.
//!
//! This module owns the constants that describe the CHIP-8 machine (memory
//! size, display dimensions, stack depth) and the [`Memory`] type backing the
//! 4KB address space. Everything register-shaped lives on the VM itself in
//! [`crate::vm`]; memory is split out because it is the only component with
//! bounds-checked fallible access.

use anyhow::anyhow;

/// Memory address type for the CHIP-8 system.
/// Addresses range from 0x000 to 0xFFF (4096 bytes total).
pub type Address = usize;

/// Total memory size of the CHIP-8 system in bytes.
pub const MEM_SIZE: usize = 4096;

/// Starting address where the built-in font set is stored in memory.
///
/// The font occupies 0x000-0x04F. Keeping it at the bottom of memory lets
/// the glyph-address instruction compute a sprite base as `digit * 5`.
pub const FONT_ADDR: Address = 0x000;

/// Height of each font character in pixels. Each glyph is 4 pixels wide
/// and 5 pixels tall, one byte per row, MSB leftmost.
pub const FONT_HEIGHT: usize = 5;

/// Default starting address for program execution.
pub const PC_START_ADDR: Address = 0x200;

/// Largest ROM that fits between the program start address and the end of
/// memory.
pub const MAX_ROM_SIZE: usize = MEM_SIZE - PC_START_ADDR;

/// Number of general-purpose registers (V0 through VF).
pub const NUM_REGISTERS: usize = 16;

/// Number of keys on the hexadecimal keypad.
pub const NUM_KEYS: usize = 16;

/// Maximum nesting depth of subroutine calls.
pub const STACK_DEPTH: usize = 16;

/// Width of the CHIP-8 display in pixels.
pub const DISPLAY_WIDTH: usize = 64;

/// Height of the CHIP-8 display in pixels.
pub const DISPLAY_HEIGHT: usize = 32;

/// Default number of instructions executed per emulation cycle.
pub const DEFAULT_SPEED: u32 = 10;

/// Built-in sprite data for the hexadecimal digits 0-F.
pub const FONT_DATA: [u8; NUM_KEYS * FONT_HEIGHT] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Memory subsystem for the CHIP-8 virtual machine.
///
/// Manages the 4KB memory space, including the built-in font loaded at
/// address 0x000 and ROM/program data loaded at 0x200. All access is
/// bounds-checked; the executor masks its own addresses to 12 bits, so a
/// bounds failure can only come from raw multi-byte accesses (instruction
/// fetch at the top of memory, BCD stores, block register transfers) walking
/// past 0xFFF.
pub struct Memory {
    data: [u8; MEM_SIZE],
}

impl Memory {
    /// Creates a new Memory instance with the font data pre-loaded.
    pub fn new() -> Self {
        let mut memory = Memory {
            data: [0; MEM_SIZE],
        };
        memory.load_font();
        memory
    }

    /// Zeroes all of memory and re-loads the font.
    pub fn reset(&mut self) {
        self.data = [0; MEM_SIZE];
        self.load_font();
    }

    fn load_font(&mut self) {
        self.data[FONT_ADDR..FONT_ADDR + FONT_DATA.len()].copy_from_slice(&FONT_DATA);
    }

    /// Reads a single byte from memory at the specified address.
    pub fn read(&self, addr: Address) -> anyhow::Result<u8> {
        if addr >= MEM_SIZE {
            return Err(anyhow!("memory read out of bounds: {:#05X}", addr));
        }
        Ok(self.data[addr])
    }

    /// Writes a single byte to memory at the specified address.
    pub fn write(&mut self, addr: Address, value: u8) -> anyhow::Result<()> {
        if addr >= MEM_SIZE {
            return Err(anyhow!("memory write out of bounds: {:#05X}", addr));
        }
        self.data[addr] = value;
        Ok(())
    }

    /// Reads a big-endian 16-bit word from `addr` and `addr + 1`.
    ///
    /// Valid for any `addr <= 0xFFE`.
    pub fn read_word(&self, addr: Address) -> anyhow::Result<u16> {
        if addr + 1 >= MEM_SIZE {
            return Err(anyhow!("word read out of bounds: {:#05X}", addr));
        }
        Ok(u16::from(self.data[addr]) << 8 | u16::from(self.data[addr + 1]))
    }

    /// Loads a ROM image into memory starting at the program start address.
    ///
    /// ROMs longer than [`MAX_ROM_SIZE`] bytes are rejected outright; no
    /// partial load takes place.
    pub fn load_rom(&mut self, rom: &[u8]) -> anyhow::Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(anyhow!(
                "ROM too large to fit in memory: {} bytes (max {})",
                rom.len(),
                MAX_ROM_SIZE
            ));
        }
        self.data[PC_START_ADDR..PC_START_ADDR + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    /// Reads sprite data for a draw operation.
    ///
    /// Sprites are variable-height (1-15 rows) and one byte per row.
    pub fn read_sprite(&self, index: Address, rows: u8) -> anyhow::Result<&[u8]> {
        let sprite_slice = index..index + rows as usize;

        if sprite_slice.end > MEM_SIZE {
            return Err(anyhow!("sprite data out of bounds at {:#05X}", index));
        }
        Ok(&self.data[sprite_slice])
    }

    /// Read-only view of the full address space, for debug displays.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_memory_has_font_at_zero() {
        let memory = Memory::new();
        assert_eq!(&memory.as_slice()[..FONT_DATA.len()], &FONT_DATA);
        // The "0" glyph occupies the first five bytes.
        assert_eq!(&memory.as_slice()[..5], &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
    }

    #[test]
    fn test_read_write_roundtrip() {
        let mut memory = Memory::new();
        memory.write(0x300, 0xAB).unwrap();
        assert_eq!(memory.read(0x300).unwrap(), 0xAB);
    }

    #[test]
    fn test_read_out_of_bounds_fails() {
        let memory = Memory::new();
        assert!(memory.read(MEM_SIZE).is_err());
    }

    #[test]
    fn test_write_out_of_bounds_fails() {
        let mut memory = Memory::new();
        assert!(memory.write(MEM_SIZE, 0xFF).is_err());
    }

    #[test]
    fn test_read_word_is_big_endian() {
        let mut memory = Memory::new();
        memory.write(0x200, 0xAA).unwrap();
        memory.write(0x201, 0xBB).unwrap();
        assert_eq!(memory.read_word(0x200).unwrap(), 0xAABB);
    }

    #[test]
    fn test_read_word_at_top_of_memory_fails() {
        let memory = Memory::new();
        assert!(memory.read_word(0xFFF).is_err());
        assert!(memory.read_word(0xFFE).is_ok());
    }

    #[test]
    fn test_load_rom_places_bytes_at_start_address() {
        let mut memory = Memory::new();
        memory.load_rom(&[0x60, 0x0A, 0x61, 0x14]).unwrap();
        assert_eq!(memory.read(PC_START_ADDR).unwrap(), 0x60);
        assert_eq!(memory.read(PC_START_ADDR + 3).unwrap(), 0x14);
    }

    #[test]
    fn test_load_rom_accepts_maximum_size() {
        let mut memory = Memory::new();
        assert!(memory.load_rom(&[0xFF; MAX_ROM_SIZE]).is_ok());
        assert_eq!(memory.read(MEM_SIZE - 1).unwrap(), 0xFF);
    }

    #[test]
    fn test_load_rom_rejects_oversize_rom() {
        let mut memory = Memory::new();
        let before = memory.as_slice().to_vec();
        assert!(memory.load_rom(&[0xFF; MAX_ROM_SIZE + 1]).is_err());
        // Rejection means no partial load.
        assert_eq!(memory.as_slice(), before.as_slice());
    }

    #[test]
    fn test_reset_clears_ram_and_reloads_font() {
        let mut memory = Memory::new();
        memory.write(0x300, 0xCD).unwrap();
        memory.reset();
        assert_eq!(memory.read(0x300).unwrap(), 0);
        assert_eq!(&memory.as_slice()[..FONT_DATA.len()], &FONT_DATA);
    }

    #[test]
    fn test_read_sprite_out_of_bounds_fails() {
        let memory = Memory::new();
        assert!(memory.read_sprite(0xFFE, 5).is_err());
        assert!(memory.read_sprite(0xFFB, 5).is_ok());
    }
}
