//! Opcode disassembly for debug views.
//!
//! Two pure functions over the opcode word: [`disassemble`] produces a short
//! Cowgod-style mnemonic and [`describe`] a one-line prose explanation. Both
//! go through [`Instruction::decode`], so they recognize exactly the opcode
//! table the executor implements.

use crate::instruction::Instruction;

/// Formats an opcode as a short assembler mnemonic, e.g. `LD V3, 0A` or
/// `DRW V0, V1, 5`. Opcodes outside the instruction table come back as
/// `UNKNOWN (<hex>)`.
pub fn disassemble(op: u16) -> String {
    match Instruction::decode(op) {
        Instruction::ClearScreen => "CLS".to_string(),
        Instruction::Return => "RET".to_string(),
        Instruction::Jump(nnn) => format!("JP {:03X}", nnn),
        Instruction::Call(nnn) => format!("CALL {:03X}", nnn),
        Instruction::SkipEqImm(x, nn) => format!("SE V{:X}, {:02X}", x, nn),
        Instruction::SkipNeImm(x, nn) => format!("SNE V{:X}, {:02X}", x, nn),
        Instruction::SkipEqReg(x, y) => format!("SE V{:X}, V{:X}", x, y),
        Instruction::LoadImm(x, nn) => format!("LD V{:X}, {:02X}", x, nn),
        Instruction::AddImm(x, nn) => format!("ADD V{:X}, {:02X}", x, nn),
        Instruction::Copy(x, y) => format!("LD V{:X}, V{:X}", x, y),
        Instruction::Or(x, y) => format!("OR V{:X}, V{:X}", x, y),
        Instruction::And(x, y) => format!("AND V{:X}, V{:X}", x, y),
        Instruction::Xor(x, y) => format!("XOR V{:X}, V{:X}", x, y),
        Instruction::Add(x, y) => format!("ADD V{:X}, V{:X}", x, y),
        Instruction::Sub(x, y) => format!("SUB V{:X}, V{:X}", x, y),
        Instruction::ShiftRight(x) => format!("SHR V{:X}", x),
        Instruction::SubFrom(x, y) => format!("SUBN V{:X}, V{:X}", x, y),
        Instruction::ShiftLeft(x) => format!("SHL V{:X}", x),
        Instruction::SkipNeReg(x, y) => format!("SNE V{:X}, V{:X}", x, y),
        Instruction::LoadIndex(nnn) => format!("LD I, {:03X}", nnn),
        Instruction::JumpOffset(nnn) => format!("JP V0, {:03X}", nnn),
        Instruction::Random(x, nn) => format!("RND V{:X}, {:02X}", x, nn),
        Instruction::Draw(x, y, n) => format!("DRW V{:X}, V{:X}, {:X}", x, y, n),
        Instruction::SkipKeyPressed(x) => format!("SKP V{:X}", x),
        Instruction::SkipKeyNotPressed(x) => format!("SKNP V{:X}", x),
        Instruction::ReadDelay(x) => format!("LD V{:X}, DT", x),
        Instruction::WaitKey(x) => format!("LD V{:X}, K", x),
        Instruction::SetDelay(x) => format!("LD DT, V{:X}", x),
        Instruction::SetSound(x) => format!("LD ST, V{:X}", x),
        Instruction::AddIndex(x) => format!("ADD I, V{:X}", x),
        Instruction::LoadGlyph(x) => format!("LD F, V{:X}", x),
        Instruction::StoreBcd(x) => format!("LD B, V{:X}", x),
        Instruction::StoreRegs(x) => format!("LD [I], V{:X}", x),
        Instruction::LoadRegs(x) => format!("LD V{:X}, [I]", x),
        Instruction::Unknown(raw) => format!("UNKNOWN ({:04X})", raw),
    }
}

/// Formats an opcode as a one-line human-readable description.
pub fn describe(op: u16) -> String {
    match Instruction::decode(op) {
        Instruction::ClearScreen => "Clear the display.".to_string(),
        Instruction::Return => "Return from the current subroutine.".to_string(),
        Instruction::Jump(nnn) => format!("Jump to address 0x{:03X}.", nnn),
        Instruction::Call(nnn) => format!("Call the subroutine at 0x{:03X}.", nnn),
        Instruction::SkipEqImm(x, nn) => {
            format!("Skip the next instruction if V{:X} equals 0x{:02X}.", x, nn)
        }
        Instruction::SkipNeImm(x, nn) => format!(
            "Skip the next instruction if V{:X} does not equal 0x{:02X}.",
            x, nn
        ),
        Instruction::SkipEqReg(x, y) => {
            format!("Skip the next instruction if V{:X} equals V{:X}.", x, y)
        }
        Instruction::LoadImm(x, nn) => format!("Set V{:X} to 0x{:02X}.", x, nn),
        Instruction::AddImm(x, nn) => {
            format!("Add 0x{:02X} to V{:X} without changing the carry flag.", nn, x)
        }
        Instruction::Copy(x, y) => format!("Set V{:X} to the value of V{:X}.", x, y),
        Instruction::Or(x, y) => format!("Set V{:X} to V{:X} OR V{:X}.", x, x, y),
        Instruction::And(x, y) => format!("Set V{:X} to V{:X} AND V{:X}.", x, x, y),
        Instruction::Xor(x, y) => format!("Set V{:X} to V{:X} XOR V{:X}.", x, x, y),
        Instruction::Add(x, y) => format!(
            "Add V{:X} to V{:X}; VF becomes 1 if the sum overflows a byte.",
            y, x
        ),
        Instruction::Sub(x, y) => format!(
            "Subtract V{:X} from V{:X}; VF becomes 1 if no borrow occurs.",
            y, x
        ),
        Instruction::ShiftRight(x) => format!(
            "Shift V{:X} right by one; VF receives the bit shifted out.",
            x
        ),
        Instruction::SubFrom(x, y) => format!(
            "Set V{:X} to V{:X} minus V{:X}; VF becomes 1 if no borrow occurs.",
            x, y, x
        ),
        Instruction::ShiftLeft(x) => format!(
            "Shift V{:X} left by one; VF receives the bit shifted out.",
            x
        ),
        Instruction::SkipNeReg(x, y) => format!(
            "Skip the next instruction if V{:X} does not equal V{:X}.",
            x, y
        ),
        Instruction::LoadIndex(nnn) => format!("Set the index register to 0x{:03X}.", nnn),
        Instruction::JumpOffset(nnn) => format!("Jump to address 0x{:03X} plus V0.", nnn),
        Instruction::Random(x, nn) => format!(
            "Set V{:X} to a random byte masked with 0x{:02X}.",
            x, nn
        ),
        Instruction::Draw(x, y, n) => format!(
            "Draw the {}-row sprite at the index register to (V{:X}, V{:X}); VF reports collisions.",
            n, x, y
        ),
        Instruction::SkipKeyPressed(x) => format!(
            "Skip the next instruction if the key in V{:X} is pressed.",
            x
        ),
        Instruction::SkipKeyNotPressed(x) => format!(
            "Skip the next instruction if the key in V{:X} is not pressed.",
            x
        ),
        Instruction::ReadDelay(x) => format!("Set V{:X} to the delay timer value.", x),
        Instruction::WaitKey(x) => format!(
            "Wait for a key press and store the key in V{:X}.",
            x
        ),
        Instruction::SetDelay(x) => format!("Set the delay timer to V{:X}.", x),
        Instruction::SetSound(x) => format!("Set the sound timer to V{:X}.", x),
        Instruction::AddIndex(x) => format!(
            "Add V{:X} to the index register; VF becomes 1 on overflow past 0xFFF.",
            x
        ),
        Instruction::LoadGlyph(x) => format!(
            "Point the index register at the font glyph for the low nibble of V{:X}.",
            x
        ),
        Instruction::StoreBcd(x) => format!(
            "Store the three decimal digits of V{:X} at the index register.",
            x
        ),
        Instruction::StoreRegs(x) => format!(
            "Store V0 through V{:X} to memory at the index register.",
            x
        ),
        Instruction::LoadRegs(x) => format!(
            "Load V0 through V{:X} from memory at the index register.",
            x
        ),
        Instruction::Unknown(raw) => format!("Unknown opcode ({:04X}).", raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disassemble_loads_and_draws() {
        assert_eq!(disassemble(0x630A), "LD V3, 0A");
        assert_eq!(disassemble(0xD015), "DRW V0, V1, 5");
        assert_eq!(disassemble(0xA2F0), "LD I, 2F0");
        assert_eq!(disassemble(0x8AB0), "LD VA, VB");
    }

    #[test]
    fn test_disassemble_control_flow() {
        assert_eq!(disassemble(0x00E0), "CLS");
        assert_eq!(disassemble(0x00EE), "RET");
        assert_eq!(disassemble(0x1ABC), "JP ABC");
        assert_eq!(disassemble(0x2ABC), "CALL ABC");
        assert_eq!(disassemble(0xB123), "JP V0, 123");
        assert_eq!(disassemble(0x3A0F), "SE VA, 0F");
        assert_eq!(disassemble(0x4A0F), "SNE VA, 0F");
        assert_eq!(disassemble(0x5AB0), "SE VA, VB");
        assert_eq!(disassemble(0x9AB0), "SNE VA, VB");
    }

    #[test]
    fn test_disassemble_alu() {
        assert_eq!(disassemble(0x8121), "OR V1, V2");
        assert_eq!(disassemble(0x8122), "AND V1, V2");
        assert_eq!(disassemble(0x8123), "XOR V1, V2");
        assert_eq!(disassemble(0x8124), "ADD V1, V2");
        assert_eq!(disassemble(0x8125), "SUB V1, V2");
        assert_eq!(disassemble(0x8126), "SHR V1");
        assert_eq!(disassemble(0x8127), "SUBN V1, V2");
        assert_eq!(disassemble(0x812E), "SHL V1");
        assert_eq!(disassemble(0x7C02), "ADD VC, 02");
        assert_eq!(disassemble(0xC3AB), "RND V3, AB");
    }

    #[test]
    fn test_disassemble_key_and_misc() {
        assert_eq!(disassemble(0xE19E), "SKP V1");
        assert_eq!(disassemble(0xE1A1), "SKNP V1");
        assert_eq!(disassemble(0xF107), "LD V1, DT");
        assert_eq!(disassemble(0xF10A), "LD V1, K");
        assert_eq!(disassemble(0xF115), "LD DT, V1");
        assert_eq!(disassemble(0xF118), "LD ST, V1");
        assert_eq!(disassemble(0xF11E), "ADD I, V1");
        assert_eq!(disassemble(0xF129), "LD F, V1");
        assert_eq!(disassemble(0xF133), "LD B, V1");
        assert_eq!(disassemble(0xF155), "LD [I], V1");
        assert_eq!(disassemble(0xF165), "LD V1, [I]");
    }

    #[test]
    fn test_disassemble_unknown() {
        assert_eq!(disassemble(0xFFFF), "UNKNOWN (FFFF)");
        assert_eq!(disassemble(0x0123), "UNKNOWN (0123)");
        assert_eq!(disassemble(0x5AB1), "UNKNOWN (5AB1)");
    }

    #[test]
    fn test_describe_matches_opcode_table() {
        assert_eq!(describe(0x630A), "Set V3 to 0x0A.");
        assert_eq!(describe(0x00E0), "Clear the display.");
        assert_eq!(
            describe(0xD015),
            "Draw the 5-row sprite at the index register to (V0, V1); VF reports collisions."
        );
        assert_eq!(describe(0xFFFF), "Unknown opcode (FFFF).");
    }

    #[test]
    fn test_every_table_entry_has_a_mnemonic() {
        // A sweep over the whole opcode space: anything the decoder accepts
        // must render without falling back to UNKNOWN, and vice versa.
        for op in 0..=u16::MAX {
            let known = !matches!(
                crate::instruction::Instruction::decode(op),
                crate::instruction::Instruction::Unknown(_)
            );
            assert_eq!(!disassemble(op).starts_with("UNKNOWN"), known, "{:04X}", op);
        }
    }
}
