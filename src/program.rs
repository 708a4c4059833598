//! Whole code images: sequences of instructions laid out back to back.

use std::fmt::{Display, Formatter};

use crate::bytecode::{Instruction, OpcodeTable};
use crate::error::CodingError;

/// An instruction decoded from a code image, with where it sits in that image.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Located {
  pub offset      : usize,
  pub length      : usize,
  pub instruction : Instruction,
}

impl Display for Located {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:06x}+{}: {:?}", self.offset, self.length, self.instruction)
  }
}

/**
  Encodes `instructions` one after another. Lengths are computed for the whole program before
  encoding, so a bad instruction anywhere means no code is produced at all.
*/
pub fn encode_program(instructions: &[Instruction], opcodes: &dyn OpcodeTable)
  -> Result<Vec<u8>, CodingError>
{
  let mut total = 0;
  for instruction in instructions {
    total += instruction.encoded_length(opcodes)?;
  }

  let mut code = vec![0; total];
  let mut offset = 0;
  for instruction in instructions {
    offset += instruction.encode_into(opcodes, &mut code[offset..])?;
  }
  Ok(code)
}

/// Decodes every instruction in `code`, which must end exactly on an instruction boundary.
pub fn decode_program(code: &[u8], opcodes: &dyn OpcodeTable) -> Result<Vec<Located>, CodingError> {
  let mut located = Vec::new();
  let mut offset  = 0;

  while offset < code.len() {
    let (instruction, length) = Instruction::decode(&code[offset..], opcodes)
      .map_err(|error| match error {
        CodingError::Truncated { offset: inner } => CodingError::Truncated { offset: offset + inner },
        other => other
      })?;
    located.push(Located { offset, length, instruction });
    offset += length;
  }

  Ok(located)
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::{Opcode, Parameter, Tx8Opcodes};
  use pretty_assertions::assert_eq;

  fn countdown() -> Vec<Instruction> {
    vec![
      Instruction::binary(Opcode::CompareUnsigned, Parameter::Register(0x02), Parameter::Constant8(0)),
      Instruction::unary(Opcode::JumpEqual, Parameter::RelativeAddress(12)),
      Instruction::unary(Opcode::SysCall, Parameter::Constant16(0x0101)),
      Instruction::unary(Opcode::Jump, Parameter::AbsoluteAddress(0x40_0000)),
      Instruction::nullary(Opcode::Halt),
    ]
  }

  #[test]
  fn offsets_follow_lengths() {
    let code = encode_program(&countdown(), &Tx8Opcodes).unwrap();
    assert_eq!(code.len(), 4 + 6 + 4 + 6 + 1);

    let located = decode_program(&code, &Tx8Opcodes).unwrap();
    let offsets: Vec<usize> = located.iter().map(|l| l.offset).collect();
    assert_eq!(offsets, vec![0, 4, 10, 14, 20]);

    let instructions: Vec<Instruction> = located.iter().map(|l| l.instruction).collect();
    assert_eq!(instructions, countdown());
  }

  #[test]
  fn bad_instruction_produces_no_code() {
    let mut program = countdown();
    program.insert(2, Instruction::unary(Opcode::Call, Parameter::Label(1)));
    assert_eq!(encode_program(&program, &Tx8Opcodes), Err(CodingError::UnresolvedLabel(1)));
  }

  #[test]
  fn unknown_parameter_produces_no_code() {
    let mut program = countdown();
    program.push(Instruction::unary(Opcode::Call, Parameter::Unknown { mode: 7, value: 0x40_0000 }));
    assert_eq!(encode_program(&program, &Tx8Opcodes), Err(CodingError::UnknownMode(7)));
  }

  #[test]
  fn located_shows_offset_and_length() {
    let code = encode_program(&countdown(), &Tx8Opcodes).unwrap();
    let located = decode_program(&code, &Tx8Opcodes).unwrap();
    assert_eq!(
      located[4].to_string(),
      "000014+1: Instruction { opcode: 0, p1: None, p2: None }"
    );
  }

  #[test]
  fn truncation_is_reported_at_image_offset() {
    let mut code = encode_program(&countdown(), &Tx8Opcodes).unwrap();
    code.truncate(12);
    assert_eq!(decode_program(&code, &Tx8Opcodes), Err(CodingError::Truncated { offset: 12 }));
  }
}
