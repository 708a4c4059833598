/*!
  The human readable textual form of bytecode is called assembly. This module renders single
  instructions as assembly for debuggers and disassemblers:

  ```text
    mnemonic [p1 [p2]]\n
  ```

  The opcode table decides how many parameters are printed, not the parameters themselves.
*/

use std::fmt::Write;

use super::{Instruction, OpcodeTable};
use crate::registers::RegisterTable;

/// Writes the assembly text of `instruction`, newline included, into `sink`.
pub fn print_instruction<W: Write>(
    sink        : &mut W,
    instruction : &Instruction,
    opcodes     : &dyn OpcodeTable,
    registers   : &dyn RegisterTable
  ) -> std::fmt::Result
{
  let count = match opcodes.mnemonic(instruction.opcode) {
    Some(mnemonic) => {
      sink.write_str(mnemonic)?;
      opcodes.param_count(instruction.opcode).unwrap_or(0)
    }
    // An opcode the table does not know has no parameters we could trust.
    None => {
      write!(sink, "{{{:#x}}}", instruction.opcode)?;
      0
    }
  };

  let slots = [instruction.p1, instruction.p2];
  for parameter in slots.iter().take(count as usize) {
    sink.write_char(' ')?;
    match parameter {
      Some(parameter) => parameter.write_text(sink, registers)?,
      None            => sink.write_str("{}")?
    }
  }

  sink.write_char('\n')
}

/// The assembly text of `instruction`, terminated by a newline.
pub fn format_text(
    instruction : &Instruction,
    opcodes     : &dyn OpcodeTable,
    registers   : &dyn RegisterTable
  ) -> String
{
  let mut text = String::new();
  // Writing into a `String` cannot fail.
  let _ = print_instruction(&mut text, instruction, opcodes, registers);
  text
}
