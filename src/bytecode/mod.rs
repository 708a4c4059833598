/*!

  The tx8 CPU executes variable length instructions. Every instruction starts with a one
  byte opcode. Opcodes that take parameters follow it with a mode byte and then the encoded
  parameter values, little-endian:

  ```text
    Opcode:      8 bits
    Mode byte:   8 bits   [p1 mode:4][p2 mode:4]   (only if the opcode takes parameters)
    Parameter:   8, 16, or 32 bits depending on its addressing mode, at most two of them
  ```

  The number of parameters an opcode takes is not recorded in the bytecode. It comes from an
  opcode table, and both the encoder and the decoder consult the same table to decide whether
  a mode byte is present. Nothing in this module assumes a particular table: the tx8 defaults
  live here, but every coding operation takes the table as a `&dyn OpcodeTable`.

*/

mod assembly;
mod binary;
mod parameter;

pub use assembly::{format_text, print_instruction};
pub use binary::{Instruction, MODE_BYTE_LEN};
pub use parameter::{encoded_width, Parameter, ParameterMode};

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The two facts the coder and the printer need about an opcode.
pub trait OpcodeTable {
  /// Declared parameter count (0, 1, or 2), or `None` for an opcode not in the table.
  fn param_count(&self, opcode: u8) -> Option<u8>;
  fn mnemonic(&self, opcode: u8) -> Option<&str>;
}

/// A plain array of `(mnemonic, parameter count)` pairs indexed by opcode is a valid table.
impl<S: AsRef<str>, const N: usize> OpcodeTable for [(S, u8); N] {
  fn param_count(&self, opcode: u8) -> Option<u8> {
    self.get(opcode as usize).map(|(_, count)| *count)
  }

  fn mnemonic(&self, opcode: u8) -> Option<&str> {
    self.get(opcode as usize).map(|(name, _)| name.as_ref())
  }
}

/**
  Opcodes of the tx8 CPU.

  The discriminants are the encoded opcode bytes, so the order of the variants below is
  significant. The `strum` serializations are the assembly mnemonics.
*/
#[derive(
  StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq, PartialEq,  Debug,    Hash
)]
#[repr(u8)]
pub enum Opcode {
  #[strum(serialize = "hlt")]  Halt,              // hlt
  #[strum(serialize = "nop")]  Nop,               // nop
  #[strum(serialize = "jmp")]  Jump,              // jmp target
  #[strum(serialize = "je")]   JumpEqual,         // je target
  #[strum(serialize = "jne")]  JumpNotEqual,      // jne target
  #[strum(serialize = "jg")]   JumpGreaterThan,   // jg target
  #[strum(serialize = "jge")]  JumpGreaterEqual,  // jge target
  #[strum(serialize = "jl")]   JumpLessThan,      // jl target
  #[strum(serialize = "jle")]  JumpLessEqual,     // jle target
  #[strum(serialize = "cmp")]  CompareSigned,     // cmp lhs, rhs
  #[strum(serialize = "cmpf")] CompareFloat,      // cmpf lhs, rhs
  #[strum(serialize = "cmpu")] CompareUnsigned,   // cmpu lhs, rhs
  #[strum(serialize = "call")] Call,              // call target
  #[strum(serialize = "ret")]  Return,            // ret
  #[strum(serialize = "sys")]  SysCall,           // sys number
}

impl Opcode {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn param_count(&self) -> u8 {
    match self {
      Opcode::Halt | Opcode::Nop | Opcode::Return => 0,

      Opcode::CompareSigned
      | Opcode::CompareFloat
      | Opcode::CompareUnsigned => 2,

      _ => 1
    }
  }
}

/// The opcode table of the tx8 CPU, backed by [`Opcode`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Tx8Opcodes;

impl OpcodeTable for Tx8Opcodes {
  fn param_count(&self, opcode: u8) -> Option<u8> {
    Opcode::try_from(opcode).ok().map(|op| op.param_count())
  }

  fn mnemonic(&self, opcode: u8) -> Option<&str> {
    Opcode::try_from(opcode).ok().map(<&'static str>::from)
  }
}
