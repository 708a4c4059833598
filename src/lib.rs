/*!
  Encoder, decoder, and disassembler for tx8 bytecode.

  The core is the `bytecode` module, which converts single instructions between their
  structural form and the byte sequence the tx8 CPU executes, and renders them as assembly.
  The opcode and register tables are injected into every operation; the tx8 defaults are
  `Tx8Opcodes` and `Tx8Registers`.

  Around it sit whole-program helpers, the ROM container, and table-formatted listings.
*/

#[macro_use] extern crate lazy_static;
#[macro_use] extern crate prettytable;

pub mod bytecode;
pub mod error;
pub mod listing;
pub mod program;
pub mod registers;
pub mod rom;

pub use bytecode::{
  encoded_width, format_text, print_instruction,
  Instruction, Opcode, OpcodeTable, Parameter, ParameterMode, Tx8Opcodes
};
pub use error::{CodingError, RomError};
pub use program::{decode_program, encode_program, Located};
pub use registers::{RegisterTable, Tx8Registers};
pub use rom::Rom;
