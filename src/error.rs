//! Error types for instruction coding and ROM handling.

use thiserror::Error;

/**
  Errors raised while sizing, encoding, or decoding an instruction. None of them leave partial
  output behind: every check runs before the first byte is written.
*/
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CodingError {
  #[error("unknown addressing mode {0:#x}")]
  UnknownMode(u8),

  #[error("unknown opcode {0:#04x}")]
  UnknownOpcode(u8),

  #[error("opcode {opcode:#04x} takes {expected} parameter(s) but {found} were given")]
  ParameterCountMismatch {
    opcode   : u8,
    expected : u8,
    found    : u8
  },

  #[error("label {0} has not been resolved to an address")]
  UnresolvedLabel(u32),

  #[error("instruction needs {needed} bytes but the buffer holds {available}")]
  BufferTooSmall {
    needed    : usize,
    available : usize
  },

  #[error("instruction was sized at {expected} bytes but encoded to {written}")]
  LengthMismatch {
    expected : usize,
    written  : usize
  },

  #[error("instruction truncated at byte {offset}")]
  Truncated {
    offset: usize
  },
}

/// Errors raised while reading or writing a tx8 ROM image.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RomError {
  #[error("not a tx8 ROM: bad magic bytes")]
  BadMagic,

  #[error("ROM is shorter than its header")]
  TooShort,

  #[error("ROM should be {expected} bytes long but is {actual}")]
  LengthMismatch {
    expected : usize,
    actual   : usize
  },

  #[error("{0} is too long for the ROM header")]
  FieldTooLong(&'static str),

  #[error("code section of {0} bytes does not fit in ROM memory")]
  CodeTooLarge(usize),

  #[error("ROM text field is not valid UTF-8")]
  InvalidUtf8,
}
