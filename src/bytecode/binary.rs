/*!
  This module is responsible for the encoding and decoding of binary instructions.

  Layout of an encoded instruction:

  ```text
    [opcode:8]                                              declared count 0
    [opcode:8][p1 mode:4][p2 mode:4][p1:8|16|32]            declared count 1
    [opcode:8][p1 mode:4][p2 mode:4][p1:8|16|32][p2:8|16|32] declared count 2
  ```

  An absent second parameter packs as mode nibble 0, which is also the tag of `constant8`.
  Decoders must therefore trust the declared count and never the nibble.
*/

use nom::number::complete::le_u8;

use super::{OpcodeTable, Parameter, ParameterMode};
use crate::error::CodingError;

/// Bytes taken by the mode byte, indexed by the opcode's declared parameter count.
pub const MODE_BYTE_LEN: [usize; 3] = [0, 1, 1];

/// An opcode with up to two parameters. `None` marks an absent parameter.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Instruction {
  pub opcode : u8,
  pub p1     : Option<Parameter>,
  pub p2     : Option<Parameter>,
}

impl Instruction {
  pub fn nullary<O: Into<u8>>(opcode: O) -> Instruction {
    Instruction { opcode: opcode.into(), p1: None, p2: None }
  }

  pub fn unary<O: Into<u8>>(opcode: O, p1: Parameter) -> Instruction {
    Instruction { opcode: opcode.into(), p1: Some(p1), p2: None }
  }

  pub fn binary<O: Into<u8>>(opcode: O, p1: Parameter, p2: Parameter) -> Instruction {
    Instruction { opcode: opcode.into(), p1: Some(p1), p2: Some(p2) }
  }

  /// The present parameters, in order.
  pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
    self.p1.iter().chain(self.p2.iter())
  }

  /// High nibble is p1's mode, low nibble p2's, with an absent parameter packing as 0.
  pub fn mode_byte(&self) -> u8 {
    let p1 = self.p1.map_or(0, |p| p.mode_tag());
    let p2 = self.p2.map_or(0, |p| p.mode_tag());
    (p1 << 4) | (p2 & 0x0f)
  }

  /**
    Looks up the opcode's declared parameter count and checks that exactly the first `count`
    parameter slots are filled.
  */
  pub fn declared_count(&self, opcodes: &dyn OpcodeTable) -> Result<u8, CodingError> {
    let expected = opcodes.param_count(self.opcode)
                          .ok_or(CodingError::UnknownOpcode(self.opcode))?;
    let found = self.parameters().count() as u8;
    let well_formed = match expected {
      0 => self.p1.is_none() && self.p2.is_none(),
      1 => self.p1.is_some() && self.p2.is_none(),
      _ => self.p1.is_some() && self.p2.is_some(),
    };

    match well_formed && (expected as usize) < MODE_BYTE_LEN.len() {
      true  => Ok(expected),
      false => Err(CodingError::ParameterCountMismatch { opcode: self.opcode, expected, found })
    }
  }

  /// Total encoded size in bytes: opcode, mode byte if any, and every parameter.
  pub fn encoded_length(&self, opcodes: &dyn OpcodeTable) -> Result<usize, CodingError> {
    let count = self.declared_count(opcodes)?;
    let mut length = 1 + MODE_BYTE_LEN[count as usize];
    for parameter in self.parameters() {
      let mode = parameter.mode().ok_or(CodingError::UnknownMode(parameter.mode_tag()))?;
      length += mode.width();
    }
    Ok(length)
  }

  /**
    Encodes the instruction into bytecode. The instruction is validated completely before any
    byte is produced: unknown opcodes and modes, a parameter count that disagrees with the
    opcode table, and unresolved labels are all errors.
  */
  pub fn encode(&self, opcodes: &dyn OpcodeTable) -> Result<Vec<u8>, CodingError> {
    let length = self.encoded_length(opcodes)?;
    let mut bytes = Vec::with_capacity(length);
    self.encode_validated(opcodes, &mut bytes)?;
    Ok(bytes)
  }

  /**
    Encodes the instruction into the front of `dst` and returns the number of bytes written.
    Fails without touching `dst` if it is shorter than `encoded_length`.
  */
  pub fn encode_into(&self, opcodes: &dyn OpcodeTable, dst: &mut [u8])
    -> Result<usize, CodingError>
  {
    let length = self.encoded_length(opcodes)?;
    if dst.len() < length {
      return Err(CodingError::BufferTooSmall { needed: length, available: dst.len() });
    }

    let mut bytes = Vec::with_capacity(length);
    self.encode_validated(opcodes, &mut bytes)?;
    if bytes.len() != length {
      return Err(CodingError::LengthMismatch { expected: length, written: bytes.len() });
    }
    dst[..length].copy_from_slice(&bytes);
    Ok(length)
  }

  // Requires `encoded_length` to have succeeded.
  fn encode_validated(&self, opcodes: &dyn OpcodeTable, out: &mut Vec<u8>)
    -> Result<(), CodingError>
  {
    for parameter in self.parameters() {
      if let Parameter::Label(id) = parameter {
        return Err(CodingError::UnresolvedLabel(*id));
      }
    }
    let count = self.declared_count(opcodes)?;
    let start = out.len();

    out.push(self.opcode);
    if MODE_BYTE_LEN[count as usize] == 1 {
      out.push(self.mode_byte());
    }

    // Parameter bytes begin right after the mode byte, wherever the table says that is.
    let mut offset = start + 1 + MODE_BYTE_LEN[count as usize];
    debug_assert_eq!(out.len(), offset);
    if let Some(p1) = self.p1 {
      offset += p1.encode(out);
    }
    // p2 starts where p1 ended.
    debug_assert_eq!(out.len(), offset);
    if let Some(p2) = self.p2 {
      p2.encode(out);
    }

    #[cfg(feature = "trace_encoding")]
    println!("encode {:02x?} -> {:02x?}", self, &out[start..]);

    Ok(())
  }

  /**
    Decodes the instruction at the front of `input`, returning it with its encoded length.
    Only the opcode's declared count decides whether a mode byte and which parameters follow;
    the low nibble of a one parameter instruction is ignored.
  */
  pub fn decode(input: &[u8], opcodes: &dyn OpcodeTable) -> Result<(Instruction, usize), CodingError> {
    let truncated = |rest: &[u8]| CodingError::Truncated { offset: input.len() - rest.len() };

    let (rest, opcode) = le_u8::<_, nom::error::Error<&[u8]>>(input)
      .map_err(|_| truncated(input))?;
    let count = opcodes.param_count(opcode)
                       .ok_or(CodingError::UnknownOpcode(opcode))?;

    let mut instruction = Instruction::nullary(opcode);
    if count == 0 {
      return Ok((instruction, 1));
    }

    let (mut rest, mode_byte) = le_u8::<_, nom::error::Error<&[u8]>>(rest)
      .map_err(|_| truncated(rest))?;

    let modes = [mode_byte >> 4, mode_byte & 0x0f];
    let mut decoded = [None, None];
    for (slot, tag) in decoded.iter_mut().zip(modes.iter()).take(count.min(2) as usize) {
      let mode = ParameterMode::try_from(*tag)
        .ok()
        .filter(ParameterMode::is_encodable)
        .ok_or(CodingError::UnknownMode(*tag))?;
      let (remaining, parameter) = Parameter::decode(mode, rest).map_err(|_| truncated(rest))?;
      *slot = Some(parameter);
      rest = remaining;
    }

    instruction.p1 = decoded[0];
    instruction.p2 = decoded[1];

    #[cfg(feature = "trace_encoding")]
    println!("decode {:02x?} -> {:?}", &input[..input.len() - rest.len()], instruction);

    Ok((instruction, input.len() - rest.len()))
  }
}
