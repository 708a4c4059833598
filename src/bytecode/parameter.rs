/*!
  Parameters are the addressed operands of an instruction. A parameter's addressing mode alone
  determines how many bytes it occupies and how those bytes are laid out, which is what lets
  an instruction's length be computed before anything is written.
*/

use std::fmt::Write;

use nom::{
  combinator::{fail, map},
  number::complete::{le_i32, le_u16, le_u32, le_u8},
  IResult
};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::{Display as StrumDisplay, IntoStaticStr};

use crate::error::CodingError;
use crate::registers::RegisterTable;

/**
  Addressing modes as they appear in the nibbles of the mode byte. The discriminants are the
  encoded values and must match the CPU's decoder.

  `Label` is never emitted. It marks a parameter whose address is not known yet and occupies
  the space of the absolute address it will become.
*/
#[derive(
  StrumDisplay, IntoStaticStr, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq, PartialEq,  Debug,            Hash
)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum ParameterMode {
  Constant8,
  Constant16,
  Constant32,
  AbsoluteAddress,
  RelativeAddress,
  RegisterAddress,
  Register,
  Label,
}

/// Encoded widths of the concrete modes, indexed by mode tag.
const MODE_WIDTHS: [usize; 7] = [1, 2, 4, 4, 4, 1, 1];

impl ParameterMode {
  pub fn tag(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  pub fn width(&self) -> usize {
    match self {
      ParameterMode::Label => MODE_WIDTHS[ParameterMode::Constant32.tag() as usize],
      mode => MODE_WIDTHS[mode.tag() as usize]
    }
  }

  /// Whether a parameter of this mode can appear in final bytecode.
  pub fn is_encodable(&self) -> bool {
    *self != ParameterMode::Label
  }
}

/// Encoded byte width of the mode with the given tag, or `None` if the tag is not a mode.
pub fn encoded_width(mode: u8) -> Option<usize> {
  ParameterMode::try_from(mode).ok().map(|mode| mode.width())
}

/**
  One addressed operand. Each variant carries exactly the payload its mode encodes, so a
  relative address is the only signed value.
*/
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Parameter {
  Constant8(u8),
  Constant16(u16),
  Constant32(u32),
  AbsoluteAddress(u32),
  /// Offset from the CPU's `o` register, possibly backward.
  RelativeAddress(i32),
  /// Memory at the address held in a register.
  RegisterAddress(u8),
  Register(u8),
  /// Unresolved symbol, identified by the assembler's symbol id.
  Label(u32),
  /// A mode tag this crate does not know. Such a parameter can be printed but not encoded.
  Unknown {
    mode  : u8,
    value : u32
  },
}

impl Parameter {
  /**
    Builds a parameter from a mode tag and a 32 bit raw value, the way a parser that has not
    yet sized its operands produces them. The value is truncated to the mode's width, and for
    a relative address its bits are read as signed.
  */
  pub fn from_raw(mode: u8, value: u32) -> Parameter {
    match ParameterMode::try_from(mode) {
      Ok(ParameterMode::Constant8)       => Parameter::Constant8(value as u8),
      Ok(ParameterMode::Constant16)      => Parameter::Constant16(value as u16),
      Ok(ParameterMode::Constant32)      => Parameter::Constant32(value),
      Ok(ParameterMode::AbsoluteAddress) => Parameter::AbsoluteAddress(value),
      Ok(ParameterMode::RelativeAddress) => Parameter::RelativeAddress(value as i32),
      Ok(ParameterMode::RegisterAddress) => Parameter::RegisterAddress(value as u8),
      Ok(ParameterMode::Register)        => Parameter::Register(value as u8),
      Ok(ParameterMode::Label)           => Parameter::Label(value),
      Err(_)                             => Parameter::Unknown { mode, value }
    }
  }

  /**
    The addressing mode of the parameter. An `Unknown` parameter has none, even when its raw
    tag happens to name a known mode: its payload was never sized for that mode.
  */
  pub fn mode(&self) -> Option<ParameterMode> {
    match self {
      Parameter::Unknown { .. } => None,
      _ => ParameterMode::try_from(self.mode_tag()).ok()
    }
  }

  /// The value of the mode nibble for this parameter.
  pub fn mode_tag(&self) -> u8 {
    let mode = match self {
      Parameter::Constant8(_)       => ParameterMode::Constant8,
      Parameter::Constant16(_)      => ParameterMode::Constant16,
      Parameter::Constant32(_)      => ParameterMode::Constant32,
      Parameter::AbsoluteAddress(_) => ParameterMode::AbsoluteAddress,
      Parameter::RelativeAddress(_) => ParameterMode::RelativeAddress,
      Parameter::RegisterAddress(_) => ParameterMode::RegisterAddress,
      Parameter::Register(_)        => ParameterMode::Register,
      Parameter::Label(_)           => ParameterMode::Label,
      Parameter::Unknown { mode, .. } => return *mode,
    };
    mode.tag()
  }

  /// The payload widened back to the raw 32 bit form.
  pub fn raw_value(&self) -> u32 {
    match *self {
      Parameter::Constant8(v)
      | Parameter::RegisterAddress(v)
      | Parameter::Register(v)        => v as u32,
      Parameter::Constant16(v)        => v as u32,
      Parameter::Constant32(v)
      | Parameter::AbsoluteAddress(v)
      | Parameter::Label(v)           => v,
      Parameter::RelativeAddress(v)   => v as u32,
      Parameter::Unknown { value, .. } => value,
    }
  }

  pub fn encoded_width(&self) -> Option<usize> {
    self.mode().map(|mode| mode.width())
  }

  /**
    Appends the little-endian encoding of the value to `out` and returns the number of bytes
    written. Labels and unknown modes have no binary form: nothing is written and 0 is
    returned, so they must be resolved before an instruction is encoded.
  */
  pub fn encode(&self, out: &mut Vec<u8>) -> usize {
    let start = out.len();
    match *self {
      Parameter::Constant8(v)
      | Parameter::RegisterAddress(v)
      | Parameter::Register(v)        => out.push(v),
      Parameter::Constant16(v)        => out.extend_from_slice(&v.to_le_bytes()),
      Parameter::Constant32(v)
      | Parameter::AbsoluteAddress(v) => out.extend_from_slice(&v.to_le_bytes()),
      Parameter::RelativeAddress(v)   => out.extend_from_slice(&v.to_le_bytes()),
      Parameter::Label(_)
      | Parameter::Unknown { .. }     => {}
    }
    out.len() - start
  }

  /// Reads one parameter of the given mode from the front of `input`.
  pub fn decode(mode: ParameterMode, input: &[u8]) -> IResult<&[u8], Parameter> {
    match mode {
      ParameterMode::Constant8       => map(le_u8, Parameter::Constant8)(input),
      ParameterMode::Constant16      => map(le_u16, Parameter::Constant16)(input),
      ParameterMode::Constant32      => map(le_u32, Parameter::Constant32)(input),
      ParameterMode::AbsoluteAddress => map(le_u32, Parameter::AbsoluteAddress)(input),
      ParameterMode::RelativeAddress => map(le_i32, Parameter::RelativeAddress)(input),
      ParameterMode::RegisterAddress => map(le_u8, Parameter::RegisterAddress)(input),
      ParameterMode::Register        => map(le_u8, Parameter::Register)(input),
      ParameterMode::Label           => fail(input),
    }
  }

  /**
    Replaces a label with the absolute address `lookup` gives for its symbol id. Any other
    parameter is returned unchanged.
  */
  pub fn resolve<F>(self, lookup: F) -> Result<Parameter, CodingError>
    where F: FnOnce(u32) -> Option<u32>
  {
    match self {
      Parameter::Label(id) => {
        lookup(id)
          .map(Parameter::AbsoluteAddress)
          .ok_or(CodingError::UnresolvedLabel(id))
      }
      other => Ok(other)
    }
  }

  /// Assembly text of the parameter. Never fails: anything unprintable uses the `{0x..}` form.
  pub fn format_text(&self, registers: &dyn RegisterTable) -> String {
    let mut text = String::new();
    // Writing into a `String` cannot fail.
    let _ = self.write_text(&mut text, registers);
    text
  }

  pub fn write_text<W: Write>(&self, sink: &mut W, registers: &dyn RegisterTable)
    -> std::fmt::Result
  {
    match *self {
      Parameter::Constant8(v)       => write!(sink, "{:#x}u8", v),
      Parameter::Constant16(v)      => write!(sink, "{:#x}u16", v),
      Parameter::Constant32(v)      => write!(sink, "{:#x}u32", v),
      Parameter::AbsoluteAddress(v) => write!(sink, "#{:x}", v),
      Parameter::RelativeAddress(v) if v < 0 => write!(sink, "$-{:x}", v.unsigned_abs()),
      Parameter::RelativeAddress(v) => write!(sink, "${:x}", v),

      Parameter::RegisterAddress(r) => match registers.name(r) {
        Some(name) => write!(sink, "@{}", name),
        None       => write!(sink, "{{{:#x}}}", r)
      },

      Parameter::Register(r) => match registers.name(r) {
        Some(name) => write!(sink, "{}", name),
        None       => write!(sink, "{{{:#x}}}", r)
      },

      _ => write!(sink, "{{{:#x}}}", self.raw_value())
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::registers::Tx8Registers;
  use pretty_assertions::assert_eq;

  #[test]
  fn widths_of_concrete_modes() {
    let expected = [1, 2, 4, 4, 4, 1, 1];
    for (tag, width) in expected.iter().enumerate() {
      assert_eq!(encoded_width(tag as u8), Some(*width));
    }
    assert_eq!(encoded_width(ParameterMode::Label.tag()), encoded_width(ParameterMode::Constant32.tag()));
  }

  #[test]
  fn unknown_mode_has_no_width() {
    assert_eq!(encoded_width(8), None);
    assert_eq!(encoded_width(0xff), None);
    assert_eq!(Parameter::Unknown { mode: 12, value: 3 }.encoded_width(), None);
    assert_eq!(Parameter::Unknown { mode: 3, value: 3 }.encoded_width(), None);
  }

  #[test]
  fn only_sized_parameters_have_a_mode() {
    assert_eq!(Parameter::Register(1).mode(), Some(ParameterMode::Register));
    assert_eq!(Parameter::Label(9).mode(), Some(ParameterMode::Label));
    let odd = Parameter::Unknown { mode: 3, value: 0x1234 };
    assert_eq!(odd.mode(), None);
    assert_eq!(odd.mode_tag(), 3);
  }

  #[test]
  fn encode_writes_declared_width() {
    let params = [
      Parameter::Constant8(0xab),
      Parameter::Constant16(0x1234),
      Parameter::Constant32(0xdead_beef),
      Parameter::AbsoluteAddress(0x40_0000),
      Parameter::RelativeAddress(-1),
      Parameter::RegisterAddress(0x12),
      Parameter::Register(0x03),
    ];
    for p in params.iter() {
      let mut out = vec![];
      assert_eq!(Some(p.encode(&mut out)), p.encoded_width());
      assert_eq!(Some(out.len()), p.encoded_width());
    }
  }

  #[test]
  fn encode_is_little_endian() {
    let mut out = vec![0x99];
    Parameter::Constant16(0x1234).encode(&mut out);
    Parameter::RelativeAddress(-2).encode(&mut out);
    assert_eq!(out, vec![0x99, 0x34, 0x12, 0xfe, 0xff, 0xff, 0xff]);
  }

  #[test]
  fn labels_and_unknown_modes_write_nothing() {
    let mut out = vec![];
    assert_eq!(Parameter::Label(4).encode(&mut out), 0);
    assert_eq!(Parameter::Unknown { mode: 9, value: 1 }.encode(&mut out), 0);
    assert!(out.is_empty());
  }

  #[test]
  fn raw_values_are_truncated_to_the_mode() {
    let p = Parameter::from_raw(ParameterMode::Constant8.tag(), 0x1ff);
    let mut out = vec![];
    p.encode(&mut out);
    let (rest, decoded) = Parameter::decode(ParameterMode::Constant8, &out).unwrap();
    assert!(rest.is_empty());
    assert_eq!(decoded, Parameter::Constant8(0xff));

    let p = Parameter::from_raw(ParameterMode::Constant16.tag(), 0xabcd_1234);
    assert_eq!(p, Parameter::Constant16(0x1234));
  }

  #[test]
  fn relative_addresses_keep_their_sign() {
    let p = Parameter::from_raw(ParameterMode::RelativeAddress.tag(), (-5i32) as u32);
    assert_eq!(p, Parameter::RelativeAddress(-5));

    let mut out = vec![];
    p.encode(&mut out);
    let (_, decoded) = Parameter::decode(ParameterMode::RelativeAddress, &out).unwrap();
    assert_eq!(decoded, Parameter::RelativeAddress(-5));
  }

  #[test]
  fn decode_needs_the_whole_value() {
    assert!(Parameter::decode(ParameterMode::Constant32, &[1, 2, 3]).is_err());
    assert!(Parameter::decode(ParameterMode::Label, &[1, 2, 3, 4]).is_err());
  }

  #[test]
  fn resolve_turns_labels_into_addresses() {
    let resolved = Parameter::Label(3).resolve(|id| if id == 3 { Some(0x40_0010) } else { None });
    assert_eq!(resolved, Ok(Parameter::AbsoluteAddress(0x40_0010)));

    let missing = Parameter::Label(4).resolve(|_| None);
    assert_eq!(missing, Err(CodingError::UnresolvedLabel(4)));

    assert_eq!(Parameter::Register(1).resolve(|_| None), Ok(Parameter::Register(1)));
  }

  #[test]
  fn text_forms() {
    let regs = Tx8Registers;
    assert_eq!(Parameter::Constant8(0x1f).format_text(&regs), "0x1fu8");
    assert_eq!(Parameter::Constant16(0).format_text(&regs), "0x0u16");
    assert_eq!(Parameter::Constant32(0xbeef).format_text(&regs), "0xbeefu32");
    assert_eq!(Parameter::AbsoluteAddress(0x40_0000).format_text(&regs), "#400000");
    assert_eq!(Parameter::RelativeAddress(-5).format_text(&regs), "$-5");
    assert_eq!(Parameter::RelativeAddress(5).format_text(&regs), "$5");
    assert_eq!(Parameter::RelativeAddress(-26).format_text(&regs), "$-1a");
    assert_eq!(Parameter::RelativeAddress(i32::MIN).format_text(&regs), "$-80000000");
    assert_eq!(Parameter::RegisterAddress(0x01).format_text(&regs), "@b");
    assert_eq!(Parameter::Register(0x12).format_text(&regs), "cl");
  }

  #[test]
  fn unprintable_parameters_fall_back_to_braces() {
    let regs = Tx8Registers;
    assert_eq!(Parameter::Unknown { mode: 11, value: 0x2a }.format_text(&regs), "{0x2a}");
    assert_eq!(Parameter::Label(7).format_text(&regs), "{0x7}");
    assert_eq!(Parameter::Register(0x7f).format_text(&regs), "{0x7f}");
  }
}
