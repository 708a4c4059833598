//! Register names for assembly text. The coder never needs them; only the printer does.

use bimap::BiMap;

/// Maps register values, as they appear in `register` and `register_address` parameters, to names.
pub trait RegisterTable {
  fn name(&self, index: u8) -> Option<&str>;
}

/// A plain array of names indexed by register value is a valid table.
impl<S: AsRef<str>, const N: usize> RegisterTable for [S; N] {
  fn name(&self, index: u8) -> Option<&str> {
    self.get(index as usize).map(|name| name.as_ref())
  }
}

/**
  The eight tx8 registers. The low nibble of a register value selects the register, the high
  nibble selects how much of it is used:

  ```text
    0x0_   the whole 32 bit register   (a, b, c, ...)
    0x1_   its low byte                (al, bl, cl, ...)
    0x2_   its low 16 bits             (aw, bw, cw, ...)
  ```
*/
const REGISTER_LETTERS: [&str; 8] = ["a", "b", "c", "d", "r", "o", "p", "s"];

lazy_static! {
  static ref TX8_REGISTER_NAMES: BiMap<u8, String> = {
    let mut names = BiMap::new();
    for (view, suffix) in [(0x00u8, ""), (0x10, "l"), (0x20, "w")].iter() {
      for (i, letter) in REGISTER_LETTERS.iter().enumerate() {
        names.insert(view | i as u8, format!("{}{}", letter, suffix));
      }
    }
    names
  };
}

/// The register file of the tx8 CPU.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tx8Registers;

impl Tx8Registers {
  /// The register value for a register name, the inverse of `name`.
  pub fn index_of(&self, name: &str) -> Option<u8> {
    TX8_REGISTER_NAMES.get_by_right(name).copied()
  }
}

impl RegisterTable for Tx8Registers {
  fn name(&self, index: u8) -> Option<&str> {
    TX8_REGISTER_NAMES.get_by_left(&index).map(String::as_str)
  }
}
