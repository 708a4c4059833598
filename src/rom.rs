/*!
  The tx8 ROM container (`.txr`). A ROM is a 64 byte header followed by the program name, the
  program description, and the code image:

  ```text
    [magic:"TX8\0"][name len:8][description len:16][code len:32][reserved:424]
    [name][description][code]
  ```

  All lengths are little-endian. The CPU maps the code to `ROM_LOAD_ADDRESS`.
*/

use nom::{
  bytes::complete::{tag, take},
  number::complete::{le_u16, le_u32, le_u8},
  sequence::tuple,
  IResult
};

use crate::error::RomError;

pub const ROM_MAGIC       : &[u8; 4] = b"TX8\0";
pub const ROM_HEADER_LEN  : usize    = 64;
pub const ROM_LOAD_ADDRESS: u32      = 0x40_0000;
/// The ROM window of tx8 memory is 8 MiB.
pub const ROM_MAX_CODE_LEN: usize    = 1 << 23;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rom {
  pub name        : String,
  pub description : String,
  pub code        : Vec<u8>,
}

struct Header {
  name_len        : usize,
  description_len : usize,
  code_len        : usize,
}

fn parse_header(input: &[u8]) -> IResult<&[u8], Header> {
  let fields: IResult<&[u8], (&[u8], u8, u16, u32)> =
    tuple((tag(&ROM_MAGIC[..]), le_u8, le_u16, le_u32))(input);
  let (rest, (_, name_len, description_len, code_len)) = fields?;

  let reserved: IResult<&[u8], &[u8]> = take(ROM_HEADER_LEN - (input.len() - rest.len()))(rest);
  let (rest, _) = reserved?;

  Ok((rest, Header {
    name_len        : name_len as usize,
    description_len : description_len as usize,
    code_len        : code_len as usize,
  }))
}

impl Rom {
  pub fn new(name: &str, description: &str, code: Vec<u8>) -> Rom {
    Rom { name: name.to_string(), description: description.to_string(), code }
  }

  /// Reads a ROM image. The image must end exactly where its header says the code ends.
  pub fn parse(data: &[u8]) -> Result<Rom, RomError> {
    if data.len() < ROM_HEADER_LEN {
      return Err(RomError::TooShort);
    }
    if data[..4] != ROM_MAGIC[..] {
      return Err(RomError::BadMagic);
    }
    let (body, header) = parse_header(data).map_err(|_| RomError::TooShort)?;

    let expected = ROM_HEADER_LEN + header.name_len + header.description_len + header.code_len;
    if data.len() != expected {
      return Err(RomError::LengthMismatch { expected, actual: data.len() });
    }
    if header.code_len > ROM_MAX_CODE_LEN {
      return Err(RomError::CodeTooLarge(header.code_len));
    }

    let (name, rest)        = body.split_at(header.name_len);
    let (description, code) = rest.split_at(header.description_len);

    let text = |bytes: &[u8]| {
      std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| RomError::InvalidUtf8)
    };

    Ok(Rom {
      name        : text(name)?,
      description : text(description)?,
      code        : code.to_vec(),
    })
  }

  pub fn to_bytes(&self) -> Result<Vec<u8>, RomError> {
    if self.name.len() > u8::MAX as usize {
      return Err(RomError::FieldTooLong("name"));
    }
    if self.description.len() > u16::MAX as usize {
      return Err(RomError::FieldTooLong("description"));
    }
    if self.code.len() > ROM_MAX_CODE_LEN {
      return Err(RomError::CodeTooLarge(self.code.len()));
    }

    let mut data = Vec::with_capacity(
      ROM_HEADER_LEN + self.name.len() + self.description.len() + self.code.len()
    );
    data.extend_from_slice(ROM_MAGIC);
    data.push(self.name.len() as u8);
    data.extend_from_slice(&(self.description.len() as u16).to_le_bytes());
    data.extend_from_slice(&(self.code.len() as u32).to_le_bytes());
    data.resize(ROM_HEADER_LEN, 0);

    data.extend_from_slice(self.name.as_bytes());
    data.extend_from_slice(self.description.as_bytes());
    data.extend_from_slice(&self.code);
    Ok(data)
  }
}
