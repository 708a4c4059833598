//! Disassembly listings: one table row per instruction with its address, bytes, and assembly.

use prettytable::{format as TableFormat, Table};

use crate::bytecode::{format_text, OpcodeTable};
use crate::error::CodingError;
use crate::program::decode_program;
use crate::registers::RegisterTable;

lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

/**
  Decodes `code` and lays it out as a table. `base` is the address the first byte of `code` is
  loaded at, usually `rom::ROM_LOAD_ADDRESS`.
*/
pub fn listing(
    code      : &[u8],
    base      : u32,
    opcodes   : &dyn OpcodeTable,
    registers : &dyn RegisterTable
  ) -> Result<Table, CodingError>
{
  let mut table = Table::new();
  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubr->"Address", ubl->"Bytes", ubl->"Instruction"]);

  for located in decode_program(code, opcodes)? {
    let bytes = code[located.offset..located.offset + located.length]
      .iter()
      .map(|b| format!("{:02x}", b))
      .collect::<Vec<String>>()
      .join(" ");
    let text = format_text(&located.instruction, opcodes, registers);

    table.add_row(row![
      r->format!("{:06x}", base as usize + located.offset),
      bytes,
      text.trim_end()
    ]);
  }

  Ok(table)
}
