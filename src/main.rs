use std::fs::read;
use std::process::exit;

use clap::Parser;

use tx8_asm::listing::listing;
use tx8_asm::rom::ROM_LOAD_ADDRESS;
use tx8_asm::{Rom, Tx8Opcodes, Tx8Registers};

#[derive(Parser)]
#[command(name = "tx8-dis")]
#[command(version)]
#[command(about = "Disassembles tx8 ROM files (.txr) into a listing.")]
struct Cli {
  filename: String,

  /// Treat the file as a bare code image rather than a ROM.
  #[arg(long)]
  raw: bool,

  /// Address the code is loaded at, in hex.
  #[arg(long, value_parser = parse_address, default_value = "400000")]
  base: u32,
}

fn parse_address(text: &str) -> Result<u32, String> {
  let digits = text.trim_start_matches("0x");
  u32::from_str_radix(digits, 16).map_err(|e| format!("invalid address \"{}\": {}", text, e))
}

fn run(cli: &Cli) -> Result<(), String> {
  let data = read(&cli.filename)
    .map_err(|e| format!("Failed to open \"{}\": {}", cli.filename, e))?;

  let code = match cli.raw {
    true  => data,
    false => {
      let rom = Rom::parse(&data).map_err(|e| e.to_string())?;
      println!("Program \"{}\"", rom.name);
      println!("Description: {}", rom.description);
      if cli.base != ROM_LOAD_ADDRESS {
        println!("Listing at {:06x} instead of the load address {:06x}", cli.base, ROM_LOAD_ADDRESS);
      }
      rom.code
    }
  };

  let table = listing(&code, cli.base, &Tx8Opcodes, &Tx8Registers).map_err(|e| e.to_string())?;
  println!("{}", table);
  Ok(())
}

fn main() {
  let cli = Cli::parse();

  #[cfg(feature = "trace_encoding")]
  println!("Encoding trace ENABLED");

  if let Err(message) = run(&cli) {
    println!("{}", message);
    exit(1);
  }
}
