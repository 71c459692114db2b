//! Palette command implementation

use std::process::ExitCode;

use crate::color::{parse_color, PalEntry};
use crate::palettes::{list_builtins, MasterPalette};

use super::{open_palette, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the palette command
pub fn run_palette(source: &str, nearest: Option<&str>) -> ExitCode {
    let master = match open_palette(source) {
        Ok(p) => p,
        Err(code) => {
            eprintln!("Built-in palettes: {}", list_builtins().join(", "));
            return code;
        }
    };

    match nearest {
        Some(color) => match parse_color(color) {
            Ok(rgba) => {
                let pe = PalEntry::from(rgba);
                let index = master.nearest_entry(pe);
                println!("{} -> {} {}", pe, index, master.color(index));
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: Invalid color '{}': {}", color, e);
                ExitCode::from(EXIT_INVALID_ARGS)
            }
        },
        None => {
            print!("{}", format_palette(&master));
            ExitCode::from(EXIT_SUCCESS)
        }
    }
}

/// Eight entries per line, prefixed with the first index.
fn format_palette(master: &MasterPalette) -> String {
    let mut out = String::new();
    for (row, chunk) in master.colors().chunks(8).enumerate() {
        let colors: Vec<String> = chunk.iter().map(|c| c.to_hex()[..7].to_string()).collect();
        out.push_str(&format!("{:3}: {}\n", row * 8, colors.join(" ")));
    }
    out
}
