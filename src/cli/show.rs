//! Show command implementation

use std::process::ExitCode;

use crate::remap::RemapTable;

use super::{open_palette, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the show command - build a table from clauses and print it
pub fn run_show(clauses: &[String], palette_source: &str, json: bool, entries: usize) -> ExitCode {
    let master = match open_palette(palette_source) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let mut table = RemapTable::new(&master, entries);
    for clause in clauses {
        if let Err(e) = table.add_to_translation(&master, clause) {
            eprintln!("Error: Invalid translation '{}': {}", clause, e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    }

    if json {
        match serde_json::to_string_pretty(&table) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: Cannot serialize table: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    print!("{}", format_table(&table));
    ExitCode::from(EXIT_SUCCESS)
}

/// One line per entry that maps somewhere other than itself, then a summary.
fn format_table(table: &RemapTable) -> String {
    let mut out = String::new();
    let mut changed = 0;
    for (i, (&remap, color)) in table.remap().iter().zip(table.palette()).enumerate() {
        if remap as usize != i {
            changed += 1;
            out.push_str(&format!("  {:3} -> {:3}  {}\n", i, remap, color));
        }
    }
    out.push_str(&format!("{} of {} entries remapped\n", changed, table.num_entries()));
    out
}
