//! Mismatch report, one line per unbalanced pointer.

use std::io::{self, Write};

use owo_colors::{OwoColorize, Stream};

use crate::ledger::Ledger;

/// Writes the report and returns how many pointers were mismatched.
///
/// The pointer is highlighted when stdout is a color terminal; piped
/// output stays plain so the line format is stable for tooling.
pub fn write_mismatches(ledger: &Ledger, out: &mut impl Write) -> io::Result<usize> {
    let mut mismatches = 0;
    for entry in ledger.mismatches() {
        writeln!(
            out,
            "Alloc/free mismatch for {}: {} allocs and {} frees.",
            entry
                .pointer
                .if_supports_color(Stream::Stdout, |pointer| pointer.yellow()),
            entry.allocs,
            entry.frees,
        )?;
        mismatches += 1;
    }
    Ok(mismatches)
}
