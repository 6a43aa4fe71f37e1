// Counts capturing moves in PGN files and reports notation defects.
// Usage: cargo run -- [PGN]...

use std::{env, fs, io};

use pgn_captures::analyze;

fn main() -> io::Result<()> {
    for arg in env::args().skip(1) {
        let pgn = fs::read(&arg)?;
        let analysis = analyze(&pgn);
        println!("{arg}: {} captures", analysis.captures);
        for diagnostic in &analysis.diagnostics {
            eprintln!("{arg}: {diagnostic}");
        }
    }
    Ok(())
}
