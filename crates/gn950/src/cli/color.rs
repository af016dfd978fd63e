//! `check-color` and `palette` subcommands. Neither touches hardware.

use super::{Color, ColorCheckOutput, PaletteOutput, Result, print_json};

const PALETTE_COLUMNS: usize = 8;

/// Report whether `text` is a color the monitor accepts. Invalid input is
/// an answer, not an error.
pub(super) fn cmd_check_color(text: &str, json: bool) -> Result<()> {
    let verdict = Color::parse(text);

    if json {
        return print_json(&ColorCheckOutput {
            color: text.to_string(),
            valid: verdict.is_ok(),
            reason: verdict.err().map(|e| e.to_string()),
        });
    }

    match verdict {
        Ok(_) => println!("{text}: valid"),
        Err(e) => println!("{text}: invalid ({e})"),
    }
    Ok(())
}

pub(super) fn cmd_palette(json: bool) -> Result<()> {
    let colors: Vec<String> = Color::palette().map(|c| c.to_string()).collect();
    let levels: Vec<String> = Color::LEVELS.iter().map(|l| format!("{l:02x}")).collect();

    if json {
        return print_json(&PaletteOutput {
            levels,
            count: colors.len(),
            colors,
        });
    }

    println!("Channel levels: {}", levels.join(" "));
    println!("One channel must be ff and another 00 (ffffff is the only exception).");
    println!();
    for row in colors.chunks(PALETTE_COLUMNS) {
        println!("  {}", row.join("  "));
    }
    println!();
    println!("{} colors", colors.len());
    Ok(())
}
