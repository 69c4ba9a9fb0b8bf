//! Startup banner: "ASIMOVIES" in the figlet standard font, shaded row by row
//! from marquee red to popcorn yellow.

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{self, Write, stdout};

const MARQUEE_RED: [u8; 3] = [0xe5, 0x09, 0x14];
const POPCORN_YELLOW: [u8; 3] = [0xff, 0xd1, 0x66];

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

/// One color per row, first row `from`, last row `to`.
fn row_shades(rows: usize, from: [u8; 3], to: [u8; 3]) -> Vec<Color> {
    let steps = rows.saturating_sub(1).max(1) as i32;
    (0..rows as i32)
        .map(|row| {
            let mut shade = [0u8; 3];
            for (c, (a, b)) in shade.iter_mut().zip(from.iter().zip(to.iter())) {
                let (a, b) = (i32::from(*a), i32::from(*b));
                *c = (a + (b - a) * row / steps) as u8;
            }
            rgb(shade)
        })
        .collect()
}

/// Render the banner text. Falls back to the plain name if the font cannot be loaded.
fn render(text: &str) -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(text).map(|figure| figure.to_string()))
        .unwrap_or_else(|| format!("{}\n", text))
}

fn write_banner(out: &mut impl Write, address: &str) -> io::Result<()> {
    let art = render("ASIMOVIES");
    let rows: Vec<&str> = art.lines().collect();
    for (row, shade) in rows.iter().zip(row_shades(rows.len(), MARQUEE_RED, POPCORN_YELLOW)) {
        queue!(out, SetForegroundColor(shade), Print(row), Print("\r\n"))?;
    }
    queue!(
        out,
        SetForegroundColor(rgb(POPCORN_YELLOW)),
        Print(format!(
            "v{} listening on {}\r\n",
            env!("CARGO_PKG_VERSION"),
            address
        )),
        ResetColor
    )?;
    out.flush()
}

/// Prints the banner, then the version and listening address. Terminal errors are ignored.
pub fn print_welcome(address: &str) {
    let _ = write_banner(&mut stdout(), address);
}
