//! Boxed text and centering at a few widths.
//!
//! Run with: cargo run --example boxed_text [text]

use std::env;

use g2c::console::{center_text, format_box};

fn main() {
    let text = env::args()
        .nth(1)
        .unwrap_or_else(|| "G2C draws boxes around text and wraps lines that do not fit".to_string());

    for width in [30, 50, 80] {
        println!("width {}:", width);
        print!("{}", format_box(&text, "*", 2, width));
        println!();
    }

    println!("[{}]", center_text("centered", 20));
    print!("{}", format_box("Title\nSubtitle", "=", 1, 24));
}
