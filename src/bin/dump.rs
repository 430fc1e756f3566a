use std::fs;
use std::path::PathBuf;

use clap::Parser;
use menu_import::decipher::decipher_text;
use menu_import::extract::parse_menu_text;
use menu_import::pdf::extract_text;

/// Prints every stage of the import pipeline for a local PDF.
#[derive(Parser)]
#[command(name = "dump")]
struct Args {
    pdf: PathBuf,

    /// Also print the text exactly as pdf-extract returns it.
    #[arg(long)]
    raw: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let bytes = fs::read(&args.pdf)?;
    let text = extract_text(&bytes)?;

    if args.raw {
        println!("=== RAW TEXT ===");
        for (i, line) in text.lines().enumerate() {
            if !line.trim().is_empty() {
                println!("{}: {:?}", i, line);
            }
        }
    }

    let deciphered = decipher_text(&text);
    println!("=== DECIPHERED TEXT ===");
    for (i, line) in deciphered.lines().enumerate() {
        if !line.trim().is_empty() {
            println!("{}: {}", i, line);
        }
    }

    let menu = parse_menu_text(&deciphered);
    println!("=== PARSED MENU ===");
    println!("{}", serde_json::to_string_pretty(&menu)?);

    Ok(())
}
