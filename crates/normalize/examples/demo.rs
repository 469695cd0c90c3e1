use std::env;
use std::fs;

use normalize::{hash_text, normalize};

fn main() {
    let Some(file_path) = env::args().nth(1) else {
        eprintln!("usage: demo <file>");
        std::process::exit(2);
    };
    let content = fs::read_to_string(&file_path).expect("file path invalid");

    let cleaned = normalize(&content);
    println!("{cleaned}");
    println!();
    println!("chars: {} -> {}", content.chars().count(), cleaned.chars().count());
    println!("sha256: {}", hash_text(&cleaned));
}
