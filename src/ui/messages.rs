//! User-facing terminal messages. Diagnostics go through `tracing` instead.

use crate::utils::table::display_width;
use ansi_term::{Colour, Style};
use std::fmt;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn icon(&self) -> &'static str {
        match self {
            Level::Info => "ℹ️",
            Level::Success => "✅",
            Level::Warning => "⚠️",
            Level::Error => "❌",
        }
    }

    fn style(&self) -> Style {
        match self {
            Level::Info => Colour::Blue.bold(),
            Level::Success => Colour::Green.bold(),
            Level::Warning => Colour::Yellow.bold(),
            Level::Error => Colour::Red.bold(),
        }
    }
}

/// One message line: coloured icon, then the plain text.
pub fn render<T: fmt::Display>(level: Level, msg: T) -> String {
    format!("{} {}", level.style().paint(level.icon()), msg)
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", render(Level::Info, msg));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", render(Level::Success, msg));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", render(Level::Warning, msg));
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", render(Level::Error, msg));
}

/// Title underlined to its visible width (badges included).
pub fn render_header<T: fmt::Display>(title: T) -> String {
    let title = title.to_string();
    let rule = "═".repeat(display_width(&title));
    format!("{}\n{}", Colour::Cyan.bold().paint(title), rule)
}

pub fn header<T: fmt::Display>(title: T) {
    println!("{}", render_header(title));
}

/// Ask a yes/no question on stdin; anything but y/yes (or sí) is a no.
pub fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí")
    } else {
        false
    }
}
