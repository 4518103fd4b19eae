//! Operator-facing output: step headers, outcome lines and the mirror spinner.

pub mod icons;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use icons::{CHECK, CROSS, WARN};

/// Print the header for a sync or delete step.
pub fn step(message: impl AsRef<str>) {
    println!("{}", style(message.as_ref()).bold());
}

pub fn success(message: impl AsRef<str>) {
    println!("{}{}", CHECK, message.as_ref());
}

pub fn warning(message: impl AsRef<str>) {
    println!("{}{}", WARN, style(message.as_ref()).yellow());
}

pub fn failure(message: impl AsRef<str>) {
    println!("{}{}", CROSS, style(message.as_ref()).red());
}

pub fn note(message: impl AsRef<str>) {
    println!("  {}", style(message.as_ref()).dim());
}

/// Start a ticking spinner; call `finish_and_clear` when the work is done.
///
/// Hidden when stderr is not a terminal so piped output stays clean.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    if !console::Term::stderr().is_term() {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .expect("spinner template is a valid static string");
    let bar = ProgressBar::new_spinner();
    bar.set_style(style);
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
