//! CLI command implementations.

pub mod cart;
pub mod fetch;
pub mod gift_card;
pub mod search;

use std::fmt::Display;

/// Write one line of command output to stdout.
///
/// Diagnostics go through `tracing` (stderr); only results land here.
#[allow(clippy::print_stdout)]
fn emit(line: impl Display) {
    println!("{line}");
}
