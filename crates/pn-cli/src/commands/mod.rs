pub mod crowd;
pub mod personas;
pub mod play;
pub mod simulate;

use colored::Colorize;

/// Format a price with its change since the open, green up and red down.
fn format_price(price: f64, change_percent: f64) -> String {
    let change = format!("{change_percent:+.2}%");
    let change = if change_percent >= 0.0 {
        change.green()
    } else {
        change.red()
    };
    format!("{price:.2} ({change})")
}
