//! Terminal styling helpers.

use console::Style;

use themesync_core::{Operation, Readiness};

/// Green checkmark prefix.
pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

/// Red cross prefix.
pub fn error(msg: &str) -> String {
    let style = Style::new().red();
    format!("{} {}", style.apply_to("✗"), msg)
}

/// Yellow warning prefix.
pub fn warn(msg: &str) -> String {
    let style = Style::new().yellow();
    format!("{} {}", style.apply_to("⚠"), msg)
}

pub fn header(msg: &str) -> String {
    let style = Style::new().bold();
    style.apply_to(msg).to_string()
}

pub fn dim(msg: &str) -> String {
    let style = Style::new().dim();
    style.apply_to(msg).to_string()
}

/// Colored label for a remote operation.
pub fn operation(op: Operation) -> String {
    let style = match op {
        Operation::Fetch => Style::new().blue().bold(),
        Operation::Push => Style::new().green().bold(),
        Operation::UnionMerge => Style::new().magenta().bold(),
    };
    style.apply_to(op.to_string()).to_string()
}

/// Padded, colored readiness label.
pub fn readiness(readiness: Readiness) -> String {
    let style = match readiness {
        Readiness::Ready => Style::new().green(),
        Readiness::Ignored => Style::new().dim(),
        Readiness::Missing => Style::new().red(),
        Readiness::Unchanged => Style::new().dim(),
    };
    style.apply_to(format!("{:<9}", readiness.label())).to_string()
}
