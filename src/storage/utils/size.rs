const UNITS: [&str; 5] = ["B", "K", "M", "G", "T"];

/// Format a byte count with 1024-based units, e.g. `512B`, `1.5K`, `3.0G`.
pub fn format_size(size: u64) -> String {
    let mut unit = 0;
    let mut scaled = size as f64;
    while scaled >= 1024.0 && unit + 1 < UNITS.len() {
        scaled /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{size}B")
    } else {
        format!("{scaled:.1}{}", UNITS[unit])
    }
}
