//! Display formatting for skill metadata.

/// Render an install count compactly: `950`, `1.2K`, `3.4M`.
///
/// Trailing `.0` is dropped (`2K`, not `2.0K`).
pub fn format_install_count(count: u64) -> String {
    const UNITS: [(u64, &str); 3] = [(1_000, "K"), (1_000_000, "M"), (1_000_000_000, "B")];

    if count < UNITS[0].0 {
        return count.to_string();
    }

    // Rounding can carry into the next unit (999_960 is 1M, not 1000K).
    let mut chosen = (0, UNITS[0].1);
    for (scale, suffix) in UNITS {
        let tenths = count.saturating_mul(10).saturating_add(scale / 2) / scale;
        chosen = (tenths, suffix);
        if tenths < 10_000 {
            break;
        }
    }

    let (tenths, suffix) = chosen;
    if tenths % 10 == 0 {
        format!("{}{suffix}", tenths / 10)
    } else {
        format!("{}.{}{suffix}", tenths / 10, tenths % 10)
    }
}
