use thrustcore::StatisticsSummary;

/// Renders the statistics panel shown next to the thrust plot.
pub fn render_stats_panel(summary: Option<&StatisticsSummary>) -> String {
    let Some(stats) = summary else {
        return "No data loaded\n".to_string();
    };

    let rows: [Option<(&str, String)>; 14] = [
        Some(("Total Samples", group_thousands(stats.count))),
        Some(("Valid", group_thousands(stats.valid_count))),
        Some(("Invalid", group_thousands(stats.invalid_count))),
        None,
        Some(("Min Thrust", format!("{:.3} N", stats.min))),
        Some(("Max Thrust", format!("{:.3} N", stats.max))),
        Some(("Range", format!("{:.3} N", stats.range))),
        None,
        Some(("Mean", format!("{:.3} N", stats.mean))),
        Some(("Median", format!("{:.3} N", stats.median))),
        Some(("Std Dev", format!("{:.3} N", stats.std))),
        None,
        Some(("Sample Rate", format!("{:.1} Hz", stats.sample_rate_hz))),
        Some(("Duration", format!("{:.2} s", stats.duration_sec))),
    ];

    let mut out = String::new();
    for row in rows {
        match row {
            Some((label, value)) => {
                out.push_str(&format!("{:<16}{:>16}\n", format!("{label}:"), value))
            }
            None => out.push_str(&format!("{}\n", "-".repeat(32))),
        }
    }
    out
}

fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
