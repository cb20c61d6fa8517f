//! Short-hand size estimates such as `"3.14G"` or `"512"`.
//!
//! Listing pages only show rounded sizes, so every value produced here is an
//! approximation. Anything that cannot be read becomes zero; an odd size must
//! never prevent a manifest from being built.

/// Bytes in a kibibyte (`K`).
pub const KIB: u64 = 1024;
/// Bytes in a mebibyte (`M`).
pub const MIB: u64 = KIB * 1024;
/// Bytes in a gibibyte (`G`).
pub const GIB: u64 = MIB * 1024;

/// Extracts the size estimate from a listing row's text and converts it.
///
/// The estimate sits on its own line: everything between the first and the
/// second `'\n'` is taken and trimmed. Text with a single newline uses the
/// remainder after it; text without any newline is used whole.
#[must_use]
pub fn parse_size_text(text: &str) -> u64 {
    let line = match text.split_once('\n') {
        Some((_, rest)) => rest.split_once('\n').map_or(rest, |(line, _)| line),
        None => text,
    };
    bytes_from_estimate(line.trim())
}

/// Converts an estimate like `"1.5M"` into a byte count.
///
/// A trailing digit means the value is already in bytes. Any other trailing
/// character is a unit (`G`, `M`, `K`; unknown units count as bytes) and is
/// stripped before the number is read. The result is rounded down.
#[must_use]
pub fn bytes_from_estimate(estimate: &str) -> u64 {
    let Some(last) = estimate.chars().next_back() else {
        return 0;
    };

    let (number, multiplier) = if last.is_ascii_digit() {
        (estimate, 1)
    } else {
        let number = &estimate[..estimate.len() - last.len_utf8()];
        (number, unit_multiplier(last))
    };

    parse_decimal(number.trim()).map_or(0, |(mantissa, scale)| {
        let bytes = mantissa.saturating_mul(u128::from(multiplier)) / 10u128.pow(scale);
        u64::try_from(bytes).unwrap_or(u64::MAX)
    })
}

/// Renders a byte count in the listing's short-hand, e.g. `3.14G` or `512`.
///
/// Two decimals, rounded down, so reading the result back with
/// [`bytes_from_estimate`] never exceeds `bytes`.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    [(GIB, 'G'), (MIB, 'M'), (KIB, 'K')]
        .into_iter()
        .find(|&(scale, _)| bytes >= scale)
        .map_or_else(
            || bytes.to_string(),
            |(scale, unit)| {
                let hundredths = u128::from(bytes) * 100 / u128::from(scale);
                format!("{}.{:02}{unit}", hundredths / 100, hundredths % 100)
            },
        )
}

const fn unit_multiplier(unit: char) -> u64 {
    match unit {
        'G' => GIB,
        'M' => MIB,
        'K' => KIB,
        _ => 1,
    }
}

/// Reads a non-negative decimal as `(digits, fractional digit count)`.
///
/// `"3.14"` becomes `(314, 2)`. Exact integer arithmetic keeps
/// `floor(value * multiplier)` free of float rounding. Thousands
/// separators (`"1,024"`) are accepted after the first digit of the whole
/// part.
fn parse_decimal(text: &str) -> Option<(u128, u32)> {
    let text = text.strip_prefix('+').unwrap_or(text);
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));

    if whole.starts_with(',') || (whole.is_empty() && fraction.is_empty()) {
        return None;
    }
    let whole = whole.bytes().filter(|&b| b != b',');
    if !whole.clone().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    // u128 holds 38 digits; longer fractions add nothing after flooring
    let fraction = &fraction[..fraction.len().min(18)];
    let scale = u32::try_from(fraction.len()).ok()?;

    let mut mantissa: u128 = 0;
    for b in whole.chain(fraction.bytes()) {
        mantissa = mantissa
            .checked_mul(10)?
            .checked_add(u128::from(b - b'0'))?;
    }
    Some((mantissa, scale))
}
