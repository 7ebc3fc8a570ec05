//! Conversions between YouTube's ISO 8601 durations, whole seconds and the
//! short clock format shown next to each video.

/// Parse an ISO 8601 duration (e.g. `PT15M33S`, `P1DT2H`) into whole seconds.
///
/// Anything that is not a well-formed `P[nW][nD][T[nH][nM][n[.f]S]]` yields
/// `0`, the same value YouTube reports for live streams. Years and months are
/// rejected since they have no fixed length.
pub fn parse_duration(text: &str) -> u64 {
    parse_components(text.trim()).unwrap_or(0)
}

fn parse_components(text: &str) -> Option<u64> {
    let rest = text.strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let (date_part, time_part) = match rest.split_once('T') {
        Some((_, "")) => return None,
        Some((date, time)) => (date, Some(time)),
        None => (rest, None),
    };

    let mut total = sum_units(date_part, &[('W', 604_800), ('D', 86_400)])?;
    if let Some(time) = time_part {
        total = total.checked_add(sum_units(time, &[('H', 3_600), ('M', 60), ('S', 1)])?)?;
    }
    Some(total)
}

/// Sum `<number><unit>` pairs; units must appear in the given order, at most once.
fn sum_units(part: &str, units: &[(char, u64)]) -> Option<u64> {
    let mut total: u64 = 0;
    let mut number = String::new();
    let mut next_unit = 0;

    for ch in part.chars() {
        if ch.is_ascii_digit() || ch == '.' || ch == ',' {
            number.push(ch);
            continue;
        }

        let offset = units[next_unit..].iter().position(|(unit, _)| *unit == ch)?;
        let (unit, factor) = units[next_unit + offset];
        next_unit += offset + 1;

        let value = parse_number(&number, unit == 'S')?;
        total = total.checked_add(value.checked_mul(factor)?)?;
        number.clear();
    }

    // Trailing digits without a unit designator
    if !number.is_empty() {
        return None;
    }
    Some(total)
}

fn parse_number(number: &str, allow_fraction: bool) -> Option<u64> {
    let (whole, fraction) = match number.split_once(['.', ',']) {
        Some((whole, fraction)) if allow_fraction => (whole, Some(fraction)),
        Some(_) => return None,
        None => (number, None),
    };

    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
    }
    whole.parse::<u64>().ok()
}

/// Format seconds as `H:MM:SS` or `M:SS`; zero renders as `Live`.
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "Live".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
