// Numeric text handling shared by the editor parsers and the dashboard figures

/// Extra decimals rendered to tell an exact half from a value merely near one
const TIE_PROBE_DIGITS: usize = 40;

/// Convert editor text to a number the way the browser form did: surrounding
/// whitespace is ignored, blank text is 0, `Infinity` must be spelled out,
/// `0x`/`0o`/`0b` integers are accepted, and anything else that is not a
/// plain decimal literal is NaN.
pub fn coerce_number(text: &str) -> f64 {
    let token = text.trim();
    if token.is_empty() {
        return 0.0;
    }

    match token {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => parse_radix_literal(token)
            .or_else(|| parse_decimal_literal(token))
            .unwrap_or(f64::NAN),
    }
}

fn parse_radix_literal(token: &str) -> Option<f64> {
    let (digits, radix) = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .into_iter()
        .find_map(|(prefix, radix)| token.strip_prefix(prefix).map(|rest| (rest, radix)))?;

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok().map(|v| v as f64)
}

fn parse_decimal_literal(token: &str) -> Option<f64> {
    // Keeps `inf`, `nan` and friends away from the float parser
    let plain = token
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !plain {
        return None;
    }
    token.parse::<f64>().ok()
}

/// Fixed-point text with `digits` decimals. Exact halves round away from
/// zero (`0.8125` -> `0.813`), unlike `format!`, which rounds them to even.
pub fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    let wide = format!("{:.*}", digits + TIE_PROBE_DIGITS, magnitude);
    let (head, tail) = wide.split_at(wide.len() - TIE_PROBE_DIGITS);
    let is_tie = tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0');

    let rounded = if is_tie {
        increment_last_digit(head.trim_end_matches('.'))
    } else {
        format!("{:.*}", digits, magnitude)
    };
    format!("{}{}", sign, rounded)
}

fn increment_last_digit(number: &str) -> String {
    let mut chars: Vec<char> = number.chars().collect();
    for c in chars.iter_mut().rev() {
        match *c {
            '.' => continue,
            '9' => *c = '0',
            d => {
                *c = char::from(d as u8 + 1);
                return chars.into_iter().collect();
            }
        }
    }
    std::iter::once('1').chain(chars).collect()
}
