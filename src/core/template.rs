//! printf-style rendering of reply templates.
//!
//! Templates take exactly one numeric parameter (the win rate in percent).
//! Every conversion in the template renders that same value.

/// Largest precision honoured; higher values are clamped.
pub const MAX_PRECISION: usize = 20;
/// Largest field width honoured; higher values are clamped.
pub const MAX_WIDTH: usize = 300;
/// Rendered replies are cut to this many bytes, like the engine's fixed reply buffer.
pub const MAX_RENDERED_LEN: usize = 1023;

#[derive(Debug, Default)]
struct Spec {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
}

pub fn format_reply(template: &str, value: f64) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];

        match parse_conversion(tail) {
            Some((spec, conv, consumed)) => {
                match conv {
                    '%' => out.push('%'),
                    'f' | 'F' | 'e' | 'E' | 'g' | 'G' => {
                        let body = format!("{:.*}", spec.precision.unwrap_or(6), value.abs());
                        out.push_str(&pad(&spec, value < 0.0, &body));
                    }
                    'd' | 'i' => {
                        let int = value.trunc() as i64;
                        out.push_str(&pad(&spec, int < 0, &int.unsigned_abs().to_string()));
                    }
                    _ => out.push_str(&rest[pos..pos + 1 + consumed]),
                }
                rest = &tail[consumed..];
            }
            None => {
                // dangling or malformed sequence, keep it as written
                out.push('%');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    truncate_at_boundary(&mut out, MAX_RENDERED_LEN);
    out
}

fn truncate_at_boundary(s: &mut String, max_len: usize) {
    if s.len() <= max_len {
        return;
    }
    let mut end = max_len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}

/// Parses a run of digits, saturating instead of overflowing.
fn parse_clamped(digits: &str, max: usize) -> usize {
    digits
        .bytes()
        .fold(0usize, |acc, d| {
            acc.saturating_mul(10).saturating_add(usize::from(d - b'0'))
        })
        .min(max)
}

/// Parses `[flags][width][.precision][length]conv` after a `%`.
/// Returns the spec, the conversion character and the bytes consumed.
fn parse_conversion(s: &str) -> Option<(Spec, char, usize)> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut spec = Spec::default();

    while i < bytes.len() {
        match bytes[i] {
            b'-' => spec.left = true,
            b'+' => spec.plus = true,
            b' ' => spec.space = true,
            b'0' => spec.zero = true,
            b'#' => {}
            _ => break,
        }
        i += 1;
    }

    let start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i > start {
        spec.width = parse_clamped(&s[start..i], MAX_WIDTH);
    }

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        spec.precision = Some(parse_clamped(&s[start..i], MAX_PRECISION));
    }

    while i < bytes.len() && matches!(bytes[i], b'l' | b'h' | b'L') {
        i += 1;
    }

    let conv = s[i..].chars().next()?;
    Some((spec, conv, i + conv.len_utf8()))
}

fn pad(spec: &Spec, negative: bool, body: &str) -> String {
    let sign = if negative {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    };

    let len = sign.len() + body.len();
    if len >= spec.width {
        return format!("{}{}", sign, body);
    }

    let fill = spec.width - len;
    if spec.left {
        format!("{}{}{}", sign, body, " ".repeat(fill))
    } else if spec.zero {
        format!("{}{}{}", sign, "0".repeat(fill), body)
    } else {
        format!("{}{}{}", " ".repeat(fill), sign, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_and_percent() {
        assert_eq!(format_reply("%.1f%% I'm losing", 25.0), "25.0% I'm losing");
        assert_eq!(format_reply("%f", 12.5), "12.500000");
        assert_eq!(format_reply("%.0f", 66.6), "67");
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(format_reply("Today", 50.0), "Today");
        assert_eq!(format_reply("", 50.0), "");
    }

    #[test]
    fn test_width_and_flags() {
        assert_eq!(format_reply("[%6.1f]", 5.0), "[   5.0]");
        assert_eq!(format_reply("[%-6.1f]", 5.0), "[5.0   ]");
        assert_eq!(format_reply("[%06.1f]", -5.0), "[-005.0]");
        assert_eq!(format_reply("[%+.1f]", 5.0), "[+5.0]");
    }

    #[test]
    fn test_integer_conversion() {
        assert_eq!(format_reply("%d%%", 73.9), "73%");
        assert_eq!(format_reply("%3d", 7.0), "  7");
    }

    #[test]
    fn test_same_value_for_every_conversion() {
        assert_eq!(format_reply("%.0f then %.1f", 40.0), "40 then 40.0");
    }

    #[test]
    fn test_unknown_and_dangling_sequences_kept() {
        assert_eq!(format_reply("%s is fine", 1.0), "%s is fine");
        assert_eq!(format_reply("100%", 1.0), "100%");
    }

    #[test]
    fn test_huge_precision_is_clamped() {
        let reply = format_reply("%.70000f", 50.0);
        assert_eq!(reply, format!("50.{}", "0".repeat(MAX_PRECISION)));

        let reply = format_reply("%.99999999999999999999999f", 1.0);
        assert_eq!(reply.len(), 2 + MAX_PRECISION);
    }

    #[test]
    fn test_huge_width_is_clamped() {
        let reply = format_reply("%300000000.1f", 50.0);
        assert_eq!(reply.len(), MAX_WIDTH);
        assert!(reply.ends_with("50.0"));
    }

    #[test]
    fn test_rendered_reply_is_capped() {
        let reply = format_reply("%300d%300d%300d%300d", 7.0);
        assert_eq!(reply.len(), MAX_RENDERED_LEN);

        // the cut never splits a multi-byte character
        let reply = format_reply("%300d%300d%300d%122dé", 1.0);
        assert_eq!(reply.len(), 1022);
    }
}
