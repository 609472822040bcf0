use crate::renderer::SECTION;

pub const RESET: &str = "\x1b[0m";

/// Render legacy `§` formatting codes as ANSI SGR sequences for a terminal.
/// Unknown codes are dropped. A reset is appended when any code was emitted.
pub fn to_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut styled = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != SECTION {
            out.push(ch);
            continue;
        }
        let Some(code) = chars.next() else {
            break;
        };
        if let Some(sgr) = sgr_code(code) {
            out.push_str("\x1b[");
            out.push_str(sgr);
            out.push('m');
            styled = true;
        }
    }

    if styled {
        out.push_str(RESET);
    }
    out
}

/// Remove every `§` formatting code.
pub fn strip_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch == SECTION {
            chars.next();
        } else {
            out.push(ch);
        }
    }
    out
}

fn sgr_code(code: char) -> Option<&'static str> {
    match code.to_ascii_lowercase() {
        '0' => Some("30"),
        '1' => Some("34"),
        '2' => Some("32"),
        '3' => Some("36"),
        '4' => Some("31"),
        '5' => Some("35"),
        '6' => Some("33"),
        '7' => Some("37"),
        '8' => Some("90"),
        '9' => Some("94"),
        'a' => Some("92"),
        'b' => Some("96"),
        'c' => Some("91"),
        'd' => Some("95"),
        'e' => Some("93"),
        'f' => Some("97"),
        'k' => Some("8"),
        'l' => Some("1"),
        'm' => Some("9"),
        'n' => Some("4"),
        'o' => Some("3"),
        'r' => Some("0"),
        _ => None,
    }
}
