pub mod ansi;

use once_cell::sync::Lazy;
use regex::Regex;

/// Formatting code prefix understood by game clients.
pub const SECTION: char = '§';

static ALT_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"&([0-9a-fk-orxA-FK-ORX])").expect("valid color code regex"));

/// Translate `&`-prefixed color codes (eg: "&6Gold") into client formatting codes ("§6Gold").
/// An `&` that is not followed by a known code is kept as is.
pub fn translate_color_codes(text: &str) -> String {
    ALT_CODE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            format!("{}{}", SECTION, caps[1].to_ascii_lowercase())
        })
        .into_owned()
}
