//! Argument pre-processing for the `chest` command.
//!
//! The host hands us whitespace-split tokens. Before option parsing, quoted runs are glued
//! back together so names and locks can contain spaces:
//!   add -n "Old Chest" minecraft:chests/simple_dungeon   -> ["add", "-n", "Old Chest", ...]
//!   add -n "say \"hi\"" ...                              -> ["add", "-n", "say \"hi\"", ...]
//!
//! Usage:
//!   let intent = parse_command(&tokens);
//!   match intent.verb { Verb::Add => { /* intent.args */ }, _ => {} }

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Help,
    Reload,
    Add,
    Place,
    Remove,
    /// Anything else
    Custom(String),
}

impl Verb {
    pub fn as_str(&self) -> &str {
        match self {
            Verb::Help => "help",
            Verb::Reload => "reload",
            Verb::Add => "add",
            Verb::Place => "place",
            Verb::Remove => "remove",
            Verb::Custom(s) => s.as_str(),
        }
    }

    pub fn from_word(word: &str) -> Self {
        match word.to_ascii_lowercase().as_str() {
            "help" | "?" => Verb::Help,
            "reload" => Verb::Reload,
            "add" => Verb::Add,
            "place" => Verb::Place,
            "remove" | "rm" => Verb::Remove,
            _ => Verb::Custom(word.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Intent {
    pub verb: Verb,
    /// Arguments after the verb, quoted runs already joined
    pub args: Vec<String>,
}

/// Splits a console line the way the game server tokenizes chat commands: on whitespace,
/// with no quoting.
pub fn split_line(line: &str) -> Vec<String> {
    line.split_whitespace().map(String::from).collect()
}

/// Verb and pre-processed arguments. `None` when there are no tokens at all.
pub fn parse_command<S: AsRef<str>>(tokens: &[S]) -> Option<Intent> {
    let (first, rest) = tokens.split_first()?;
    Some(Intent {
        verb: Verb::from_word(first.as_ref()),
        args: join_quoted(rest),
    })
}

/// Joins every run of tokens from one starting with `"` to one ending with `"` into a single
/// argument without the quotes. `\"` is a literal quote and never opens or closes a run.
/// A run still open at the end is kept as it is, minus the opening quote.
pub fn join_quoted<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut pending: Option<Vec<String>> = None;

    for token in tokens {
        let token = token.as_ref();
        let opens = token.starts_with('"');
        let closes = token.ends_with('"') && !token.ends_with("\\\"");
        let text = token.replace("\\\"", "\"");

        match pending.as_mut() {
            None if opens && closes && text.len() >= 2 => out.push(text[1..text.len() - 1].to_string()),
            None if opens => pending = Some(vec![text[1..].to_string()]),
            None => out.push(text),
            Some(run) if closes => {
                run.push(text[..text.len() - 1].to_string());
                out.push(run.join(" "));
                pending = None;
            }
            Some(run) => run.push(text),
        }
    }

    if let Some(run) = pending {
        out.push(run.join(" "));
    }
    out
}
