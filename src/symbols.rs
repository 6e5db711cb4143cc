// Copyright (c) 2026 rezky_nightky

use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKey {
    Tag(String),
    Index(usize),
}

impl From<&str> for SymbolKey {
    fn from(tag: &str) -> Self {
        SymbolKey::Tag(tag.to_string())
    }
}

impl From<usize> for SymbolKey {
    fn from(idx: usize) -> Self {
        SymbolKey::Index(idx)
    }
}

/// Key to handle lookup. A miss is not an error; callers draw nothing.
#[derive(Clone, Debug)]
pub struct SymbolTable<S> {
    entries: HashMap<SymbolKey, S>,
}

impl<S> Default for SymbolTable<S> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<S> SymbolTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<SymbolKey>, symbol: S) {
        self.entries.insert(key.into(), symbol);
    }

    pub fn get(&self, key: &SymbolKey) -> Option<&S> {
        self.entries.get(key)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S> FromIterator<(SymbolKey, S)> for SymbolTable<S> {
    fn from_iter<I: IntoIterator<Item = (SymbolKey, S)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Glyph {
    Char(char),
    Stack(Vec<char>),
}

pub const BUILTIN_SYMBOLS: &[(&str, char)] = &[
    ("x.squareroot", '√'),
    ("sum", '∑'),
    ("percent", '%'),
    ("function", 'ƒ'),
    ("plusminus", '±'),
    ("divide", '÷'),
    ("plus.forwardslash.minus", '∓'),
    ("angle", '∠'),
    ("compass.drawing", '∡'),
    ("pencil.and.outline", '✎'),
    ("triangle", '△'),
    ("infinity", '∞'),
    ("pi", 'π'),
    ("integral", '∫'),
    ("flag.2.crossed", '⚑'),
    ("house", '⌂'),
    ("r.joystick", '◉'),
    ("circle.hexagongrid.circle.fill", '⬢'),
    ("globe.americas", '⊕'),
    ("character.bubble", '❝'),
    ("waveform.path.ecg.rectangle", '∿'),
    ("face.smiling", '☺'),
    ("crown", '♛'),
    ("music.note", '♪'),
    ("star", '★'),
    ("sparkle", '✦'),
    ("heart", '♥'),
    ("snowflake", '❄'),
];

pub const MATH_TAGS: [&str; 11] = [
    "x.squareroot",
    "sum",
    "percent",
    "function",
    "plusminus",
    "divide",
    "plus.forwardslash.minus",
    "angle",
    "compass.drawing",
    "pencil.and.outline",
    "triangle",
];

pub fn builtin_glyph(tag: &str) -> Option<char> {
    BUILTIN_SYMBOLS
        .iter()
        .find(|(t, _)| *t == tag)
        .map(|&(_, ch)| ch)
}

/// Registers every requested tag the built-in list knows. Returns the table
/// and the tags it could not resolve.
pub fn register_tags<'a>(tags: &'a [String]) -> (SymbolTable<Glyph>, Vec<&'a str>) {
    let mut table = SymbolTable::new();
    let mut missing = Vec::new();
    for tag in tags {
        match builtin_glyph(tag) {
            Some(ch) => table.insert(tag.as_str(), Glyph::Char(ch)),
            None => missing.push(tag.as_str()),
        }
    }
    (table, missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_miss_is_none_not_panic() {
        let table: SymbolTable<char> = [(SymbolKey::from("sum"), '∑')].into_iter().collect();
        assert_eq!(table.get(&"sum".into()), Some(&'∑'));
        assert_eq!(table.get(&"nope".into()), None);
        assert_eq!(table.get(&SymbolKey::Index(0)), None);
    }

    #[test]
    fn tags_and_indices_do_not_collide() {
        let mut table = SymbolTable::new();
        table.insert(0usize, 'a');
        table.insert("0", 'b');
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&SymbolKey::Index(0)), Some(&'a'));
    }

    #[test]
    fn register_tags_reports_unknown_names() {
        let tags = vec!["sum".to_string(), "airpodspro".to_string()];
        let (table, missing) = register_tags(&tags);
        assert_eq!(table.get(&"sum".into()), Some(&Glyph::Char('∑')));
        assert_eq!(missing, vec!["airpodspro"]);
    }

    #[test]
    fn every_math_tag_is_builtin() {
        for tag in MATH_TAGS {
            assert!(builtin_glyph(tag).is_some(), "{tag}");
        }
    }
}
