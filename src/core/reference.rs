//! Scripture reference parsing
//!
//! Parses strings such as `John 3:16`, `1 Cor 13:4-7` or `Ps 23:1` into a
//! canonical book name plus chapter and verse span.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use super::verse::BOOKS;

/// Abbreviations accepted in addition to the full book names.
/// Keys are lowercase with whitespace removed.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("gen", "Genesis"),
    ("ge", "Genesis"),
    ("exod", "Exodus"),
    ("ex", "Exodus"),
    ("lev", "Leviticus"),
    ("num", "Numbers"),
    ("deut", "Deuteronomy"),
    ("dt", "Deuteronomy"),
    ("josh", "Joshua"),
    ("judg", "Judges"),
    ("1sam", "1 Samuel"),
    ("2sam", "2 Samuel"),
    ("1kgs", "1 Kings"),
    ("2kgs", "2 Kings"),
    ("1chr", "1 Chronicles"),
    ("2chr", "2 Chronicles"),
    ("neh", "Nehemiah"),
    ("esth", "Esther"),
    ("ps", "Psalms"),
    ("psa", "Psalms"),
    ("psalm", "Psalms"),
    ("prov", "Proverbs"),
    ("pr", "Proverbs"),
    ("eccl", "Ecclesiastes"),
    ("ecc", "Ecclesiastes"),
    ("song", "Song of Solomon"),
    ("songs", "Song of Solomon"),
    ("sos", "Song of Solomon"),
    ("isa", "Isaiah"),
    ("jer", "Jeremiah"),
    ("lam", "Lamentations"),
    ("ezek", "Ezekiel"),
    ("eze", "Ezekiel"),
    ("dan", "Daniel"),
    ("hos", "Hosea"),
    ("obad", "Obadiah"),
    ("mic", "Micah"),
    ("nah", "Nahum"),
    ("hab", "Habakkuk"),
    ("zeph", "Zephaniah"),
    ("hag", "Haggai"),
    ("zech", "Zechariah"),
    ("zec", "Zechariah"),
    ("mal", "Malachi"),
    ("matt", "Matthew"),
    ("mt", "Matthew"),
    ("mk", "Mark"),
    ("lk", "Luke"),
    ("jn", "John"),
    ("rom", "Romans"),
    ("1cor", "1 Corinthians"),
    ("2cor", "2 Corinthians"),
    ("gal", "Galatians"),
    ("eph", "Ephesians"),
    ("phil", "Philippians"),
    ("php", "Philippians"),
    ("col", "Colossians"),
    ("1thess", "1 Thessalonians"),
    ("2thess", "2 Thessalonians"),
    ("1tim", "1 Timothy"),
    ("2tim", "2 Timothy"),
    ("tit", "Titus"),
    ("philem", "Philemon"),
    ("heb", "Hebrews"),
    ("jas", "James"),
    ("1pet", "1 Peter"),
    ("2pet", "2 Peter"),
    ("1jn", "1 John"),
    ("2jn", "2 John"),
    ("3jn", "3 John"),
    ("rev", "Revelation"),
];

lazy_static! {
    static ref BOOK_LOOKUP: HashMap<String, &'static str> = {
        let mut map: HashMap<String, &'static str> = BOOKS
            .iter()
            .map(|book| (lookup_key(book), *book))
            .collect();
        for (abbr, book) in ABBREVIATIONS {
            map.insert((*abbr).to_string(), *book);
        }
        map
    };
    static ref EXACT_RE: Regex =
        Regex::new(r"^(\d?\s?[A-Za-z]+(?:\s+of\s+[A-Za-z]+)?)\.?\s+(\d+):(\d+)(?:\s*-\s*(\d+))?$")
            .unwrap();
    static ref INLINE_RE: Regex =
        Regex::new(r"\b(\d?\s?[A-Za-z]+(?:\s+of\s+[A-Za-z]+)?)\.?\s+(\d+):(\d+)(?:-(\d+))?\b")
            .unwrap();
}

fn lookup_key(book: &str) -> String {
    book.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolve a book name or abbreviation to its canonical name.
pub fn normalize_book(book: &str) -> Option<&'static str> {
    BOOK_LOOKUP.get(&lookup_key(book)).copied()
}

/// A parsed reference: one verse or an inclusive verse span within a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReference {
    pub book: &'static str,
    pub chapter: u32,
    pub start_verse: u32,
    pub end_verse: Option<u32>,
    /// The text the reference was parsed from, trimmed.
    pub text: String,
}

impl ParsedReference {
    /// Last verse of the span (the start verse for single-verse references).
    pub fn last_verse(&self) -> u32 {
        self.end_verse.unwrap_or(self.start_verse).max(self.start_verse)
    }

    /// Canonical reference of the first verse.
    pub fn first_reference(&self) -> String {
        super::verse::format_reference(self.book, self.chapter, self.start_verse)
    }
}

fn from_captures(caps: &regex::Captures<'_>) -> Option<ParsedReference> {
    let book = normalize_book(caps.get(1)?.as_str())?;
    let chapter: u32 = caps.get(2)?.as_str().parse().ok()?;
    let start_verse: u32 = caps.get(3)?.as_str().parse().ok()?;
    let end_verse = match caps.get(4) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };

    Some(ParsedReference {
        book,
        chapter,
        start_verse,
        end_verse,
        text: caps.get(0)?.as_str().trim().to_string(),
    })
}

/// Parse a whole string as one reference.
///
/// # Examples
/// ```
/// use romans_road_rag::core::reference::parse_reference;
/// let parsed = parse_reference("1 Cor 13:4-7").unwrap();
/// assert_eq!(parsed.book, "1 Corinthians");
/// assert_eq!((parsed.chapter, parsed.start_verse, parsed.end_verse), (13, 4, Some(7)));
/// ```
pub fn parse_reference(text: &str) -> Option<ParsedReference> {
    EXACT_RE
        .captures(text.trim())
        .and_then(|caps| from_captures(&caps))
}

/// Find every reference embedded in free text, in order of appearance.
pub fn detect_references(text: &str) -> Vec<ParsedReference> {
    INLINE_RE
        .captures_iter(text)
        .filter_map(|caps| from_captures(&caps))
        .collect()
}
