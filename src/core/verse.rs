//! Verse record and canonical book table
//!
//! A verse is identified by its reference string, which must always equal
//! `"{book} {chapter}:{verse}"`.

use serde::{Deserialize, Serialize};

/// The 66 canonical book names, in canon order.
pub const BOOKS: [&str; 66] = [
    // Old Testament
    "Genesis",
    "Exodus",
    "Leviticus",
    "Numbers",
    "Deuteronomy",
    "Joshua",
    "Judges",
    "Ruth",
    "1 Samuel",
    "2 Samuel",
    "1 Kings",
    "2 Kings",
    "1 Chronicles",
    "2 Chronicles",
    "Ezra",
    "Nehemiah",
    "Esther",
    "Job",
    "Psalms",
    "Proverbs",
    "Ecclesiastes",
    "Song of Solomon",
    "Isaiah",
    "Jeremiah",
    "Lamentations",
    "Ezekiel",
    "Daniel",
    "Hosea",
    "Joel",
    "Amos",
    "Obadiah",
    "Jonah",
    "Micah",
    "Nahum",
    "Habakkuk",
    "Zephaniah",
    "Haggai",
    "Zechariah",
    "Malachi",
    // New Testament
    "Matthew",
    "Mark",
    "Luke",
    "John",
    "Acts",
    "Romans",
    "1 Corinthians",
    "2 Corinthians",
    "Galatians",
    "Ephesians",
    "Philippians",
    "Colossians",
    "1 Thessalonians",
    "2 Thessalonians",
    "1 Timothy",
    "2 Timothy",
    "Titus",
    "Philemon",
    "Hebrews",
    "James",
    "1 Peter",
    "2 Peter",
    "1 John",
    "2 John",
    "3 John",
    "Jude",
    "Revelation",
];

/// Position of a book in canon order, matched case-insensitively.
pub fn book_position(book: &str) -> Option<usize> {
    BOOKS.iter().position(|b| b.eq_ignore_ascii_case(book))
}

/// Canonical reference string for a verse location.
pub fn format_reference(book: &str, chapter: u32, verse: u32) -> String {
    format!("{} {}:{}", book, chapter, verse)
}

/// One addressable unit of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
    pub reference: String,
}

impl Verse {
    /// Build a verse with its reference derived from the location.
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32, text: impl Into<String>) -> Self {
        let book = book.into();
        let reference = format_reference(&book, chapter, verse);
        Self {
            book,
            chapter,
            verse,
            text: text.into(),
            reference,
        }
    }

    /// Check the record invariants. Returns a description of the first violation.
    pub fn check(&self) -> Result<(), String> {
        if book_position(&self.book).is_none() {
            return Err(format!("unknown book '{}'", self.book));
        }
        if self.chapter == 0 || self.verse == 0 {
            return Err(format!(
                "chapter and verse must be positive in '{}'",
                self.reference
            ));
        }
        let expected = format_reference(&self.book, self.chapter, self.verse);
        if self.reference != expected {
            return Err(format!(
                "reference '{}' does not match location '{}'",
                self.reference, expected
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_reference() {
        let verse = Verse::new("Romans", 3, 23, "For all have sinned");
        assert_eq!(verse.reference, "Romans 3:23");
        assert!(verse.check().is_ok());
    }

    #[test]
    fn test_check_rejects_mismatched_reference() {
        let mut verse = Verse::new("Romans", 3, 23, "For all have sinned");
        verse.reference = "Romans 3:24".to_string();
        assert!(verse.check().is_err());
    }

    #[test]
    fn test_check_rejects_unknown_book_and_zero_verse() {
        assert!(Verse::new("Hezekiah", 1, 1, "x").check().is_err());
        assert!(Verse::new("John", 3, 0, "x").check().is_err());
    }

    #[test]
    fn test_book_position() {
        assert_eq!(BOOKS.len(), 66);
        assert_eq!(book_position("genesis"), Some(0));
        assert_eq!(book_position("Song of Solomon"), Some(21));
        assert_eq!(book_position("REVELATION"), Some(65));
        assert_eq!(book_position("Maccabees"), None);
    }
}
