//! Topic Search - curated topic → expanded query text
//!
//! The expansion replaces the literal query; it is not passed as
//! expanded terms.

/// Topic keyword and the query it expands to
pub const TOPICS: &[(&str, &str)] = &[
    ("sin", "sin sinned transgression iniquity wickedness"),
    ("salvation", "saved salvation redemption deliverance rescue"),
    ("faith", "faith believe trust believing"),
    ("grace", "grace mercy favor undeserved gift"),
    ("love", "love loved loving compassion"),
    ("forgiveness", "forgive forgiveness pardon cleanse"),
    ("eternal life", "eternal life everlasting heaven"),
    ("death", "death die perish destruction"),
    ("jesus", "jesus christ lord savior messiah"),
    ("repentance", "repent repentance turn away forsake"),
    ("money", "money wealth riches treasure mammon silver gold"),
    ("prayer", "prayer pray supplication ask seek thanksgiving"),
    ("heaven", "heaven kingdom paradise eternal glory"),
    ("obedience", "obey obedience commandments keep hearken"),
];

/// Expanded query for a topic; unknown topics pass through unchanged.
pub fn expand_topic(topic: &str) -> &str {
    let key = topic.trim().to_lowercase();
    TOPICS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, query)| *query)
        .unwrap_or(topic)
}

/// Known topic names, in table order
pub fn topic_names() -> impl Iterator<Item = &'static str> {
    TOPICS.iter().map(|(name, _)| *name)
}
