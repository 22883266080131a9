//! Small KJV sample shared by the unit tests

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::store::CorpusStore;
use crate::core::verse::Verse;

pub(crate) fn sample_verses() -> Vec<Verse> {
    [
        ("Genesis", 1, 1, "In the beginning God created the heaven and the earth."),
        ("Psalms", 23, 1, "The LORD is my shepherd; I shall not want."),
        ("Proverbs", 3, 9, "Honour the LORD with thy substance, and with the firstfruits of all thine increase:"),
        ("Ecclesiastes", 5, 10, "He that loveth silver shall not be satisfied with silver; nor he that loveth abundance with increase: this is also vanity."),
        ("Matthew", 6, 19, "Lay not up for yourselves treasures upon earth, where moth and rust doth corrupt, and where thieves break through and steal:"),
        ("Matthew", 6, 20, "But lay up for yourselves treasures in heaven, where neither moth nor rust doth corrupt, and where thieves do not break through nor steal:"),
        ("Matthew", 6, 21, "For where your treasure is, there will your heart be also."),
        ("Matthew", 6, 24, "No man can serve two masters: for either he will hate the one, and love the other; or else he will hold to the one, and despise the other. Ye cannot serve God and mammon."),
        ("John", 3, 16, "For God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life."),
        ("Romans", 3, 23, "For all have sinned, and come short of the glory of God;"),
        ("Romans", 5, 8, "But God commendeth his love toward us, in that, while we were yet sinners, Christ died for us."),
        ("Romans", 6, 23, "For the wages of sin is death; but the gift of God is eternal life through Jesus Christ our Lord."),
        ("Romans", 10, 9, "That if thou shalt confess with thy mouth the Lord Jesus, and shalt believe in thine heart that God hath raised him from the dead, thou shalt be saved."),
        ("Philippians", 4, 6, "Be careful for nothing; but in every thing by prayer and supplication with thanksgiving let your requests be made known unto God."),
        ("1 Timothy", 6, 10, "For the love of money is the root of all evil: which while some coveted after, they have erred from the faith, and pierced themselves through with many sorrows."),
        ("Hebrews", 11, 1, "Now faith is the substance of things hoped for, the evidence of things not seen."),
        ("1 John", 1, 9, "If we confess our sins, he is faithful and just to forgive us our sins, and to cleanse us from all unrighteousness."),
    ]
    .into_iter()
    .map(|(book, chapter, verse, text)| Verse::new(book, chapter, verse, text))
    .collect()
}

pub(crate) fn sample_store() -> CorpusStore {
    CorpusStore::from_verses(sample_verses()).expect("sample corpus is valid")
}

/// Write the sample as `data/bible-verses.json` under `root`
pub(crate) fn write_sample_corpus(root: &Path) -> Result<PathBuf> {
    let dir = root.join("data");
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("bible-verses.json");
    std::fs::write(&path, serde_json::to_string_pretty(&sample_verses())?)?;
    Ok(path)
}
