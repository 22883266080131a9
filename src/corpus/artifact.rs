//! Precomputed embedding artifact
//!
//! Bincode file holding a header and the row-major embedding slab for the
//! whole corpus. The header pins the embedder, dimension, verse count and a
//! CRC32 of the corpus so a stale artifact is detected instead of silently
//! misaligning rows.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::core::verse::Verse;
use crate::search::embedder::Embedder;

pub const ARTIFACT_MAGIC: [u8; 4] = *b"RREB";
pub const ARTIFACT_VERSION: u16 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to access embedding artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode embedding artifact: {0}")]
    Decode(#[from] bincode::Error),

    #[error("embedding artifact does not match corpus: {0}")]
    Mismatch(String),
}

/// Embeddings aligned with corpus positions: row `i` belongs to verse `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingTable {
    dimension: usize,
    data: Vec<f32>,
}

impl EmbeddingTable {
    /// Embed every verse text, in parallel, preserving order.
    pub fn compute(embedder: &dyn Embedder, verses: &[Verse]) -> Self {
        let dimension = embedder.dimension();
        let rows: Vec<Vec<f32>> = verses.par_iter().map(|v| embedder.embed(&v.text)).collect();

        let mut data = Vec::with_capacity(rows.len() * dimension);
        for row in rows {
            data.extend_from_slice(&row);
        }
        Self { dimension, data }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, index: usize) -> &[f32] {
        &self.data[index * self.dimension..(index + 1) * self.dimension]
    }

    pub fn rows(&self) -> impl IndexedParallelIterator<Item = &[f32]> + '_ {
        self.data.par_chunks(self.dimension.max(1))
    }
}

/// CRC32 over every reference and text, in corpus order
pub fn corpus_checksum(verses: &[Verse]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    for verse in verses {
        hasher.update(verse.reference.as_bytes());
        hasher.update(b"\t");
        hasher.update(verse.text.as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize()
}

#[derive(Serialize, Deserialize)]
struct ArtifactFile {
    magic: [u8; 4],
    version: u16,
    embedder: String,
    dimension: u32,
    count: u32,
    checksum: u32,
    data: Vec<f32>,
}

/// Write the table for `verses` to `path`, creating parent directories.
pub fn write_artifact(
    path: &Path,
    table: &EmbeddingTable,
    embedder: &dyn Embedder,
    verses: &[Verse],
) -> Result<(), ArtifactError> {
    if table.len() != verses.len() {
        return Err(ArtifactError::Mismatch(format!(
            "table has {} rows for {} verses",
            table.len(),
            verses.len()
        )));
    }

    let dimension = header_field("dimension", table.dimension())?;
    let count = header_field("verse count", verses.len())?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = ArtifactFile {
        magic: ARTIFACT_MAGIC,
        version: ARTIFACT_VERSION,
        embedder: embedder.name().to_string(),
        dimension,
        count,
        checksum: corpus_checksum(verses),
        data: table.data.clone(),
    };

    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, &file)?;
    writer.flush()?;

    tracing::info!(path = %path.display(), rows = table.len(), "embedding artifact written");
    Ok(())
}

fn header_field(name: &str, value: usize) -> Result<u32, ArtifactError> {
    u32::try_from(value).map_err(|_| {
        ArtifactError::Mismatch(format!("{} {} does not fit the artifact header", name, value))
    })
}

/// Read an artifact and verify it belongs to `verses` and `embedder`.
pub fn read_artifact(
    path: &Path,
    embedder: &dyn Embedder,
    verses: &[Verse],
) -> Result<EmbeddingTable, ArtifactError> {
    // Decode from memory: the slice reader bounds-checks length prefixes
    let bytes = std::fs::read(path)?;
    let file: ArtifactFile = bincode::deserialize(&bytes)?;

    if file.magic != ARTIFACT_MAGIC {
        return Err(ArtifactError::Mismatch("bad magic".to_string()));
    }
    if file.version != ARTIFACT_VERSION {
        return Err(ArtifactError::Mismatch(format!(
            "version {} (expected {})",
            file.version, ARTIFACT_VERSION
        )));
    }
    if file.embedder != embedder.name() {
        return Err(ArtifactError::Mismatch(format!(
            "embedder '{}' (expected '{}')",
            file.embedder,
            embedder.name()
        )));
    }
    if file.dimension as usize != embedder.dimension() {
        return Err(ArtifactError::Mismatch(format!(
            "dimension {} (expected {})",
            file.dimension,
            embedder.dimension()
        )));
    }
    if file.count as usize != verses.len() {
        return Err(ArtifactError::Mismatch(format!(
            "{} rows for {} verses",
            file.count,
            verses.len()
        )));
    }
    if file.checksum != corpus_checksum(verses) {
        return Err(ArtifactError::Mismatch("corpus checksum differs".to_string()));
    }
    if file.data.len() != file.count as usize * file.dimension as usize {
        return Err(ArtifactError::Mismatch("truncated vector slab".to_string()));
    }

    Ok(EmbeddingTable {
        dimension: file.dimension as usize,
        data: file.data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::fixtures::sample_verses;
    use crate::search::embedder::{HashEmbedder, EMBEDDING_DIM};
    use anyhow::Result;
    use tempfile::TempDir;

    #[test]
    fn test_compute_is_aligned() {
        let embedder = HashEmbedder::new();
        let verses = sample_verses();
        let table = EmbeddingTable::compute(&embedder, &verses);

        assert_eq!(table.len(), verses.len());
        assert_eq!(table.dimension(), EMBEDDING_DIM);
        for (i, verse) in verses.iter().enumerate() {
            assert_eq!(table.row(i), embedder.embed(&verse.text).as_slice());
        }
        assert_eq!(table.rows().count(), verses.len());
    }

    #[test]
    fn test_write_then_read() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("data/embeddings.bin");
        let embedder = HashEmbedder::new();
        let verses = sample_verses();
        let table = EmbeddingTable::compute(&embedder, &verses);

        write_artifact(&path, &table, &embedder, &verses)?;
        let loaded = read_artifact(&path, &embedder, &verses)?;
        assert_eq!(loaded, table);
        Ok(())
    }

    #[test]
    fn test_read_detects_stale_corpus() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("embeddings.bin");
        let embedder = HashEmbedder::new();
        let verses = sample_verses();
        let table = EmbeddingTable::compute(&embedder, &verses);
        write_artifact(&path, &table, &embedder, &verses)?;

        let mut edited = verses.clone();
        edited[0].text.push_str(" Amen.");
        assert!(matches!(
            read_artifact(&path, &embedder, &edited),
            Err(ArtifactError::Mismatch(_))
        ));

        let shorter = &verses[..verses.len() - 1];
        assert!(matches!(
            read_artifact(&path, &embedder, shorter),
            Err(ArtifactError::Mismatch(_))
        ));
        Ok(())
    }

    #[test]
    fn test_read_corrupt_and_missing() -> Result<()> {
        let dir = TempDir::new()?;
        let embedder = HashEmbedder::new();
        let verses = sample_verses();

        let missing = dir.path().join("missing.bin");
        assert!(matches!(
            read_artifact(&missing, &embedder, &verses),
            Err(ArtifactError::Io(_))
        ));

        let corrupt = dir.path().join("corrupt.bin");
        std::fs::write(&corrupt, b"RREB\x01")?;
        assert!(read_artifact(&corrupt, &embedder, &verses).is_err());
        Ok(())
    }

    #[test]
    fn test_header_field_overflow() {
        assert_eq!(header_field("dimension", 384).ok(), Some(384));
        assert_eq!(header_field("verse count", u32::MAX as usize).ok(), Some(u32::MAX));

        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            header_field("verse count", u32::MAX as usize + 1),
            Err(ArtifactError::Mismatch(_))
        ));
    }

    #[test]
    fn test_checksum_depends_on_order() {
        let verses = sample_verses();
        let mut reversed = verses.clone();
        reversed.reverse();
        assert_ne!(corpus_checksum(&verses), corpus_checksum(&reversed));
        assert_eq!(corpus_checksum(&verses), corpus_checksum(&sample_verses()));
    }
}
