use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use fnv::FnvHashSet;
use log::debug;

/// Durable set of titles that have already been attempted, successfully or
/// as a definitive empty outcome.
///
/// Plain newline delimited file, loaded fully at startup, appended to and
/// flushed after every finalized title, never rewritten or compacted. A
/// title present here is never fetched again by a later run of the same
/// edition. Single writer; concurrent runs over one edition are the
/// operator's problem, not handled here.
#[derive(Debug)]
pub struct CrawlCache {
    path: PathBuf,
    seen: FnvHashSet<String>,
    file: File,
}

impl CrawlCache {
    /// Open the cache for an edition, creating the file when absent.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut seen = FnvHashSet::default();
        if path.exists() {
            for line in BufReader::new(File::open(&path)?).lines() {
                let title = line?;
                let title = title.trim();
                if !title.is_empty() {
                    seen.insert(title.to_string());
                }
            }
            debug!("loaded {} cached titles from {:?}", seen.len(), path);
        }
        let file = OpenOptions::new().append(true).create(true).open(&path)?;
        Ok(Self { path, seen, file })
    }

    pub fn contains(&self, title: &str) -> bool {
        self.seen.contains(title)
    }

    /// Record a finalized title. Flushed immediately so an interrupted run
    /// resumes behind a consistent boundary. Inserting a known title is a
    /// no-op, the file never holds duplicates.
    pub fn insert(&mut self, title: &str) -> io::Result<()> {
        if self.seen.insert(title.to_string()) {
            writeln!(self.file, "{}", title)?;
            self.file.flush()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wikivoyage_en.cache");

        let mut cache = CrawlCache::open(&path).unwrap();
        assert!(cache.is_empty());
        cache.insert("Lisbon").unwrap();
        cache.insert("Porto").unwrap();
        drop(cache);

        let cache = CrawlCache::open(&path).unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.contains("Lisbon"));
        assert!(cache.contains("Porto"));
        assert!(!cache.contains("Faro"));
    }

    #[test]
    fn reinsertion_is_not_duplicated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wikivoyage_en.cache");

        let mut cache = CrawlCache::open(&path).unwrap();
        cache.insert("Lisbon").unwrap();
        cache.insert("Lisbon").unwrap();
        drop(cache);

        assert_eq!(fs::read_to_string(&path).unwrap(), "Lisbon\n");
    }

    #[test]
    fn appends_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wikivoyage_en.cache");

        let mut cache = CrawlCache::open(&path).unwrap();
        cache.insert("Lisbon").unwrap();
        drop(cache);

        let mut cache = CrawlCache::open(&path).unwrap();
        cache.insert("Porto").unwrap();
        drop(cache);

        assert_eq!(fs::read_to_string(&path).unwrap(), "Lisbon\nPorto\n");
    }
}
