use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Per-run trace file: one bare line per title, tab indented detail lines
/// underneath, a count summary at the end. Written once, never read back by
/// the crawler; the caller flushes at title boundaries so an aborted run
/// still leaves a complete trace of everything finalized.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    file: BufWriter<File>,
}

impl RunLog {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = BufWriter::new(File::create(&path)?);
        Ok(Self { path, file })
    }

    /// Free standing note, e.g. which cache file the run resumed from.
    pub fn note<T: Display>(&mut self, message: T) -> io::Result<()> {
        writeln!(self.file, "{}", message)
    }

    /// Start of one title's trace.
    pub fn title(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.file, "{}", title)
    }

    /// Detail line for the current title.
    pub fn detail<T: Display>(&mut self, message: T) -> io::Result<()> {
        writeln!(self.file, "\t{}", message)
    }

    pub fn summary(&mut self, processed: usize, empty: usize, skipped: usize) -> io::Result<()> {
        writeln!(self.file, "Processed: {}", processed)?;
        writeln!(self.file, "Empty: {}", empty)?;
        writeln!(self.file, "Skipped: {}", skipped)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
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
    fn writes_the_trace_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        let mut log = RunLog::create(&path).unwrap();
        log.note("Cache: wikivoyage_en.cache").unwrap();
        log.title("Lisbon").unwrap();
        log.detail("120 words").unwrap();
        log.detail("3 paragraphs").unwrap();
        log.title("Atlantis").unwrap();
        log.detail("missing page").unwrap();
        log.summary(1, 1, 0).unwrap();
        log.flush().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let expected = "Cache: wikivoyage_en.cache\n\
                        Lisbon\n\t120 words\n\t3 paragraphs\n\
                        Atlantis\n\tmissing page\n\
                        Processed: 1\nEmpty: 1\nSkipped: 0\n";
        assert_eq!(content, expected);
    }
}
