// imports
use crate::cooccurrence::Counts;
use crate::error::{PmiError, Result};
use crate::query::{self, PairRecord, WordPair};

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use serde::{Deserialize, Serialize};


pub fn list_corpus(corpus_dir: &Path) -> Result<Vec<PathBuf>> {

    // plain files only, sorted by path. sub directories and hidden files are skipped

    let entries = fs::read_dir(corpus_dir).map_err(|e| PmiError::io(corpus_dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| PmiError::io(corpus_dir, e))?.path();
        let hidden = path.file_name().and_then(|n| n.to_str()).map_or(false, |n| n.starts_with('.'));
        if path.is_file() && !hidden {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

pub fn read_pairs(file_path: &Path) -> Result<Vec<WordPair>> {
    let text = fs::read_to_string(file_path).map_err(|e| PmiError::io(file_path, e))?;
    query::parse_pairs(file_path, text.lines())
}


pub fn read_input<R: ReadFile>(file_path: &Path) -> Result<R> {
    R::read_file(file_path)
}

pub fn save_output<S: SaveFile + ?Sized>(output_dir: &Path, file_name: &str, item: &S) -> Result<PathBuf> {

    // create output folder
    fs::create_dir_all(output_dir).map_err(|e| PmiError::io(output_dir, e))?;
    item.save_file(output_dir, file_name)
}

pub trait ReadFile: Sized {
    fn read_file(file_path: &Path) -> Result<Self>;
}

pub trait SaveFile {
    const EXTENSION: &'static str;
    fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf>;
}

fn output_path(output_dir: &Path, file_name: &str, extension: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", file_name, extension))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedCounts {
    pub window_size: usize,
    pub counts: Counts,
}

impl SavedCounts {
    pub fn path(output_dir: &Path, file_name: &str) -> PathBuf {
        output_path(output_dir, file_name, SavedCounts::EXTENSION)
    }
}

impl SaveFile for SavedCounts {
    const EXTENSION: &'static str = "bin.gz";

    fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {

        // bincode encoded and gzipped
        let out = output_path(output_dir, file_name, Self::EXTENSION);
        let f = BufWriter::new(File::create(&out).map_err(|e| PmiError::io(&out, e))?);
        let mut writer = GzEncoder::new(f, Compression::default());
        bincode::serialize_into(&mut writer, self)?;
        writer.finish().and_then(|mut f| f.flush()).map_err(|e| PmiError::io(&out, e))?;
        Ok(out)
    }
}

impl ReadFile for SavedCounts {
    fn read_file(file_path: &Path) -> Result<Self> {
        let f = BufReader::new(File::open(file_path).map_err(|e| PmiError::io(file_path, e))?);
        let reader = GzDecoder::new(f);
        let item = bincode::deserialize_from(reader)?;
        Ok(item)
    }
}

impl SaveFile for [PairRecord] {
    const EXTENSION: &'static str = "json";

    fn save_file(&self, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
        let out = output_path(output_dir, file_name, Self::EXTENSION);
        let mut f = BufWriter::new(File::create(&out).map_err(|e| PmiError::io(&out, e))?);
        serde_json::to_writer_pretty(&mut f, self)?;
        f.flush().map_err(|e| PmiError::io(&out, e))?;
        Ok(out)
    }
}

impl ReadFile for Vec<PairRecord> {
    fn read_file(file_path: &Path) -> Result<Self> {
        let f = BufReader::new(File::open(file_path).map_err(|e| PmiError::io(file_path, e))?);
        let item = serde_json::from_reader(f)?;
        Ok(item)
    }
}


#[cfg(test)]
mod tests {

    use std::fs;
    use super::{list_corpus, read_input, read_pairs, save_output, SavedCounts};
    use crate::cooccurrence::Counts;
    use crate::error::PmiError;
    use crate::pmi::Score;
    use crate::query::PairRecord;
    use crate::tokenizer::{AlphaTokenizer, Tokenizer};

    #[test]
    fn lists_visible_files_in_order() {

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join(".hidden"), "h").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let files = list_corpus(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| p.file_name().unwrap().to_string_lossy().to_string()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn missing_pairs_file_is_io_error() {

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        assert!(matches!(read_pairs(&path), Err(PmiError::Io { .. })));
    }

    #[test]
    fn counts_survive_save_and_load() {

        let mut counts = Counts::new();
        for line in ["the kitty cat meows really loud", "the cat sat", "alone"] {
            counts.accumulate(&AlphaTokenizer.tokenize(line), 3);
        }
        let saved = SavedCounts { window_size: 3, counts };

        let dir = tempfile::tempdir().unwrap();
        let out = save_output(dir.path(), "cooc", &saved).unwrap();
        assert_eq!(out, SavedCounts::path(dir.path(), "cooc"));

        let loaded: SavedCounts = read_input(&out).unwrap();
        assert_eq!(loaded, saved);
    }

    #[test]
    fn records_survive_save_and_load() {

        let records = vec![
            PairRecord {
                word: "kitty".to_string(),
                context: "cat".to_string(),
                word_count: 2,
                context_count: 3,
                pair_count: 1,
                pmi: Score::Value(1.5),
                cosine: Score::Value(0.25),
            },
            PairRecord {
                word: "ghost".to_string(),
                context: "cat".to_string(),
                word_count: 0,
                context_count: 3,
                pair_count: 0,
                pmi: Score::Undefined,
                cosine: Score::Undefined,
            },
        ];

        let dir = tempfile::tempdir().unwrap();
        let out = save_output(dir.path(), "pairs", records.as_slice()).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("null"));

        let loaded: Vec<PairRecord> = read_input(&out).unwrap();
        assert_eq!(loaded, records);
    }
}
