// imports
use crate::error::{PmiError, Result};
use crate::pmi::Score;
use crate::similarity::Similarity;

use std::fmt::Display;
use std::path::Path;
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordPair {
    pub word: String,
    pub context: String,
}

/// `word_count` is the forward mass of `word`, `context_count` the inverted mass of `context`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    pub word: String,
    pub context: String,
    pub word_count: u64,
    pub context_count: u64,
    pub pair_count: u64,
    pub pmi: Score,
    pub cosine: Score,
}

impl Display for PairRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}\t{}\t{}\t{}\t{}\t{}\t{:.5}",
            self.cosine, self.word, self.context, self.word_count, self.context_count, self.pair_count, self.pmi)
    }
}

pub fn parse_pairs<I, S>(source: &Path, lines: I) -> Result<Vec<WordPair>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{

    // one whitespace separated pair per line, words are kept verbatim.
    // blank lines are skipped, a line with a single word is an error.
    let mut pairs = Vec::new();
    for (i, line) in lines.into_iter().enumerate() {

        let words: Vec<&str> = line.as_ref().split_whitespace().collect();
        match words.len() {
            0 => continue,
            1 => return Err(PmiError::Format {
                path: source.to_path_buf(),
                line: i + 1,
                message: format!("expected a word pair, found only '{}'", words[0]),
            }),
            2 => {},
            n => warn!("{} line {}: ignoring {} words after the pair", source.display(), i + 1, n - 2),
        }

        pairs.push(WordPair { word: words[0].to_owned(), context: words[1].to_owned() });
    }

    Ok(pairs)
}

/// Scores every pair and orders the records by descending cosine.
/// Equal cosines keep their input order, undefined cosines come last.
pub fn rank(similarity: &Similarity, pairs: &[WordPair]) -> Vec<PairRecord> {

    let mut records: Vec<PairRecord> = pairs
        .iter()
        .map(|pair| similarity.pair(&pair.word, &pair.context))
        .collect();

    records.sort_by(|a, b| b.cosine.total_cmp(&a.cosine));
    records
}
