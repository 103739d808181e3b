// imports
use crate::error::{PmiError, Result};
use crate::tokenizer::Tokenizer;

use std::cmp::min;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use log::{debug, info};
use rayon::{prelude::*, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

pub type Row = HashMap<String, u64>;

// forward[w][c] counts how often c followed w inside the window,
// inverted[c][w] holds the same number seen from the context side.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    forward: HashMap<String, Row>,
    inverted: HashMap<String, Row>,
    vocab: HashSet<String>,
    token_count: u64,
}

impl Counts {

    pub fn new() -> Counts {
        Counts::default()
    }

    pub fn check_window(window_size: usize) -> Result<()> {
        if window_size < 2 {
            return Err(PmiError::Config(format!("window size {} is not valid, must be at least 2", window_size)));
        }
        Ok(())
    }

    fn increment(&mut self, word: &str, context: &str, by: u64) {
        *self.forward.entry(word.to_owned()).or_default().entry(context.to_owned()).or_insert(0) += by;
        *self.inverted.entry(context.to_owned()).or_default().entry(word.to_owned()).or_insert(0) += by;
    }

    pub fn accumulate(&mut self, sentence: &[String], window_size: usize) {

        // counts are made one-sided, looking only forward from the pivot token.
        // a window of size k pairs the pivot with the next k - 1 tokens of the same sentence.
        // any window at least as long as the sentence pairs every token with all its followers.
        let n = sentence.len();
        for i in 0..n {

            let tok = &sentence[i];
            self.token_count += 1;
            if !self.vocab.contains(tok) {
                self.vocab.insert(tok.to_owned());
            }

            for j in i + 1..min(i.saturating_add(window_size), n) {
                self.increment(tok, &sentence[j], 1);
            }
        }
    }

    fn load_into<T: Tokenizer + ?Sized>(&mut self, file_path: &Path, tokenizer: &T, window_size: usize) -> Result<()> {

        // every line is an independent sentence. lines are read as bytes and decoded lossily,
        // the tokenizer keeps ascii letters only so nothing of value is lost on bad utf-8.
        let f = File::open(file_path).map_err(|e| PmiError::io(file_path, e))?;
        let mut reader = BufReader::new(f);
        let mut buf: Vec<u8> = Vec::new();
        let mut n_lines = 0usize;

        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf).map_err(|e| PmiError::io(file_path, e))?;
            if read == 0 { break }

            let line = String::from_utf8_lossy(&buf);
            let sentence = tokenizer.tokenize(&line);
            self.accumulate(&sentence, window_size);
            n_lines += 1;
        }

        debug!("counted {} lines of {}", n_lines, file_path.display());
        Ok(())
    }

    pub fn load<T: Tokenizer + ?Sized>(file_path: &Path, tokenizer: &T, window_size: usize) -> Result<Counts> {
        Counts::check_window(window_size)?;
        let mut counts = Counts::new();
        counts.load_into(file_path, tokenizer, window_size)?;
        Ok(counts)
    }

    pub fn merge(&mut self, other: Counts) {

        self.token_count += other.token_count;
        self.vocab.extend(other.vocab);

        for (word, row) in other.forward {
            let mine = self.forward.entry(word).or_default();
            for (context, v) in row {
                *mine.entry(context).or_insert(0) += v;
            }
        }

        for (context, row) in other.inverted {
            let mine = self.inverted.entry(context).or_default();
            for (word, v) in row {
                *mine.entry(word).or_insert(0) += v;
            }
        }
    }

    pub fn run<T: Tokenizer + Sync + ?Sized>(files: &[PathBuf], tokenizer: &T, window_size: usize, num_threads: usize) -> Result<Counts> {

        // runs the cooccurrences counting over all corpus files.
        // with a single thread the files are streamed one after the other into one matrix.
        // otherwise each worker counts whole files into a private matrix, and the partial
        // matrices are summed once all workers are done. nothing reads the result before the merge.
        Counts::check_window(window_size)?;

        let counts = if num_threads <= 1 {

            let mut counts = Counts::new();
            for file_path in files {
                counts.load_into(file_path, tokenizer, window_size)?;
            }
            counts

        } else {

            let pool = ThreadPoolBuilder::new().num_threads(num_threads).build()?;
            let partials: Vec<Counts> = pool.install(|| {
                files
                    .par_iter()
                    .map(|file_path| Counts::load(file_path, tokenizer, window_size))
                    .collect::<Result<Vec<Counts>>>()
            })?;

            let mut counts = Counts::new();
            for partial in partials {
                counts.merge(partial);
            }
            counts
        };

        info!("counted {} files, {} tokens, {} types, {} cells",
            files.len(), counts.token_count, counts.type_count(), counts.n_cells());
        Ok(counts)
    }

    pub fn count(&self, word: &str, context: &str) -> u64 {
        self.forward
            .get(word)
            .and_then(|row| row.get(context))
            .copied()
            .unwrap_or(0)
    }

    pub fn forward_row(&self, word: &str) -> Option<&Row> {
        self.forward.get(word)
    }

    pub fn inverted_row(&self, context: &str) -> Option<&Row> {
        self.inverted.get(context)
    }

    pub fn forward_mass(&self, word: &str) -> u64 {
        self.forward_row(word).map(|row| row.values().sum()).unwrap_or(0)
    }

    pub fn inverted_mass(&self, context: &str) -> u64 {
        self.inverted_row(context).map(|row| row.values().sum()).unwrap_or(0)
    }

    pub fn forward(&self) -> &HashMap<String, Row> {
        &self.forward
    }

    pub fn inverted(&self) -> &HashMap<String, Row> {
        &self.inverted
    }

    pub fn contains(&self, word: &str) -> bool {
        self.vocab.contains(word)
    }

    pub fn token_count(&self) -> u64 {
        self.token_count
    }

    pub fn type_count(&self) -> usize {
        self.vocab.len()
    }

    pub fn n_cells(&self) -> usize {
        self.forward.values().map(|row| row.len()).sum()
    }

    pub fn n_increments(&self) -> u64 {
        self.forward.values().flat_map(|row| row.values()).sum()
    }
}


#[cfg(test)]
mod tests {

    use std::collections::HashMap;
    use std::io::Write;
    use std::path::PathBuf;
    use super::Counts;
    use crate::error::PmiError;
    use crate::tokenizer::{AlphaTokenizer, Tokenizer};

    const KITTY: &str = "the kitty cat meows really loud";

    fn counts_of(lines: &[&str], window_size: usize) -> Counts {
        let mut counts = Counts::new();
        for line in lines {
            counts.accumulate(&AlphaTokenizer.tokenize(line), window_size);
        }
        counts
    }

    fn flat_forward(counts: &Counts) -> HashMap<(String, String), u64> {
        let mut flat = HashMap::new();
        for (w, row) in counts.forward() {
            for (c, v) in row {
                flat.insert((w.to_owned(), c.to_owned()), *v);
            }
        }
        flat
    }

    fn golden(pairs: &[(&str, &str)]) -> HashMap<(String, String), u64> {
        pairs.iter().map(|(w, c)| ((w.to_string(), c.to_string()), 1)).collect()
    }

    #[test]
    fn bigrams_with_window_two() {

        let counts = counts_of(&[KITTY], 2);
        let expected = golden(&[
            ("the", "kitty"), ("kitty", "cat"), ("cat", "meows"), ("meows", "really"), ("really", "loud")
        ]);

        assert_eq!(flat_forward(&counts), expected);
        assert_eq!(counts.token_count(), 6);
        assert_eq!(counts.type_count(), 6);
        // last token has no neighbor but is still part of the vocabulary
        assert!(counts.contains("loud"));
        assert!(counts.forward_row("loud").is_none());
    }

    #[test]
    fn window_six_covers_five_followers() {

        let counts = counts_of(&[KITTY], 6);
        let expected = golden(&[
            ("the", "kitty"), ("the", "cat"), ("the", "meows"), ("the", "really"), ("the", "loud"),
            ("kitty", "cat"), ("kitty", "meows"), ("kitty", "really"), ("kitty", "loud"),
            ("cat", "meows"), ("cat", "really"), ("cat", "loud"),
            ("meows", "really"), ("meows", "loud"),
            ("really", "loud"),
        ]);

        assert_eq!(flat_forward(&counts), expected);
        assert_eq!(counts.n_cells(), 15);
    }

    #[test]
    fn huge_window_pairs_whole_sentence() {

        // every token pairs with all of its followers, n(n-1)/2 increments
        let sentence = AlphaTokenizer.tokenize(KITTY);
        let n = sentence.len() as u64;
        let mut counts = Counts::new();
        counts.accumulate(&sentence, usize::MAX);

        assert_eq!(counts.n_increments(), n * (n - 1) / 2);
        assert_eq!(counts, counts_of(&[KITTY], sentence.len()));
        assert_eq!(counts.count("kitty", "loud"), 1);
    }

    #[test]
    fn direction_is_kept() {

        let counts = counts_of(&["door lock", "lock door", "door lock"], 2);
        assert_eq!(counts.count("door", "lock"), 2);
        assert_eq!(counts.count("lock", "door"), 1);
        assert_eq!(counts.forward_mass("door"), 2);
        assert_eq!(counts.inverted_mass("door"), 1);
    }

    #[test]
    fn sentences_do_not_leak() {

        let counts = counts_of(&["a b", "c d"], 5);
        assert_eq!(counts.count("b", "c"), 0);
        assert_eq!(counts.count("a", "c"), 0);
        assert_eq!(counts.count("a", "b"), 1);
        assert_eq!(counts.count("c", "d"), 1);
        assert_eq!(counts.n_cells(), 2);
    }

    #[test]
    fn number_of_increments_per_sentence() {

        let sentence: Vec<String> = (0..9).map(|i| format!("w{}", (b'a' + i) as char)).collect();
        let n = sentence.len();

        for k in 2..12 {
            let mut counts = Counts::new();
            counts.accumulate(&sentence, k);
            let expected: usize = (0..n).map(|i| (k - 1).min(n - 1 - i)).sum();
            assert_eq!(counts.n_increments(), expected as u64, "window {}", k);
        }
    }

    #[test]
    fn forward_mirrors_inverted() {

        let counts = counts_of(&[KITTY, "the cat and the kitty", "a cat is a cat"], 4);
        for (w, row) in counts.forward() {
            for (c, v) in row {
                assert_eq!(counts.inverted_row(c).unwrap().get(w), Some(v));
            }
        }
        let n_inverted: usize = counts.inverted().values().map(|row| row.len()).sum();
        assert_eq!(n_inverted, counts.n_cells());
    }

    #[test]
    fn empty_lines_count_nothing() {

        let counts = counts_of(&["", "  42 !!", KITTY], 2);
        assert_eq!(counts.token_count(), 6);
    }

    #[test]
    fn merge_matches_single_pass() {

        let lines = [KITTY, "the cat and the kitty", "door lock", "lock door"];
        let whole = counts_of(&lines, 3);

        let mut left = counts_of(&lines[..2], 3);
        let right = counts_of(&lines[2..], 3);
        left.merge(right);

        assert_eq!(left, whole);
    }

    #[test]
    fn small_windows_are_rejected() {

        for window_size in [0, 1] {
            match Counts::run(&[], &AlphaTokenizer, window_size, 1) {
                Err(PmiError::Config(_)) => {},
                other => panic!("expected config error, got {:?}", other),
            }
        }
    }

    #[test]
    fn missing_file_names_the_path() {

        let path = PathBuf::from("/definitely/not/here.txt");
        match Counts::load(&path, &AlphaTokenizer, 2) {
            Err(PmiError::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn parallel_run_equals_sequential_run() {

        let dir = tempfile::tempdir().unwrap();
        let texts = [
            "The kitty cat meows really loud.\nThe dog barks.\n",
            "A cat and a dog.\n\nKitty, kitty!\n",
            "door lock\nlock door\n",
        ];

        let mut files = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            let path = dir.path().join(format!("{}.txt", i));
            let mut f = std::fs::File::create(&path).unwrap();
            f.write_all(text.as_bytes()).unwrap();
            files.push(path);
        }

        let sequential = Counts::run(&files, &AlphaTokenizer, 3, 1).unwrap();
        let parallel = Counts::run(&files, &AlphaTokenizer, 3, 3).unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(sequential.count("kitty", "kitty"), 1);
        assert_eq!(sequential.count("the", "kitty"), 1);
    }
}
