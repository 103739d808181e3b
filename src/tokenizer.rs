// defines the behavior needed for tokenizing a corpus line into a sentence


pub trait Tokenizer {
    fn tokenize(&self, line: &str) -> Vec<String>;
}

/// Lower-cases a line, drops everything that is not an ascii letter or whitespace,
/// and returns the remaining letter runs in order.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlphaTokenizer;

impl Tokenizer for AlphaTokenizer {

    fn tokenize(&self, line: &str) -> Vec<String> {

        // characters outside [a-z\s] are deleted, not replaced, so "don't" becomes "dont".
        // after the deletion only letters and whitespace remain, thus word boundaries
        // are exactly the whitespace runs.
        let cleaned: String = line
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
            .collect();

        cleaned.split_whitespace().map(|x| x.to_string()).collect()
    }
}
