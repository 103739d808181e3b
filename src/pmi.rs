use crate::cooccurrence::Counts;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use log::info;
use serde::{Deserialize, Serialize};

// ordered by key so that sums over a row are reproducible
pub type PmiRow = BTreeMap<String, f64>;

/// A real valued result that may be undefined for lack of data.
/// Serializes as a number or `null`, printing shows `Undefined` as -9999.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Value(f64),
    Undefined,
}

impl Score {

    pub const SENTINEL: f64 = -9999.0;

    pub fn value(self) -> Option<f64> {
        match self {
            Score::Value(v) => Some(v),
            Score::Undefined => None,
        }
    }

    pub fn or_sentinel(self) -> f64 {
        self.value().unwrap_or(Score::SENTINEL)
    }

    // Undefined ranks below every value
    pub fn total_cmp(&self, other: &Score) -> Ordering {
        match (self, other) {
            (Score::Value(a), Score::Value(b)) => a.total_cmp(b),
            (Score::Value(_), Score::Undefined) => Ordering::Greater,
            (Score::Undefined, Score::Value(_)) => Ordering::Less,
            (Score::Undefined, Score::Undefined) => Ordering::Equal,
        }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = self.or_sentinel();
        match f.precision() {
            Some(p) => write!(f, "{:.*}", p, v),
            None => write!(f, "{}", v),
        }
    }
}


/// PMI weighted view of a finished co-occurrence matrix, read-only once built.
pub struct Pmi<'a> {
    counts: &'a Counts,
    forward: HashMap<String, PmiRow>,
    inverted: HashMap<String, PmiRow>,
}

impl<'a> Pmi<'a> {

    pub fn new(counts: &'a Counts) -> Pmi<'a> {

        // PMI(w,c) = log2( P(w,c) / (P(w) * P(c)) ), all probabilities over the token count.
        // P(w) is the mass of the forward row of w (w as left member),
        // P(c) is the mass of the inverted row of c (c as right member).
        let n = counts.token_count() as f64;

        let inverted_mass: HashMap<&str, f64> = counts
            .inverted()
            .iter()
            .map(|(c, row)| (c.as_str(), row.values().sum::<u64>() as f64))
            .collect();

        let mut forward: HashMap<String, PmiRow> = HashMap::with_capacity(counts.forward().len());
        let mut inverted: HashMap<String, PmiRow> = HashMap::with_capacity(counts.inverted().len());

        for (w, row) in counts.forward() {

            let p_w = row.values().sum::<u64>() as f64 / n;

            for (c, x) in row {

                // a populated cell has x >= 1, so both marginals are at least x and positive
                let p_c = inverted_mass.get(c.as_str()).copied().unwrap_or(*x as f64) / n;
                let p_wc = *x as f64 / n;
                let pmi = (p_wc / (p_w * p_c)).log2();

                forward.entry(w.to_owned()).or_default().insert(c.to_owned(), pmi);
                inverted.entry(c.to_owned()).or_default().insert(w.to_owned(), pmi);
            }
        }

        let pmi = Self { counts, forward, inverted };
        info!("derived {} pmi cells over {} tokens", pmi.n_cells(), counts.token_count());
        pmi
    }

    pub fn counts(&self) -> &'a Counts {
        self.counts
    }

    /// Raw cell lookup: `Undefined` when the cell is not populated.
    /// Pair records report 0 instead when both words are known, see `Similarity::pair`.
    pub fn pmi(&self, word: &str, context: &str) -> Score {
        match self.forward.get(word).and_then(|row| row.get(context)) {
            Some(v) => Score::Value(*v),
            None => Score::Undefined,
        }
    }

    pub fn forward_row(&self, word: &str) -> Option<&PmiRow> {
        self.forward.get(word)
    }

    pub fn inverted_row(&self, context: &str) -> Option<&PmiRow> {
        self.inverted.get(context)
    }

    pub fn n_cells(&self) -> usize {
        self.forward.values().map(|row| row.len()).sum()
    }
}
