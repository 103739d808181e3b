use crate::pmi::{Pmi, PmiRow, Score};
use crate::query::PairRecord;

// a word's profile is its forward PMI row followed by its inverted PMI row,
// so a forward key and an inverted key with the same spelling are different dimensions.
pub struct Similarity<'a> {
    pmi: Pmi<'a>,
}

impl<'a> Similarity<'a> {

    pub fn new(pmi: Pmi<'a>) -> Similarity<'a> {
        Self { pmi }
    }

    pub fn pmi(&self) -> &Pmi<'a> {
        &self.pmi
    }

    fn dot_rows(a: Option<&PmiRow>, b: Option<&PmiRow>) -> f64 {

        // only dimensions present in both rows contribute. rows are ordered maps, so the
        // shared keys are visited in the same order whichever row drives the loop.
        let (a, b) = match (a, b) {
            (Some(a), Some(b)) => if a.len() <= b.len() { (a, b) } else { (b, a) },
            _ => return 0.0
        };

        a.iter()
            .filter_map(|(k, x)| b.get(k).map(|y| x * y))
            .sum()
    }

    fn squared_norm(row: Option<&PmiRow>) -> f64 {
        row.map(|row| row.values().map(|x| x * x).sum::<f64>()).unwrap_or(0.0)
    }

    fn norm(&self, word: &str) -> f64 {
        let forward = Similarity::squared_norm(self.pmi.forward_row(word));
        let inverted = Similarity::squared_norm(self.pmi.inverted_row(word));
        (forward + inverted).sqrt()
    }

    pub fn cosine(&self, word: &str, context: &str) -> Score {

        let counts = self.pmi.counts();
        if !counts.contains(word) || !counts.contains(context) {
            return Score::Undefined
        }

        let dot = Similarity::dot_rows(self.pmi.forward_row(word), self.pmi.forward_row(context))
            + Similarity::dot_rows(self.pmi.inverted_row(word), self.pmi.inverted_row(context));
        if dot == 0.0 {
            return Score::Value(0.0)
        }

        let norms = self.norm(word) * self.norm(context);
        if norms == 0.0 {
            return Score::Value(0.0)
        }

        Score::Value(dot / norms)
    }

    pub fn pair(&self, word: &str, context: &str) -> PairRecord {

        let counts = self.pmi.counts();
        let pair_count = counts.count(word, context);

        // unknown words leave PMI undefined, known words that never met get 0
        let pmi = if !counts.contains(word) || !counts.contains(context) {
            Score::Undefined
        } else if pair_count == 0 {
            Score::Value(0.0)
        } else {
            self.pmi.pmi(word, context)
        };

        PairRecord {
            word: word.to_owned(),
            context: context.to_owned(),
            word_count: counts.forward_mass(word),
            context_count: counts.inverted_mass(context),
            pair_count,
            pmi,
            cosine: self.cosine(word, context),
        }
    }
}
