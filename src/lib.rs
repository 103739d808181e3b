mod config;
mod cooccurrence;
mod error;
mod pipeline;
mod pmi;
mod query;
mod similarity;
mod tokenizer;

pub use config::{files_handling, Args, Config, Params};
pub use cooccurrence::{Counts, Row};
pub use error::{PmiError, Result};
pub use pipeline::Pipeline;
pub use pmi::{Pmi, PmiRow, Score};
pub use query::{parse_pairs, rank, PairRecord, WordPair};
pub use similarity::Similarity;
pub use tokenizer::{AlphaTokenizer, Tokenizer};
