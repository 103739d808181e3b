// imports
use crate::config::files_handling::{self, SavedCounts};
use crate::config::{Args, Config, Params};
use crate::cooccurrence::Counts;
use crate::error::{PmiError, Result};
use crate::pmi::Pmi;
use crate::query::{self, PairRecord};
use crate::similarity::Similarity;
use crate::tokenizer::AlphaTokenizer;

use std::time::Instant;
use log::{info, warn};

const COUNTS_FILE: &str = "cooc";
const PAIRS_FILE: &str = "pairs";

pub struct Pipeline {}

impl Pipeline {

    // runs the main procedure of 3 steps -
    // -> cooccurrences counting (or loading the saved counts)
    // -> pmi derivation
    // -> scoring and ranking the queried pairs

    pub fn run(args: &Args) -> Result<Vec<PairRecord>> {
        let params = Config::new(args)?.get_params();
        Pipeline::run_with(&params)
    }

    pub fn run_with(params: &Params) -> Result<Vec<PairRecord>> {

        params.validate()?;
        info!("{}", params);

        let timer = Instant::now();
        let counts = Pipeline::counts(params)?;
        info!("finished counting, took {} ms ...", timer.elapsed().as_millis());

        // the pmi matrix only reads the finished counts, the pairs are not involved
        let timer = Instant::now();
        let similarity = Similarity::new(Pmi::new(&counts));
        info!("finished pmi, took {} ms ...", timer.elapsed().as_millis());

        let pairs = files_handling::read_pairs(&params.pairs_file)?;
        let records = query::rank(&similarity, &pairs);
        info!("scored {} pairs", records.len());

        if let Some(output_dir) = &params.output_dir {
            let out = files_handling::save_output(output_dir, PAIRS_FILE, records.as_slice())?;
            info!("saved ranked pairs to {}", out.display());
        }

        Ok(records)
    }

    fn counts(params: &Params) -> Result<Counts> {

        if params.use_saved_counts() {
            return Pipeline::load_counts(params);
        }

        let files = files_handling::list_corpus(&params.corpus_dir)?;
        if files.is_empty() {
            warn!("no corpus files found in {}", params.corpus_dir.display());
        }
        let counts = Counts::run(&files, &AlphaTokenizer, params.window_size, params.num_threads)?;

        match &params.output_dir {
            Some(output_dir) => {
                let saved = SavedCounts { window_size: params.window_size, counts };
                let out = files_handling::save_output(output_dir, COUNTS_FILE, &saved)?;
                info!("saved counts to {}", out.display());
                Ok(saved.counts)
            },
            None => Ok(counts)
        }
    }

    fn load_counts(params: &Params) -> Result<Counts> {

        let output_dir = params.output_dir.as_deref()
            .ok_or_else(|| PmiError::Config("saved_counts needs an output_dir to load from".to_string()))?;
        let path = SavedCounts::path(output_dir, COUNTS_FILE);
        let saved: SavedCounts = files_handling::read_input(&path)?;

        // counts of another window would silently change every score
        if saved.window_size != params.window_size {
            return Err(PmiError::Config(format!(
                "saved counts in {} use window size {}, asked for {}",
                path.display(), saved.window_size, params.window_size)));
        }

        info!("loaded counts from {}: {} tokens, {} types", path.display(), saved.counts.token_count(), saved.counts.type_count());
        Ok(saved.counts)
    }
}
