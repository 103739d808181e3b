pub mod files_handling;

use crate::cooccurrence::Counts;
use crate::error::{PmiError, Result};

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, fs::File, io::BufReader, path::PathBuf};


/// Command line of the binary. Every flag overrides the matching key of the json config.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pmi_cosine", about = "PMI based cosine similarity of word pairs")]
pub struct Args {
    /// Path to a json file with the run parameters
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Directory of plain text corpus files, one sentence per line
    #[arg(long)]
    pub corpus_dir: Option<PathBuf>,
    /// File of word pairs, one whitespace separated pair per line
    #[arg(long)]
    pub pairs_file: Option<PathBuf>,
    /// Window size, 2 counts adjacent words only
    #[arg(long)]
    pub window_size: Option<usize>,
    /// Number of threads counting corpus files
    #[arg(long)]
    pub num_threads: Option<usize>,
    /// Directory for the saved counts and ranked pairs
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Load counts saved in output_dir instead of counting the corpus
    #[arg(long)]
    pub saved_counts: bool,
}

/// Keys of the json config, all optional so the command line can fill them in.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonTypes {
    corpus_dir: Option<PathBuf>,
    pairs_file: Option<PathBuf>,
    window_size: Option<usize>,
    num_threads: Option<usize>,
    output_dir: Option<PathBuf>,
    saved_counts: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Params {
    pub corpus_dir: PathBuf,
    pub pairs_file: PathBuf,
    pub window_size: usize,
    pub num_threads: usize,
    pub output_dir: Option<PathBuf>,
    pub saved_counts: Option<bool>,
}

impl Params {

    pub const DEFAULT_WINDOW_SIZE: usize = 2;
    pub const DEFAULT_NUM_THREADS: usize = 1;

    pub fn new(corpus_dir: impl Into<PathBuf>, pairs_file: impl Into<PathBuf>, window_size: usize) -> Params {
        Params {
            corpus_dir: corpus_dir.into(),
            pairs_file: pairs_file.into(),
            window_size,
            num_threads: Params::DEFAULT_NUM_THREADS,
            output_dir: None,
            saved_counts: None,
        }
    }

    pub fn use_saved_counts(&self) -> bool {
        self.saved_counts.unwrap_or(false)
    }

    pub fn validate(&self) -> Result<()> {
        Counts::check_window(self.window_size)?;
        if self.num_threads == 0 {
            return Err(PmiError::Config("num_threads must be at least 1".to_string()));
        }
        if self.use_saved_counts() && self.output_dir.is_none() {
            return Err(PmiError::Config("saved_counts needs an output_dir to load from".to_string()));
        }
        Ok(())
    }
}

impl Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using params:
        corpus_dir: {}
        pairs_file: {}
        window_size: {}
        num_threads: {}
        output_dir: {:?}
        saved_counts: {:?}",
        self.corpus_dir.display(), self.pairs_file.display(), self.window_size, self.num_threads, self.output_dir, self.saved_counts)
    }
}

pub struct Config {
    params: Params
}

impl Config {

    pub fn get_params(&self) -> Params {
        return self.params.clone()
    }

    fn read_json(path: &PathBuf) -> Result<JsonTypes> {
        let f = File::open(path).map_err(|e| PmiError::io(path, e))?;
        let json: JsonTypes = serde_json::from_reader(BufReader::new(f))?;
        Ok(json)
    }

    pub fn new(args: &Args) -> Result<Config> {

        // start from the json file if given, then let the command line override it.
        // defaults fill whatever neither of them sets.
        let json = match &args.config {
            Some(path) => Config::read_json(path)?,
            None => JsonTypes::default(),
        };

        let corpus_dir = args.corpus_dir.clone().or(json.corpus_dir)
            .ok_or_else(|| PmiError::Config("corpus_dir was not supplied".to_string()))?;
        let pairs_file = args.pairs_file.clone().or(json.pairs_file)
            .ok_or_else(|| PmiError::Config("pairs_file was not supplied".to_string()))?;

        let params = Params {
            corpus_dir,
            pairs_file,
            window_size: args.window_size.or(json.window_size).unwrap_or(Params::DEFAULT_WINDOW_SIZE),
            num_threads: args.num_threads.or(json.num_threads).unwrap_or(Params::DEFAULT_NUM_THREADS),
            output_dir: args.output_dir.clone().or(json.output_dir),
            saved_counts: if args.saved_counts { Some(true) } else { json.saved_counts },
        };

        params.validate()?;
        Ok(Self { params })
    }
}
