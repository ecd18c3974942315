use {
    crate::error::{HarnessError, Result},
    clap::Parser,
    regex::Regex,
    std::{path::PathBuf, time::Duration},
};

/// Configuration built from command line options
#[derive(Clone, Debug, Parser)]
#[command(
    name = "sat-harness",
    version,
    about = "Run a solver on every instance of every group in parallel"
)]
pub struct Config {
    /// solver executable, invoked as `<solver> <instance file>`
    pub solver: PathBuf,
    /// directory holding one subdirectory per group
    #[arg(long = "root", short = 'r', default_value = "wufs/wuf-N")]
    pub root: PathBuf,
    /// the number of jobs in parallel
    #[arg(long = "jobs", short = 'j', default_value_t = 4)]
    pub num_jobs: usize,
    /// length of the file name suffix stripped to make an instance name
    #[arg(long = "suffix-len", default_value_t = 6)]
    pub suffix_len: usize,
    /// directories whose name matches this regex are not groups
    #[arg(long = "exclude", default_value = r"\.")]
    pub exclude: String,
    /// suffix of the per-group solution file
    #[arg(long = "output-suffix", default_value = "-opt.dat")]
    pub output_suffix: String,
    /// where solution files go (the root if omitted)
    #[arg(long = "out", short = 'o')]
    pub out_dir: Option<PathBuf>,
    /// per-invocation time out in seconds; unbounded if omitted
    #[arg(long = "timeout", short = 'T')]
    pub timeout: Option<f64>,
    /// verbose logging
    #[arg(long, short)]
    pub verbose: bool,
    /// emit log lines as JSON
    #[arg(long)]
    pub json: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            solver: PathBuf::from("./target/release/sat-solver"),
            root: PathBuf::from("wufs/wuf-N"),
            num_jobs: 4,
            suffix_len: 6,
            exclude: String::from(r"\."),
            output_suffix: String::from("-opt.dat"),
            out_dir: None,
            timeout: None,
            verbose: false,
            json: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.num_jobs == 0 {
            return Err(HarnessError::Config("jobs must be at least 1".to_string()));
        }
        if self.output_suffix.is_empty() {
            return Err(HarnessError::Config("empty output suffix".to_string()));
        }
        self.timeout()?;
        self.exclude_regex()?;
        Ok(())
    }

    pub fn exclude_regex(&self) -> Result<Regex> {
        Regex::new(&self.exclude)
            .map_err(|e| HarnessError::Config(format!("bad exclude pattern: {e}")))
    }

    pub fn timeout(&self) -> Result<Option<Duration>> {
        match self.timeout {
            None => Ok(None),
            Some(t) if t > 0.0 => Duration::try_from_secs_f64(t)
                .map(Some)
                .map_err(|e| HarnessError::Config(format!("bad timeout {t}: {e}"))),
            Some(t) => Err(HarnessError::Config(format!("bad timeout {t}"))),
        }
    }

    pub fn out_dir(&self) -> PathBuf {
        self.out_dir.clone().unwrap_or_else(|| self.root.clone())
    }
}
