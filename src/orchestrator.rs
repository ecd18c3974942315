//! Find groups and instances under a root, run the solver on each of them
//! through a [`TaskPool`], and collect the answers in a [`ResultStore`].

use {
    crate::{
        aggregate::{FileSink, GroupSummary, summarize, write_solutions},
        config::Config,
        error::{HarnessError, Result},
        invoker::Invoker,
        pool::TaskPool,
        store::ResultStore,
    },
    regex::Regex,
    std::{
        collections::{BTreeMap, HashMap},
        fs,
        path::{Path, PathBuf},
        sync::Arc,
        time::{Duration, Instant},
    },
    tracing::{info, warn},
};

/// One input file to run the solver on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instance {
    pub group: String,
    pub name: String,
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub instances: Vec<Instance>,
}

/// List the groups under `root`, in name order.
///
/// A group is a subdirectory whose name does not match `exclude`; its
/// regular files are instances, named by their file name minus the last
/// `suffix_len` characters.
pub fn discover(root: &Path, exclude: &Regex, suffix_len: usize) -> Result<Vec<Group>> {
    let mut groups = Vec::new();
    for entry in sorted_entries(root)? {
        let name = utf8_name(&entry)?;
        if exclude.is_match(&name) {
            continue;
        }
        if !entry.path().is_dir() {
            warn!(path = %entry.path().display(), "skip a non-directory entry");
            continue;
        }
        let instances = discover_instances(&name, &entry.path(), suffix_len)?;
        groups.push(Group { name, instances });
    }
    Ok(groups)
}

fn discover_instances(group: &str, dir: &Path, suffix_len: usize) -> Result<Vec<Instance>> {
    let mut instances: Vec<Instance> = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    for entry in sorted_entries(dir)? {
        let path = entry.path();
        if !path.is_file() {
            warn!(path = %path.display(), "skip a non-file entry");
            continue;
        }
        let file_name = utf8_name(&entry)?;
        let len = file_name.chars().count();
        if len <= suffix_len {
            return Err(HarnessError::InstanceName { path, suffix_len });
        }
        let name: String = file_name.chars().take(len - suffix_len).collect();
        if let Some(first) = seen.insert(name.clone(), path.clone()) {
            return Err(HarnessError::DiscoveryAmbiguity {
                group: group.to_string(),
                instance: name,
                first,
                second: path,
            });
        }
        instances.push(Instance {
            group: group.to_string(),
            name,
            path,
        });
    }
    Ok(instances)
}

fn utf8_name(entry: &fs::DirEntry) -> Result<String> {
    entry
        .file_name()
        .into_string()
        .map_err(|_| HarnessError::NonUtf8Name { path: entry.path() })
}

fn sorted_entries(dir: &Path) -> Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| HarnessError::io(dir, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| HarnessError::io(dir, e))?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

pub struct Orchestrator {
    root: PathBuf,
    num_jobs: usize,
    suffix_len: usize,
    exclude: Regex,
    invoker: Arc<Invoker>,
}

impl Orchestrator {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Orchestrator {
            root: config.root.clone(),
            num_jobs: config.num_jobs,
            suffix_len: config.suffix_len,
            exclude: config.exclude_regex()?,
            invoker: Arc::new(Invoker::new(&config.solver).with_timeout(config.timeout()?)),
        })
    }

    /// Run every instance and return the filled store with the wall-clock
    /// time of the whole run.
    pub async fn run(&self) -> Result<(ResultStore, Duration)> {
        let start = Instant::now();
        let groups = discover(&self.root, &self.exclude, self.suffix_len)?;
        let mut store = ResultStore::new();
        let mut jobs = Vec::new();
        for group in &groups {
            store.reserve_group(&group.name);
            for instance in &group.instances {
                jobs.push((store.reserve(&group.name, &instance.name), instance.path.clone()));
            }
        }
        info!(
            root = %self.root.display(),
            groups = store.num_groups(),
            instances = store.num_slots(),
            jobs = self.num_jobs,
            solver = %self.invoker.executable().display(),
            "start"
        );
        let pool = TaskPool::new(self.num_jobs)?;
        for (slot, path) in jobs {
            let invoker = Arc::clone(&self.invoker);
            let submitted = pool.submit(async move {
                let result = invoker.invoke(&path).await?;
                slot.write(result)
            });
            if submitted.is_err() {
                // a task has failed already; join_all reports it
                break;
            }
        }
        let completed = pool.join_all().await?;
        let elapsed = start.elapsed();
        info!(completed, elapsed = elapsed.as_secs_f64(), "finish");
        Ok((store, elapsed))
    }
}

/// The outcome of [`benchmark`].
#[derive(Clone, Debug)]
pub struct Benchmark {
    pub summaries: BTreeMap<String, GroupSummary>,
    pub written: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// Run, summarize and write one solution file per group.
pub async fn benchmark(config: &Config) -> Result<Benchmark> {
    let (store, elapsed) = Orchestrator::new(config)?.run().await?;
    let summaries = summarize(&store.snapshot())?;
    let mut sink = FileSink::new(config.out_dir(), config.output_suffix.as_str());
    write_solutions(&summaries, &mut sink)?;
    Ok(Benchmark {
        summaries,
        written: sink.written().to_vec(),
        elapsed,
    })
}
