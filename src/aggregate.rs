//! Per-group statistics and solution listings.

use {
    crate::{
        error::{HarnessError, Result},
        store::ResultSnapshot,
    },
    std::{
        collections::BTreeMap,
        fs,
        path::PathBuf,
    },
    tracing::info,
};

#[derive(Clone, Debug, PartialEq)]
pub struct GroupSummary {
    pub avg: f64,
    pub max: f64,
    /// `(instance, solution)` in store order
    pub listing: Vec<(String, String)>,
}

impl GroupSummary {
    pub fn num_instances(&self) -> usize {
        self.listing.len()
    }

    /// One `<instance> <solution>` line per instance.
    pub fn render(&self) -> String {
        let mut block = String::new();
        for (instance, solution) in &self.listing {
            block.push_str(instance);
            block.push(' ');
            block.push_str(solution);
            block.push('\n');
        }
        block
    }
}

/// Fails on a group without instances, or on an instance without a result.
pub fn summarize(snapshot: &ResultSnapshot) -> Result<BTreeMap<String, GroupSummary>> {
    let mut summaries = BTreeMap::new();
    for (group, results) in snapshot.iter() {
        if results.is_empty() {
            return Err(HarnessError::Aggregation {
                group: group.clone(),
                reason: "no instances".to_string(),
            });
        }
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut listing = Vec::with_capacity(results.len());
        for (instance, result) in results {
            let Some(r) = result else {
                return Err(HarnessError::Aggregation {
                    group: group.clone(),
                    reason: format!("no result for {instance}"),
                });
            };
            sum += r.elapsed;
            max = max.max(r.elapsed);
            listing.push((instance.clone(), r.solution.clone()));
        }
        let avg = sum / results.len() as f64;
        summaries.insert(group.clone(), GroupSummary { avg, max, listing });
    }
    Ok(summaries)
}

/// Where a group's rendered listing ends up.
pub trait SolutionSink {
    fn write_group(&mut self, group: &str, block: &str) -> Result<()>;
}

/// Writes `<dir>/<group><suffix>`, replacing what was there.
#[derive(Clone, Debug)]
pub struct FileSink {
    dir: PathBuf,
    suffix: String,
    written: Vec<PathBuf>,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        FileSink {
            dir: dir.into(),
            suffix: suffix.into(),
            written: Vec::new(),
        }
    }

    pub fn path_for(&self, group: &str) -> PathBuf {
        self.dir.join(format!("{group}{}", self.suffix))
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl SolutionSink for FileSink {
    fn write_group(&mut self, group: &str, block: &str) -> Result<()> {
        let path = self.path_for(group);
        fs::write(&path, block).map_err(|e| HarnessError::io(&path, e))?;
        self.written.push(path);
        Ok(())
    }
}

impl SolutionSink for BTreeMap<String, String> {
    fn write_group(&mut self, group: &str, block: &str) -> Result<()> {
        self.insert(group.to_string(), block.to_string());
        Ok(())
    }
}

pub fn write_solutions<S: SolutionSink>(
    summaries: &BTreeMap<String, GroupSummary>,
    sink: &mut S,
) -> Result<()> {
    for (group, summary) in summaries {
        sink.write_group(group, &summary.render())?;
        info!(
            group = %group,
            instances = summary.num_instances(),
            avg = summary.avg,
            max = summary.max,
            "group summarized"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{invoker::InvocationResult, store::ResultStore},
    };

    fn store_of(groups: &[(&str, Vec<(&str, &str, f64)>)]) -> ResultStore {
        let mut store = ResultStore::new();
        for (g, instances) in groups {
            store.reserve_group(g);
            for (i, solution, elapsed) in instances {
                store
                    .reserve(g, i)
                    .write(InvocationResult {
                        solution: solution.to_string(),
                        elapsed: *elapsed,
                    })
                    .unwrap();
            }
        }
        store
    }

    #[test]
    fn test_two_groups() {
        let store = store_of(&[
            ("g1", vec![("a", "1 -2", 1.0), ("b", "-1 2", 3.0)]),
            ("g2", vec![("c", "3", 2.0)]),
        ]);
        let s = summarize(&store.snapshot()).unwrap();
        assert_eq!(s["g1"].avg, 2.0);
        assert_eq!(s["g1"].max, 3.0);
        assert_eq!(s["g2"].avg, 2.0);
        assert_eq!(s["g2"].max, 2.0);
        assert_eq!(s["g1"].render(), "a 1 -2\nb -1 2\n");
    }

    #[test]
    fn test_avg_and_max_match_direct_computation() {
        let times = [0.1, 0.7, 0.3, 12.25, 1e-3, 4.0, 0.3];
        let instances: Vec<(String, f64)> = times
            .iter()
            .enumerate()
            .map(|(i, t)| (format!("i{i}"), *t))
            .collect();
        let rows: Vec<(&str, &str, f64)> = instances
            .iter()
            .map(|(i, t)| (i.as_str(), "s", *t))
            .collect();
        let store = store_of(&[("g", rows)]);
        let summaries = summarize(&store.snapshot()).unwrap();
        let s = &summaries["g"];
        let sum: f64 = instances.iter().map(|(_, t)| t).sum();
        assert_eq!(s.avg, sum / times.len() as f64);
        assert_eq!(s.max, 12.25);
        assert_eq!(s.num_instances(), times.len());
    }

    #[test]
    fn test_empty_group_fails() {
        let store = store_of(&[("g1", vec![("a", "s", 1.0)]), ("empty", vec![])]);
        match summarize(&store.snapshot()) {
            Err(HarnessError::Aggregation { group, .. }) => assert_eq!(group, "empty"),
            r => panic!("unexpected {r:?}"),
        }
    }

    #[test]
    fn test_unwritten_slot_fails() {
        let mut store = ResultStore::new();
        let _ = store.reserve("g", "lost");
        assert!(matches!(
            summarize(&store.snapshot()),
            Err(HarnessError::Aggregation { .. })
        ));
    }

    #[test]
    fn test_write_to_map_sink() {
        let store = store_of(&[("g1", vec![("a", "x", 1.0)]), ("g2", vec![("b", "y", 1.0)])]);
        let summaries = summarize(&store.snapshot()).unwrap();
        let mut sink: BTreeMap<String, String> = BTreeMap::new();
        write_solutions(&summaries, &mut sink).unwrap();
        assert_eq!(sink["g1"], "a x\n");
        assert_eq!(sink["g2"], "b y\n");
    }

    #[test]
    fn test_file_sink_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path(), "-opt.dat");
        let path = sink.path_for("g1");
        assert_eq!(path, dir.path().join("g1-opt.dat"));
        fs::write(&path, "stale line\nanother stale line\nthird\n").unwrap();
        sink.write_group("g1", "a 1 2 3\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a 1 2 3\n");
        assert_eq!(sink.written(), &[path]);
    }
}
