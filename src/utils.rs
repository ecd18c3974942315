use {
    chrono::{DateTime, Local},
    std::process::Command,
};

pub fn current_date_time() -> DateTime<Local> {
    Local::now()
}

/// `hostname -s`, if it can be run.
pub fn host_name() -> Option<String> {
    let out = Command::new("hostname").arg("-s").output().ok()?;
    if !out.status.success() {
        return None;
    }
    let h = String::from_utf8_lossy(&out.stdout).trim_end().to_string();
    (!h.is_empty()).then_some(h)
}

/// `# <version>, jobs:<n> on <host> @ <time>`
pub fn report_header(version: &str, num_jobs: usize, timeout: Option<f64>) -> String {
    let host = host_name().unwrap_or_else(|| "???".to_string());
    let timeout = match timeout {
        Some(t) => format!(", timeout:{t}"),
        None => String::new(),
    };
    format!(
        "# {}, jobs:{}{} on {} @ {}",
        version,
        num_jobs,
        timeout,
        host,
        current_date_time().format("%FT%H:%M:%S")
    )
}

/// A CSV row in the shape of the header `group, instances, avg, max`.
pub fn report_row(group: &str, instances: usize, avg: f64, max: f64) -> String {
    format!(
        "{:<14}{:>6},{:>10.3},{:>10.3}",
        format!("\"{}\",", group),
        instances,
        avg,
        max
    )
}
