//! Run a SAT solver on grouped benchmark instances in parallel
//! Usage: sat-harness [OPTIONS] <SOLVER>
//! # Examples:
//! - sat-harness ./target/release/sat-solver          # groups under wufs/wuf-N
//! - sat-harness -r wufs/wuf-Q -j 8 minisat-wrapper    # 8 jobs on another root
//! - sat-harness -T 60 --suffix-len 4 ./solver         # `.cnf` files, 60s limit
use {
    anyhow::Context,
    clap::Parser,
    sat_harness::{
        Config, VERSION, benchmark,
        telemetry::init_tracing,
        utils::{report_header, report_row},
    },
    tracing::Level,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(
        config.json,
        if config.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        },
    );
    println!("{}", report_header(VERSION, config.num_jobs, config.timeout));
    let result = benchmark(&config)
        .await
        .with_context(|| format!("benchmark on {} failed", config.root.display()))?;
    println!("{:<14}{:>6},{:>10},{:>10}", "group,", "num", "avg", "max");
    for (group, summary) in &result.summaries {
        println!(
            "{}",
            report_row(group, summary.num_instances(), summary.avg, summary.max)
        );
    }
    println!("# total: {:.3}s", result.elapsed.as_secs_f64());
    Ok(())
}
