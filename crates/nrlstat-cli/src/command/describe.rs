use std::path::PathBuf;

use anyhow::Context as _;
use nrlstat_analysis::{
    dataset::Dataset,
    group::{GroupOrder, GroupStatistics},
    record::Metric,
};

use crate::{
    command::InputArg,
    report::text::write_group_table,
    util::{Output, TracingReporter},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DescribeArg {
    #[clap(flatten)]
    input: InputArg,
    /// Metric to summarize: nrl, pdr or delay
    #[arg(long, default_value = "nrl")]
    metric: Metric,
    /// Row order: protocol, mean or mean-desc
    #[arg(long, default_value = "protocol")]
    sort: GroupOrder,
    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Output file path for JSON (stdout when omitted)
    #[arg(long, requires = "json")]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let config = arg.input.load_config()?;
    let pattern = config.validate().context("Invalid configuration")?;
    let mut reporter = TracingReporter;
    let dataset = Dataset::assemble(&config.input_directory, &pattern, &mut reporter)
        .inspect_err(|err| tracing::error!("Hint: {}", err.remedy()))
        .with_context(|| {
            format!(
                "Failed to load results from {}",
                config.input_directory.display()
            )
        })?;

    let groups = describe(&dataset, arg.metric, arg.sort, &mut reporter);
    if arg.json {
        Output::save_json(&groups, arg.output.clone())?;
        return Ok(());
    }

    println!("{} by protocol ({} runs)", arg.metric.description(), dataset.len());
    let mut table = String::new();
    write_group_table(&mut table, &groups).context("Failed to format table")?;
    print!("{table}");
    if !dataset.is_complete() {
        println!("  ({} file(s) skipped)", dataset.skipped().len());
    }
    Ok(())
}

fn describe(
    dataset: &Dataset,
    metric: Metric,
    order: GroupOrder,
    reporter: &mut TracingReporter,
) -> Vec<GroupStatistics> {
    let mut groups = GroupStatistics::compute(dataset, metric, reporter);
    order.sort(&mut groups);
    groups
}
