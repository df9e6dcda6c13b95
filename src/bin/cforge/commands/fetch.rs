use anyhow::{Context, Result};

use cid_forge::{Collector, Dataset, Outcome, parse_identifiers};

use crate::cli::FetchArgs;
use crate::config::{Settings, build_fetcher, build_toolkit, toolkit_label};
use crate::display::{Context as DisplayContext, Progress, print_batch_summary, print_records};
use crate::io::{OutputSpec, resolve_output, stdout_is_tty};
use crate::util::text::count;

pub fn run_fetch(args: FetchArgs, settings: &Settings, ctx: DisplayContext) -> Result<()> {
    let output = resolve_output(&args.export, stdout_is_tty())?;
    let cids = parse_identifiers(&args.cids.join(","));

    let collector = Collector::new(
        build_fetcher(settings, &args.pubchem)?,
        build_toolkit(settings, &args.toolkit),
    );

    let total_steps = if output == OutputSpec::None { 1 } else { 2 };
    let mut progress = Progress::new(ctx.interactive, total_steps);

    progress.step("Fetching compounds");
    let mut dataset = Dataset::new();
    let mut done = 0;
    let result = collector.submit_with(&mut dataset, &cids, |cid, _| {
        done += 1;
        progress.update(&format!("CID {cid} ({done}/{})", cids.len()));
    });
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            progress.abandon();
            return Err(e).context("Fetching compounds failed");
        }
    };

    let mut substeps: Vec<String> = report
        .outcomes()
        .iter()
        .map(|(cid, outcome)| match outcome {
            Outcome::Added(n) => format!("CID {cid}: {}", count(*n, "record")),
            Outcome::NoMolecules => format!("CID {cid}: no valid molecule"),
            Outcome::FetchFailed(_) => format!("CID {cid}: fetch failed"),
        })
        .collect();
    substeps.push(toolkit_label(settings, &args.toolkit));
    progress.complete_step("Fetching compounds", &substeps);

    if ctx.show_tables() {
        print_records(dataset.iter());
        if report.failed().next().is_some() {
            print_batch_summary(&report);
        }
    }

    if output != OutputSpec::None {
        progress.step("Writing output");
        super::write_output(&dataset, &output)?;
        progress.complete_step("Writing output", &[output.describe()]);
    }

    progress.finish(&format!(
        "Collected {} from {}",
        count(report.added(), "record"),
        count(report.attempted(), "CID")
    ));
    Ok(())
}
