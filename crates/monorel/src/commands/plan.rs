use std::path::Path;

use monorel_core::{OverrideMap, PackageRelease};
use serde::Serialize;

use crate::error::Result;
use crate::summary;

use super::{PlanArgs, compute};

#[derive(Serialize)]
struct PlanReport<'a> {
    releases: &'a [PackageRelease],
    overrides: &'a OverrideMap,
    interrupted: bool,
}

pub(crate) fn run(start_path: &Path, args: &PlanArgs) -> Result<()> {
    let pipeline = compute(start_path, args.from.as_deref(), args.yes)?;
    let outcome = &pipeline.outcome;

    if args.json {
        let report = PlanReport {
            releases: &outcome.releases,
            overrides: &outcome.overrides,
            interrupted: outcome.interrupted,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", summary::render_plan(&outcome.releases));
    if !outcome.releases.is_empty() {
        println!();
        print!("{}", summary::render_pr_summary(&outcome.releases));
    }
    if outcome.interrupted {
        println!();
        println!("Run interrupted; the plan above covers the packages answered so far.");
    }
    Ok(())
}
