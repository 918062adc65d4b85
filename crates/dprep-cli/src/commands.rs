use anyhow::{Context, Result};
use tracing::info_span;

use dprep_cli::pipeline::{
    CleanRun, ConfigOverrides, RawReport, RunOptions, RunOutcome, report_raw, resolve_config,
    run_clean, run_pipeline,
};
use dprep_model::PipelineConfig;

use crate::cli::{CleanArgs, ConfigArgs, RunArgs};

fn effective_config(args: &ConfigArgs, overrides: ConfigOverrides) -> Result<PipelineConfig> {
    resolve_config(
        args.config.as_deref(),
        &ConfigOverrides {
            input: args.input.clone(),
            output_dir: args.output_dir.clone(),
            ..overrides
        },
    )
}

pub fn run_full(args: &RunArgs) -> Result<RunOutcome> {
    let config = effective_config(
        &args.config,
        ConfigOverrides {
            scaler: args.scaler.map(Into::into),
            ..ConfigOverrides::default()
        },
    )?;
    let span = info_span!("run", input = %config.paths.raw_data.display());
    let _guard = span.enter();
    run_pipeline(
        &config,
        RunOptions {
            dry_run: args.dry_run,
            fail_on_validation: !args.no_fail_on_validation,
        },
    )
}

pub fn run_clean_only(args: &CleanArgs) -> Result<CleanRun> {
    let config = effective_config(&args.config, ConfigOverrides::default())?;
    let span = info_span!("clean", input = %config.paths.raw_data.display());
    let _guard = span.enter();
    run_clean(&config, args.dry_run)
}

pub fn run_report(args: &ConfigArgs) -> Result<RawReport> {
    let config = effective_config(args, ConfigOverrides::default())?;
    let span = info_span!("report", input = %config.paths.raw_data.display());
    let _guard = span.enter();
    report_raw(&config)
}

pub fn run_config(args: &ConfigArgs) -> Result<()> {
    let config = effective_config(args, ConfigOverrides::default())?;
    let rendered = config.to_toml_string().context("render configuration")?;
    print!("{rendered}");
    Ok(())
}
