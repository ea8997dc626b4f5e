//! Handlers for the research pipeline commands.

use std::path::Path;

use chrono::Local;
use serde::Serialize;
use tracing::info;

use super::command::PipelineArgs;
use super::output::{self, ProgressReporter};
use super::paths;
use super::session::Session;
use super::summary::{top_rows, Summarize};
use crate::adapter::csv::{read_asins, read_candidates, read_gap_rows, write_report};
use crate::application::bulk_scan::{collect_asins, BulkScanPipeline};
use crate::application::cross_check::CrossCheckPipeline;
use crate::application::export_hunt::{collect_export_rows, ExportHuntPipeline};
use crate::application::gap_search::GapSearchPipeline;
use crate::application::genre_research::GenreResearchPipeline;
use crate::application::keyword_hunt::KeywordHuntPipeline;
use crate::application::selection::SelectionPipeline;
use crate::application::Report;
use crate::error::Result;

/// Print the run summary, then write the report unless it is empty.
fn publish<T: Serialize + Summarize>(
    session: &Session,
    command: &str,
    report: &Report<T>,
    path: &Path,
) -> Result<()> {
    output::run_stats(&report.stats);
    output::rows(command, &report.rows);

    if report.is_empty() {
        output::warning("No items selected");
        return Ok(());
    }

    write_report(path, &report.rows, session.config.output.bom(command))?;

    output::section("Top results");
    output::table(&top_rows(&report.rows, session.config.output.top_rows));
    output::success(&format!(
        "Wrote {} rows to {}",
        report.rows.len(),
        output::highlight(path.display())
    ));
    Ok(())
}

fn announce(command: &str, input: &Path) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Command", command);
    output::field("Input", input.display());
}

/// `sedori select`
pub async fn select(config: Option<&Path>, args: &PipelineArgs) -> Result<()> {
    let session = Session::open(config, args)?;
    let input = args.input.clone().unwrap_or_else(paths::candidates);
    announce("select", &input);

    let candidates = read_candidates(&input)?;
    info!(count = candidates.len(), "Loaded candidates");

    let keepa = session.keepa()?;
    let evaluator = session.evaluator(session.config.selection_criteria(), &session.config.fees);
    let report = SelectionPipeline::new(&keepa, evaluator)
        .run(&candidates, &ProgressReporter::new())
        .await;

    let path = session.report_path(args.output.as_ref(), paths::selected);
    publish(&session, "select", &report, &path)
}

/// `sedori cross-check`
pub async fn cross_check(config: Option<&Path>, args: &PipelineArgs) -> Result<()> {
    let session = Session::open(config, args)?;
    let input = args.input.clone().unwrap_or_else(paths::candidates);
    announce("cross-check", &input);

    let asins = read_asins(&input)?;
    info!(count = asins.len(), "Loaded candidate ASINs");

    let keepa = session.keepa()?;
    let rakuten = session.rakuten();
    let settings = &session.config.cross_check;
    let report = CrossCheckPipeline::new(
        &keepa,
        &rakuten,
        session.config.effective_fees(&settings.fees),
        settings.keyword_max_chars,
    )
    .run(&asins, &ProgressReporter::new())
    .await;

    let path = session.report_path(args.output.as_ref(), paths::cross_checked);
    publish(&session, "cross-check", &report, &path)
}

/// `sedori scan`
pub async fn scan(config: Option<&Path>, args: &PipelineArgs) -> Result<()> {
    let session = Session::open(config, args)?;
    let input = args.input.clone().unwrap_or_else(paths::raw_exports);
    announce("scan", &input);

    let scan_input = collect_asins(&input)?;
    if scan_input.created_dir {
        output::warning(&format!("Created empty input directory {}", input.display()));
        output::hint("drop Keepa bestseller exports (*.csv) into it and run again");
        return Ok(());
    }
    if scan_input.files.is_empty() {
        output::warning(&format!("No CSV files in {}", input.display()));
        return Ok(());
    }
    output::field("Files", scan_input.files.len());
    output::field("ASINs", scan_input.asins.len());

    let keepa = session.keepa()?;
    let evaluator = session.evaluator(session.config.selection_criteria(), &session.config.fees);
    let report = BulkScanPipeline::new(&keepa, evaluator, session.config.keepa.domain)
        .run(&scan_input.asins, &ProgressReporter::new())
        .await;

    let path = session.report_path(args.output.as_ref(), paths::scan_candidates);
    publish(&session, "scan", &report, &path)
}

/// `sedori research`
pub async fn research(config: Option<&Path>, args: &PipelineArgs) -> Result<()> {
    let session = Session::open(config, args)?;
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Command", "research");
    output::field("Genres", session.config.research.genres.len());

    let keepa = session.keepa()?;
    let rakuten = session.rakuten();
    let evaluator = session.evaluator(session.config.research_criteria(), &session.config.fees);
    let report = GenreResearchPipeline::new(
        &keepa,
        &rakuten,
        evaluator,
        session.config.research.keyword_max_chars,
    )
    .run(&session.config.research.genres, &ProgressReporter::new())
    .await;

    let path = session.report_path(args.output.as_ref(), |dir| paths::order_list(dir, Local::now()));
    publish(&session, "research", &report, &path)
}

/// `sedori hunt export`
pub async fn hunt_export(config: Option<&Path>, args: &PipelineArgs) -> Result<()> {
    let session = Session::open(config, args)?;
    let input = args.input.clone().unwrap_or_else(paths::raw_exports);
    announce("hunt export", &input);

    let rows = collect_export_rows(&input)?;
    if rows.is_empty() {
        output::warning(&format!("No export rows found in {}", input.display()));
        return Ok(());
    }
    output::field("Rows", rows.len());

    let rakuten = session.rakuten();
    let evaluator = session.evaluator(session.config.hunt_criteria(), &session.config.hunt.export_fees);
    let report = ExportHuntPipeline::new(&rakuten, evaluator)
        .run(&rows, &ProgressReporter::new())
        .await;

    let path = session.report_path(args.output.as_ref(), |dir| paths::export_hunt(dir, Local::now()));
    publish(&session, "hunt.export", &report, &path)
}

/// `sedori hunt keywords`
pub async fn hunt_keywords(config: Option<&Path>, args: &PipelineArgs) -> Result<()> {
    let session = Session::open(config, args)?;
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Command", "hunt keywords");
    output::field("Keywords", session.config.hunt.keywords.len());

    let keepa = session.keepa()?;
    let rakuten = session.rakuten();
    let evaluator = session.evaluator(session.config.hunt_criteria(), &session.config.fees);
    let report = KeywordHuntPipeline::new(&keepa, &rakuten, evaluator, session.config.keepa.domain)
        .run(&session.config.hunt.keywords, &ProgressReporter::new())
        .await;

    let path = session.report_path(args.output.as_ref(), |dir| paths::keyword_hunt(dir, Local::now()));
    publish(&session, "hunt.keywords", &report, &path)
}

/// `sedori gap`
pub async fn gap(config: Option<&Path>, args: &PipelineArgs) -> Result<()> {
    let session = Session::open(config, args)?;
    let input = args.input.clone().unwrap_or_else(paths::gap_list);
    announce("gap", &input);

    let rows = read_gap_rows(&input)?;
    output::field("Rows", rows.len());

    let rakuten = session.rakuten();
    let settings = &session.config.gap;
    let evaluator = session.evaluator(session.config.gap_criteria(), &settings.fees);
    let report = GapSearchPipeline::new(&rakuten, evaluator, settings.point_rate)
        .run(&rows, &ProgressReporter::new())
        .await;

    let path = session.report_path(args.output.as_ref(), paths::profitable);
    publish(&session, "gap", &report, &path)
}
