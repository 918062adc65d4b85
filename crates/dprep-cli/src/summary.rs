use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dprep_ingest::LoadReport;
use dprep_model::{
    BinReport, EncoderState, MissingValueReport, OutlierReport, ScalerKind, ScalerState,
};
use dprep_validate::{Severity, ValidationReport};

use dprep_cli::pipeline::{CleanRun, OutputStatus, RawReport, RunOutcome};

pub fn print_run_summary(outcome: &RunOutcome) {
    let input = &outcome.manifest.input;
    println!("Input: {} ({} rows)", input.path.display(), input.rows);
    println!("SHA-256: {}", input.sha256);
    print_missing_table(&outcome.clean.missing);
    print_outlier_table(&outcome.clean.outliers);
    print_feature_table(&outcome.engineer.bins);
    print_encoder_table(&outcome.engineer.encoders);
    print_scaler_table(&outcome.engineer.scaler);
    print_issue_table(&outcome.validation);

    let outputs = &outcome.manifest.outputs;
    match outcome.status {
        OutputStatus::Written => {
            println!();
            println!("Cleaned: {}", outputs.cleaned.display());
            println!("Processed: {}", outputs.processed.display());
            println!("Manifest: {}", outputs.manifest.display());
        }
        OutputStatus::DryRun => println!("\nDry run: no files written."),
        OutputStatus::Blocked => eprintln!(
            "\nOutput blocked: validation found {} error(s). \
             Use --no-fail-on-validation to override.",
            outcome.validation.errors().count()
        ),
    }
}

pub fn print_clean_summary(run: &CleanRun) {
    print_load_line(&run.load);
    print_missing_table(&run.clean.missing);
    print_outlier_table(&run.clean.outliers);
    match &run.written {
        Some(path) => println!("\nCleaned: {}", path.display()),
        None => println!("\nDry run: no files written."),
    }
}

pub fn print_raw_report(report: &RawReport) {
    print_load_line(&report.load);
    print_missing_table(&report.missing);
    print_outlier_table(&report.outliers);
}

fn print_load_line(load: &LoadReport) {
    println!(
        "Input: {} ({} rows, {} columns, {} impossible zeros)",
        load.path.display(),
        load.rows,
        load.columns,
        load.total_zeros()
    );
}

fn print_missing_table(report: &MissingValueReport) {
    let mut table = new_table(vec!["Column", "Zeros", "Share", "Median fill"]);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for entry in &report.entries {
        table.add_row(vec![
            column_cell(&entry.column),
            count_cell(entry.zero_count, Color::Yellow),
            Cell::new(format!("{:.2}%", entry.percentage)),
            entry
                .fill_value
                .map_or_else(|| dim_cell("-"), |value| Cell::new(format!("{value:.3}"))),
        ]);
    }
    table.add_row(vec![
        total_cell(),
        Cell::new(report.total_zeros()).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!();
    println!("Missing values ({} rows):", report.total_rows);
    println!("{table}");
}

fn print_outlier_table(report: &OutlierReport) {
    let mut table = new_table(vec![
        "Column", "Q1", "Q3", "IQR", "Lower", "Upper", "Outliers", "Share",
    ]);
    for index in 1..8 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for entry in &report.entries {
        table.add_row(vec![
            column_cell(&entry.column),
            Cell::new(format!("{:.3}", entry.q1)),
            Cell::new(format!("{:.3}", entry.q3)),
            Cell::new(format!("{:.3}", entry.iqr)),
            Cell::new(format!("{:.3}", entry.lower_bound)),
            Cell::new(format!("{:.3}", entry.upper_bound)),
            count_cell(entry.count, Color::Yellow),
            Cell::new(format!("{:.2}%", entry.percentage)),
        ]);
    }
    println!();
    println!("Outliers (reported, not removed):");
    println!("{table}");
    if !report.skipped.is_empty() {
        println!("Skipped: {}", report.skipped.join(", "));
    }
}

fn print_feature_table(bins: &[BinReport]) {
    let mut table = new_table(vec!["Source", "Feature", "Counts", "Out of range", "Unlabeled"]);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for report in bins {
        let counts = report
            .counts
            .iter()
            .map(|(label, count)| format!("{label}={count}"))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            column_cell(&report.source),
            Cell::new(&report.target),
            Cell::new(counts),
            count_cell(report.out_of_range, Color::Yellow),
            count_cell(report.unlabeled, Color::Red),
        ]);
    }
    println!();
    println!("Derived features:");
    println!("{table}");
}

fn print_encoder_table(encoders: &[EncoderState]) {
    let mut table = new_table(vec!["Column", "Encoded as", "Codes"]);
    for state in encoders {
        let codes = (0_i64..)
            .take(state.len())
            .filter_map(|code| state.decode(code).map(|label| format!("{code}={label}")))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            column_cell(&state.column),
            Cell::new(&state.encoded_column),
            Cell::new(codes),
        ]);
    }
    println!();
    println!("Encodings:");
    println!("{table}");
}

fn print_scaler_table(state: &ScalerState) {
    let (center, scale) = match state.kind {
        ScalerKind::Standard => ("Mean", "Std"),
        ScalerKind::MinMax => ("Min", "Range"),
    };
    let mut table = new_table(vec!["Column", center, scale]);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in &state.columns {
        table.add_row(vec![
            column_cell(&column.column),
            Cell::new(format!("{:.4}", column.center)),
            Cell::new(format!("{:.4}", column.scale)),
        ]);
    }
    println!();
    println!("Scaling ({}):", state.kind.label());
    println!("{table}");
}

fn print_issue_table(report: &ValidationReport) {
    if report.issues.is_empty() {
        println!();
        println!("Validation: passed with no issues.");
        return;
    }
    let mut issues: Vec<_> = report.issues.iter().collect();
    issues.sort_by_key(|issue| (severity_rank(issue.severity()), issue.category().label()));

    let mut table = new_table(vec!["Severity", "Category", "Column", "Message"]);
    align_column(&mut table, 0, CellAlignment::Center);
    for issue in issues {
        table.add_row(vec![
            severity_cell(issue.severity()),
            Cell::new(issue.category().label()),
            issue.column().map_or_else(|| dim_cell("-"), column_cell),
            Cell::new(issue.message()),
        ]);
    }
    println!();
    println!(
        "Validation: {} error(s), {} warning(s)",
        report.errors().count(),
        report.warnings().count()
    );
    println!("{table}");
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_header(header.into_iter().map(header_cell).collect::<Vec<_>>());
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    table
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 0,
        Severity::Warning => 1,
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn column_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn total_cell() -> Cell {
    Cell::new("TOTAL")
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
