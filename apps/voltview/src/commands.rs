//! Command implementations
//!
//! Every command writes to the given output so stdout stays parseable;
//! logging goes to stderr.

use std::io::Write;
use std::path::Path;

use tracing::info;
use voltview_core::{
    describe_column, extract_series, parse_delimiter, BinningEngine, DistributionEntry,
    DualAxisRequest, RuntimeEntry, SampleTable, TablePreview, ViewerConfig, ViewerError,
};
use voltview_io::open_file;

use crate::cli::{BinArgs, Cli, Command, InspectArgs, PlotArgs, ReportArgs, RuntimeArgs};
use crate::table::{preview_footer, preview_table, styled_table};

/// Widest bar drawn in the text distribution chart
const BAR_WIDTH: usize = 40;

/// Run the selected command
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<(), ViewerError> {
    let config = resolve_config(cli)?;

    match &cli.command {
        Command::Inspect(args) => inspect(&config, args, out),
        Command::Plot(args) => plot(&config, args, out),
        Command::Distribution(args) => distribution(&config, args, out),
        Command::Runtime(args) => runtime(&config, args, out),
        Command::Report(args) => report(&config, args, out),
    }
}

/// Load configuration and apply global command-line overrides
fn resolve_config(cli: &Cli) -> Result<ViewerConfig, ViewerError> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::load_or_default()?,
    };

    if let Some(delimiter) = &cli.delimiter {
        parse_delimiter(delimiter)?;
        config.input.delimiter = delimiter.clone();
    }
    if cli.no_header {
        config.input.has_header = false;
    }

    config.validate()?;
    Ok(config)
}

/// Apply the binning overrides of a command to a copy of the configuration
fn analysis_config(config: &ViewerConfig, bins: &BinArgs, interval: Option<f64>) -> ViewerConfig {
    let mut config = config.clone();
    if let Some(column) = &bins.column {
        config.analysis.target_column = column.clone();
    }
    if let Some(width) = bins.bucket_width {
        config.analysis.bucket_width = width;
    }
    if let Some(interval) = interval {
        config.analysis.sample_interval_sec = interval;
    }
    config
}

fn load_table(config: &ViewerConfig, path: &Path) -> Result<SampleTable, ViewerError> {
    let path = path.to_string_lossy();
    let reader = open_file(
        &path,
        config.input.delimiter_byte()?,
        config.input.has_header,
    )?;
    let table = reader.read_table()?;
    info!(
        path = %path,
        format = reader.format_name(),
        rows = table.num_rows(),
        "table ready"
    );
    Ok(table)
}

fn inspect(config: &ViewerConfig, args: &InspectArgs, out: &mut dyn Write) -> Result<(), ViewerError> {
    let table = load_table(config, &args.file)?;

    writeln!(
        out,
        "{}: {} rows, {} columns\n",
        args.file.display(),
        table.num_rows(),
        table.num_columns()
    )?;

    let mut schema = styled_table(
        ["column", "type", "count", "missing", "min", "max", "mean"],
        &[2, 3, 4, 5, 6],
    );
    for (descriptor, _) in table.iter_columns() {
        let mut row = vec![descriptor.name.clone(), descriptor.dtype.name().to_string()];
        match describe_column(&table, &descriptor.name) {
            Ok(stats) if !stats.is_empty() => row.extend([
                stats.count.to_string(),
                stats.missing.to_string(),
                format!("{:.3}", stats.min),
                format!("{:.3}", stats.max),
                format!("{:.3}", stats.mean),
            ]),
            _ => row.extend(["-", "-", "-", "-", "-"].map(String::from)),
        }
        schema.add_row(row);
    }
    writeln!(out, "{}\n", schema)?;

    write_preview(&TablePreview::from_table(&table, args.start, args.rows), out)
}

fn plot(config: &ViewerConfig, args: &PlotArgs, out: &mut dyn Write) -> Result<(), ViewerError> {
    let table = load_table(config, &args.file)?;

    let mut request = DualAxisRequest::new(&args.x, &args.y1);
    if let Some(y2) = &args.y2 {
        request = request.with_secondary(y2);
    }

    let plot = extract_series(&table, &request)?;
    serde_json::to_writer_pretty(&mut *out, &plot)?;
    writeln!(out)?;
    Ok(())
}

fn distribution(config: &ViewerConfig, args: &BinArgs, out: &mut dyn Write) -> Result<(), ViewerError> {
    let config = analysis_config(config, args, None);
    let engine = BinningEngine::from_config(&config.analysis)?;
    let table = load_table(&config, &args.file)?;

    let entries = engine.compute_distribution(&table, &config.analysis.target_column)?;
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
    } else {
        write_distribution(&config.analysis.target_column, &entries, out)?;
    }
    Ok(())
}

fn runtime(config: &ViewerConfig, args: &RuntimeArgs, out: &mut dyn Write) -> Result<(), ViewerError> {
    let config = analysis_config(config, &args.bins, args.interval);
    let engine = BinningEngine::from_config(&config.analysis)?;
    let table = load_table(&config, &args.bins.file)?;

    let entries = engine.compute_runtime_summary(&table, &config.analysis.target_column)?;
    if args.bins.json {
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
    } else {
        write_runtime(&config.analysis.target_column, &entries, out)?;
    }
    Ok(())
}

fn report(config: &ViewerConfig, args: &ReportArgs, out: &mut dyn Write) -> Result<(), ViewerError> {
    let bins = &args.runtime.bins;
    let config = analysis_config(config, bins, args.runtime.interval);
    let engine = BinningEngine::from_config(&config.analysis)?;
    let table = load_table(&config, &bins.file)?;
    let column = &config.analysis.target_column;

    // A bad target column only removes the binned sections
    let report = engine.report(&table, column)?;
    if bins.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    write_preview(&TablePreview::from_table(&table, 0, args.rows), out)?;
    writeln!(out)?;

    match (&report.analysis, &report.warning) {
        (Some(analysis), _) => {
            write_distribution(column, &analysis.distribution, out)?;
            writeln!(out)?;
            write_runtime(column, &analysis.runtime, out)?;
        }
        (None, Some(warning)) => writeln!(out, "warning: {}", warning)?,
        (None, None) => {}
    }
    Ok(())
}

fn write_preview(preview: &TablePreview, out: &mut dyn Write) -> Result<(), ViewerError> {
    writeln!(out, "{}", preview_table(preview))?;
    writeln!(out, "{}", preview_footer(preview))?;
    Ok(())
}

fn write_distribution(
    column: &str,
    entries: &[DistributionEntry],
    out: &mut dyn Write,
) -> Result<(), ViewerError> {
    writeln!(out, "Distribution of {}\n", column)?;

    let max = entries.iter().map(|e| e.percentage).fold(0.0, f64::max);
    let mut table = styled_table(["range", "percent", "of all rows", "chart"], &[1, 2]);
    for e in entries {
        table.add_row([
            e.label.clone(),
            format!("{:.2}", e.percentage),
            format!("{:.2}", e.row_share),
            bar(e.percentage, max),
        ]);
    }
    writeln!(out, "{}", table)?;
    Ok(())
}

fn write_runtime(column: &str, entries: &[RuntimeEntry], out: &mut dyn Write) -> Result<(), ViewerError> {
    writeln!(out, "Runtime summary by {} range\n", column)?;

    let mut table = styled_table(["range", "row count", "total time (sec)"], &[1, 2]);
    for e in entries {
        table.add_row([
            e.label.clone(),
            e.row_count.to_string(),
            format!("{:.4}", e.total_time_sec),
        ]);
    }
    writeln!(out, "{}", table)?;

    let total_rows: u64 = entries.iter().map(|e| e.row_count).sum();
    let total_time: f64 = entries.iter().map(|e| e.total_time_sec).sum();
    writeln!(out, "total: {} rows, {:.4} sec", total_rows, total_time)?;
    Ok(())
}

/// Bar scaled so the largest bucket spans `BAR_WIDTH` characters
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    "#".repeat(((value / max) * BAR_WIDTH as f64).round() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use insta::assert_snapshot;

    const EXPORT: &str = "\
timestamp;current_in;voltage;state
0;5;48.1;idle
1;15;48.0;drive
2;15;47.9;drive
3;135;47.2;boost
4;-3;48.3;regen
";

    /// Three buckets: 0-50, 50-100 and 100+
    const WIDE_BUCKETS: &str = "\
[analysis]
bucket_width = 50.0
bounded_buckets = 2
";

    fn export_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn run_with_config(config_toml: &str, args: &[&str]) -> Result<String, ViewerError> {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, config_toml).unwrap();

        let mut argv = vec!["voltview", "--config", config.to_str().unwrap()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();

        let mut out = Vec::new();
        run(&cli, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn run_args(args: &[&str]) -> Result<String, ViewerError> {
        run_with_config("", args)
    }

    #[test]
    fn test_runtime_table() {
        let file = export_file(EXPORT);
        let output = run_with_config(WIDE_BUCKETS, &["runtime", file.path().to_str().unwrap()]).unwrap();

        assert_snapshot!(output, @r"
Runtime summary by current_in range

+--------+-----------+------------------+
| range  | row count | total time (sec) |
+=======================================+
| 0-50   |         3 |           0.1364 |
| 50-100 |         0 |           0.0000 |
| 100+   |         1 |           0.0455 |
+--------+-----------+------------------+
total: 4 rows, 0.1818 sec
");
    }

    #[test]
    fn test_distribution_table() {
        let file = export_file(EXPORT);
        let output =
            run_with_config(WIDE_BUCKETS, &["distribution", file.path().to_str().unwrap()]).unwrap();

        assert_snapshot!(output, @r"
Distribution of current_in

+--------+---------+-------------+------------------------------------------+
| range  | percent | of all rows | chart                                    |
+===========================================================================+
| 0-50   |   75.00 |       60.00 | ######################################## |
| 50-100 |    0.00 |        0.00 |                                          |
| 100+   |   25.00 |       20.00 | #############                            |
+--------+---------+-------------+------------------------------------------+
");
    }

    #[test]
    fn test_distribution_json() {
        let file = export_file(EXPORT);
        let output = run_args(&["distribution", file.path().to_str().unwrap(), "--json"]).unwrap();

        let entries: serde_json::Value = serde_json::from_str(&output).unwrap();
        let entries = entries.as_array().unwrap();
        assert_eq!(entries.len(), 14);
        assert_eq!(entries[1]["label"], "10-20");
        assert_eq!(entries[1]["percentage"], 50.0);
    }

    #[test]
    fn test_plot_json() {
        let file = export_file(EXPORT);
        let output = run_args(&[
            "plot",
            file.path().to_str().unwrap(),
            "-x",
            "timestamp",
            "--y1",
            "current_in",
            "--y2",
            "voltage",
        ])
        .unwrap();

        let plot: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(plot["x"], "timestamp");
        assert_eq!(plot["x_axis"]["kind"], "numeric");
        assert_eq!(plot["primary"]["points"].as_array().unwrap().len(), 5);
        assert_eq!(plot["secondary"]["column"], "voltage");
    }

    #[test]
    fn test_plot_against_clock_time() {
        let file = export_file("time;current_in\n12:00:00.000;5\n12:00:00.045;15\n");
        let output = run_args(&[
            "plot",
            file.path().to_str().unwrap(),
            "-x",
            "time",
            "--y1",
            "current_in",
        ])
        .unwrap();

        let plot: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(plot["x_axis"]["kind"], "categorical");
        assert_eq!(plot["x_axis"]["labels"][1], "12:00:00.045");
        assert_eq!(plot["primary"]["points"][1], serde_json::json!([1.0, 15.0]));
    }

    #[test]
    fn test_report_warns_on_missing_column() {
        let file = export_file(EXPORT);
        let output = run_args(&[
            "report",
            file.path().to_str().unwrap(),
            "--column",
            "current_out",
        ])
        .unwrap();

        assert!(output.contains("| timestamp | current_in |"));
        assert!(output.ends_with("warning: Column 'current_out' not found in table\n"));
        assert!(!output.contains("Runtime summary"));
    }

    #[test]
    fn test_report_warns_on_text_column() {
        let file = export_file(EXPORT);
        let output =
            run_args(&["report", file.path().to_str().unwrap(), "--column", "state"]).unwrap();

        assert!(output.ends_with("warning: Column 'state' contains no numeric values\n"));
        assert!(!output.contains("Distribution of"));
    }

    #[test]
    fn test_report_json_keeps_warning() {
        let file = export_file("timestamp;current_in\n0;5\n");
        let output = run_args(&[
            "report",
            file.path().to_str().unwrap(),
            "--column",
            "current_out",
            "--json",
        ])
        .unwrap();

        let report: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(report["rows"], 1);
        assert_eq!(report["columns"], serde_json::json!(["timestamp", "current_in"]));
        assert_eq!(report["warning"], "Column 'current_out' not found in table");
        assert!(report["analysis"].is_null());
    }

    #[test]
    fn test_report_json_with_analysis() {
        let file = export_file(EXPORT);
        let output = run_args(&["report", file.path().to_str().unwrap(), "--json"]).unwrap();

        let report: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(report["warning"].is_null());
        assert_eq!(report["analysis"]["included_rows"], 4);
        assert_eq!(report["analysis"]["excluded_rows"], 1);
        assert_eq!(report["analysis"]["runtime"][1]["row_count"], 2);
    }

    #[test]
    fn test_runtime_fails_on_missing_column() {
        let file = export_file(EXPORT);
        let err = run_args(&["runtime", file.path().to_str().unwrap(), "-C", "nope"]).unwrap_err();
        assert!(matches!(err, ViewerError::Analysis(_)));
    }

    #[test]
    fn test_inspect_lists_columns() {
        let file = export_file(EXPORT);
        let output = run_args(&["inspect", file.path().to_str().unwrap(), "-n", "2"]).unwrap();

        assert!(output.contains("5 rows, 4 columns"));
        assert!(output.contains("| current_in | int64   |"));
        assert!(output.ends_with("(2 of 5 rows, starting at 0); use --start to page\n"));
    }

    #[test]
    fn test_bad_delimiter_override() {
        let file = export_file(EXPORT);
        let err = run_args(&["--delimiter", ";;", "inspect", file.path().to_str().unwrap()]).unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(50.0, 50.0).len(), BAR_WIDTH);
        assert_eq!(bar(25.0, 50.0).len(), BAR_WIDTH / 2);
        assert_eq!(bar(0.0, 0.0), "");
    }
}
