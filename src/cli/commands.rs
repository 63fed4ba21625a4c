use crate::config::AnalysisConfig;
use crate::core::{
    analyze as run_analysis, compare as run_comparison, forecast as run_forecast,
    AnalysisReport, ComparisonResult, CorrelationMatrix, Direction, ForecastSeries,
};
use crate::error::{FinsightError, FinsightResult};
use crate::loader::{load_table, load_tables};
use crate::report;
use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

/// Format a number for display, removing unnecessary decimal places
fn format_number(n: f64) -> String {
    // Four decimals is enough for ratios and growth percentages
    let rounded = (n * 1e4).round() / 1e4;
    let text = format!("{:.4}", rounded)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string();
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

fn format_optional(n: Option<f64>) -> String {
    n.map(format_number).unwrap_or_else(|| "n/a".to_string())
}

/// Execute the analyze command
pub fn analyze(
    file: PathBuf,
    output: Option<PathBuf>,
    verbose: bool,
    config: &AnalysisConfig,
) -> FinsightResult<()> {
    println!("{}", "📊 Finsight - Financial Analysis".bold().green());
    println!("   File: {}\n", file.display());

    if verbose {
        println!("{}", "📖 Loading table...".cyan());
    }
    let table = load_table(&file, config)?;
    if verbose {
        println!(
            "   Loaded {} columns x {} rows\n",
            table.columns.len(),
            table.row_count()
        );
    }

    let analysis = run_analysis(&table, config);
    print_analysis(&analysis, verbose);

    if let Some(output_path) = output {
        report::write_report(&analysis, &output_path)?;
        println!(
            "\n{}",
            format!("✅ Report exported to {}", output_path.display())
                .bold()
                .green()
        );
    }

    Ok(())
}

fn print_analysis(analysis: &AnalysisReport, verbose: bool) {
    println!(
        "   Table: {}  ({} rows, {} numeric columns)",
        analysis.table.bright_blue(),
        analysis.row_count,
        analysis.numeric_columns.len()
    );

    println!("\n{}", "💰 Financial Ratios:".bold().cyan());
    if analysis.ratios.is_empty() {
        println!("   {}", "No ratios could be computed".yellow());
    }
    for (key, value) in &analysis.ratios {
        println!("   {:<26} {:>12}", key.as_str().bright_blue(), format_number(*value));
    }

    println!("\n{}", "📈 Trends (first vs last row):".bold().cyan());
    if analysis.trends.is_empty() {
        println!("   {}", "No trends detected".yellow());
    }
    for (column, entry) in &analysis.trends {
        let rate = format!("{}%", format_number(entry.growth_rate));
        let (arrow, rate) = match entry.direction {
            Direction::Increasing => ("▲".green(), rate.green()),
            Direction::Decreasing => ("▼".red(), rate.red()),
        };
        println!("   {:<26} {:>12} {}", column.bright_blue(), rate, arrow);
    }

    if let Some(matrix) = &analysis.correlation {
        println!("\n{}", "🔗 Correlation Matrix:".bold().cyan());
        print_matrix(matrix);
    }

    if verbose && !analysis.series.is_empty() {
        println!("\n{}", "📉 Series:".bold().cyan());
        for series in &analysis.series {
            let points: Vec<String> = series
                .labels
                .iter()
                .zip(&series.values)
                .map(|(label, value)| format!("{}={}", label, format_optional(*value)))
                .collect();
            println!("   {}: {}", series.column.bright_blue(), points.join(", "));
        }
    }
}

fn print_matrix(matrix: &CorrelationMatrix) {
    let width = matrix
        .columns
        .iter()
        .map(|c| c.len())
        .max()
        .unwrap_or(0)
        .max(8);

    print!("   {:<width$}", "", width = width);
    for name in &matrix.columns {
        print!(" {:>width$}", name.bold(), width = width);
    }
    println!();
    println!("   {}", "─".repeat((width + 1) * (matrix.len() + 1)));

    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        print!("   {:<width$}", name.bright_blue(), width = width);
        for value in row {
            print!(" {:>width$}", format_optional(*value), width = width);
        }
        println!();
    }
}

/// Execute the forecast command
pub fn forecast(
    file: PathBuf,
    column: String,
    periods: Option<usize>,
    output: Option<PathBuf>,
    config: &AnalysisConfig,
) -> FinsightResult<()> {
    let periods = periods.unwrap_or(config.forecast_periods);

    println!("{}", "🔮 Finsight - Linear Forecast".bold().green());
    println!("   File: {}", file.display());
    println!("   Column: {}", column.bright_blue());
    println!("   Periods: {}\n", periods);

    let table = load_table(&file, config)?;
    let series = run_forecast(&table, &column, periods)?;
    print_forecast(&series);

    if let Some(output_path) = output {
        report::write_forecast(&series, &output_path)?;
        println!(
            "\n{}",
            format!("✅ Forecast exported to {}", output_path.display())
                .bold()
                .green()
        );
    }

    Ok(())
}

fn print_forecast(series: &ForecastSeries) {
    println!(
        "   y = {} · x + {}",
        format_number(series.slope),
        format_number(series.intercept)
    );
    println!("{}", "─".repeat(30));
    println!("{:<10} {:>18}", "Period".bold(), series.column.bold());
    println!("{}", "─".repeat(30));
    for point in &series.points {
        println!("{:<10} {:>18}", point.period, format_number(point.value));
    }
    println!("{}", "─".repeat(30));
}

/// Execute the compare command
pub fn compare(
    files: Vec<PathBuf>,
    output: Option<PathBuf>,
    config: &AnalysisConfig,
) -> FinsightResult<()> {
    if files.len() < 2 {
        return Err(FinsightError::InvalidInput(
            "compare needs at least two files".to_string(),
        ));
    }

    println!("{}", "⚖️  Finsight - Table Comparison".bold().green());
    for (i, file) in files.iter().enumerate() {
        let role = if i == 0 { " (baseline)" } else { "" };
        println!("   {}. {}{}", i + 1, file.display(), role);
    }
    println!();

    let tables = load_tables(&files, config)?;
    let result = run_comparison(&tables, config.zero_variance)?;
    print_comparison(&result);

    if let Some(output_path) = output {
        report::write_comparison(&result, &output_path)?;
        println!(
            "\n{}",
            format!("✅ Comparison exported to {}", output_path.display())
                .bold()
                .green()
        );
    }

    Ok(())
}

fn print_comparison(result: &ComparisonResult) {
    println!(
        "   Common columns: {}",
        if result.common_columns.is_empty() {
            "none".yellow().to_string()
        } else {
            result.common_columns.join(", ")
        }
    );

    println!("\n{}", "📋 Mean by table:".bold().cyan());
    print!("{:<24}", "Column".bold());
    for name in &result.table_names {
        print!(" {:>16}", name.bold());
    }
    println!();
    println!("{}", "─".repeat(24 + 17 * result.table_names.len()));
    for (column, per_table) in &result.summary_statistics {
        print!("{:<24}", column.bright_blue());
        for stats in per_table {
            print!(" {:>16}", format_optional(stats.as_ref().map(|s| s.mean)));
        }
        println!();
    }

    if !result.differences.is_empty() {
        println!("\n{}", "📐 Difference vs baseline (%):".bold().cyan());
        for (column, diffs) in &result.differences {
            let cells: Vec<String> = diffs
                .iter()
                .map(|d| match d {
                    Some(v) if *v >= 0.0 => format!("+{}%", format_number(*v)).green().to_string(),
                    Some(v) => format!("{}%", format_number(*v)).red().to_string(),
                    None => "n/a".to_string(),
                })
                .collect();
            println!("   {:<24} {}", column.bright_blue(), cells.join("  "));
        }
    }

    for delta in &result.correlation_deltas {
        println!(
            "\n{} {} ({})",
            "🔗 Correlation change:".bold().cyan(),
            delta.label,
            delta.table
        );
        print_matrix(&delta.matrix);
    }
}

/// Execute the watch command: re-run the analysis whenever the file changes
pub fn watch(file: PathBuf, verbose: bool, config: &AnalysisConfig) -> FinsightResult<()> {
    println!("{}", "👁️  Finsight - Watch Mode".bold().green());
    println!("   Watching: {}", file.display());
    println!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    if !file.exists() {
        return Err(FinsightError::Validation(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let canonical_path = file.canonicalize()?;
    let parent_dir = canonical_path
        .parent()
        .ok_or_else(|| FinsightError::Validation("Cannot determine parent directory".to_string()))?;

    let (tx, rx) = channel();

    // Debounce to avoid rapid-fire events while an editor saves
    let mut debouncer = new_debouncer(Duration::from_millis(200), tx)
        .map_err(|e| FinsightError::Validation(format!("Failed to create file watcher: {}", e)))?;

    // Editors often replace the file, so watch the directory rather than the inode
    debouncer
        .watcher()
        .watch(parent_dir, RecursiveMode::NonRecursive)
        .map_err(|e| FinsightError::Validation(format!("Failed to watch directory: {}", e)))?;

    if verbose {
        println!(
            "   {} {}",
            "Watching directory:".cyan(),
            parent_dir.display()
        );
    }

    println!("{}", "🔄 Initial run...".cyan());
    run_watch_action(&file, verbose, config);
    println!();

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|event| {
                    event.kind == DebouncedEventKind::Any && is_watched_file(&event.path, &canonical_path)
                });

                if relevant {
                    if verbose {
                        print!("\x1B[2J\x1B[1;1H");
                    }
                    println!(
                        "\n{} {}",
                        "🔄 Change detected at".cyan(),
                        watch_timestamp().cyan()
                    );
                    run_watch_action(&file, verbose, config);
                    println!();
                }
            }
            Ok(Err(error)) => {
                eprintln!("{} Watch error: {}", "❌".red(), error);
            }
            Err(e) => {
                eprintln!("{} Channel error: {}", "❌".red(), e);
                break;
            }
        }
    }

    Ok(())
}

fn is_watched_file(event_path: &Path, watched: &Path) -> bool {
    if let Ok(event_canonical) = event_path.canonicalize() {
        if event_canonical == watched {
            return true;
        }
    }
    event_path.file_name().is_some() && event_path.file_name() == watched.file_name()
}

fn watch_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

fn run_watch_action(file: &Path, verbose: bool, config: &AnalysisConfig) {
    match load_table(file, config) {
        Ok(table) => {
            let analysis = run_analysis(&table, config);
            print_analysis(&analysis, verbose);
            println!("\n{}", "✅ Analysis complete".bold().green());
        }
        Err(e) => println!("{} {}", "❌ Analysis failed:".bold().red(), e),
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
