use crate::config::{load_profile, AnalyzerConfig, LayoutOverrides};
use crate::core::dates;
use crate::core::{summarize, Analyzer, WindowSummary};
use crate::error::{IngazError, IngazResult};
use crate::excel::{ResultsExporter, WorkbookLoader};
use crate::report::{render_report_card, DigestGenerator};
use crate::types::{DateWindow, SheetAnalysis, StudentRecord, WorkbookAnalysis};
use chrono::Local;
use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

/// Execute the analyze command
#[allow(clippy::too_many_arguments)]
pub fn analyze(
    file: PathBuf,
    sheets: Vec<String>,
    config: Option<PathBuf>,
    layout: LayoutOverrides,
    from: Option<String>,
    to: Option<String>,
    json: bool,
    output: Option<PathBuf>,
    verbose: bool,
) -> IngazResult<()> {
    let config = load_config(config.as_deref(), &layout)?;
    let window = resolve_window(&config, from.as_deref(), to.as_deref())?;

    if !json {
        println!("{}", "📊 Ingaz - Weekly Assessment Analysis".bold().green());
        println!("   File: {}\n", file.display());
    }

    let workbook = WorkbookLoader::new(&file).load()?;
    let analyzer = Analyzer::new(&config)?;
    let selection = if sheets.is_empty() {
        None
    } else {
        Some(sheets.as_slice())
    };
    let analysis = analyzer.analyze_selected(&workbook, selection);

    print_warnings(&analysis);

    if let Some(ref path) = output {
        ResultsExporter::new(path).export_records(&analysis)?;
        if !json {
            println!("{} {}\n", "✅ Results written to".green(), path.display());
        }
    }

    if json {
        let records: Vec<&StudentRecord> = analysis.records().collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for sheet in &analysis.sheets {
        print_sheet(sheet, verbose);
    }

    if analysis.sheets.is_empty() {
        println!("{}", "⚠️  No usable sheets found in workbook".yellow());
    }

    if let Some(window) = window {
        let summary = summarize(&analysis.sheets, window);
        println!();
        print_window_summary(&summary);
    }

    println!();
    println!(
        "{}",
        format!(
            "✅ Analyzed {} sheets, {} students, {} skipped",
            analysis.sheets.len(),
            analysis.record_count(),
            analysis.skipped.len()
        )
        .bold()
        .green()
    );

    Ok(())
}

/// Execute the summary command
#[allow(clippy::too_many_arguments)]
pub fn summary(
    file: PathBuf,
    from: String,
    to: String,
    config: Option<PathBuf>,
    layout: LayoutOverrides,
    json: bool,
    output: Option<PathBuf>,
    verbose: bool,
) -> IngazResult<()> {
    let config = load_config(config.as_deref(), &layout)?;
    let start = parse_cli_date(&from)?;
    let end = parse_cli_date(&to)?;
    if end < start {
        return Err(IngazError::InvalidInput(format!(
            "Date range is reversed: {} is after {}",
            from, to
        )));
    }
    let window = DateWindow::new(start, end);

    if !json {
        println!("{}", "📅 Ingaz - Date-Range Summary".bold().green());
        println!("   File: {}\n", file.display());
    }

    let workbook = WorkbookLoader::new(&file).load()?;
    let analyzer = Analyzer::new(&config)?;
    let analysis = analyzer.analyze_workbook(&workbook);

    print_warnings(&analysis);

    if verbose && !json {
        println!(
            "   {}",
            format!(
                "Parsed {} sheets, {} students",
                analysis.sheets.len(),
                analysis.record_count()
            )
            .cyan()
        );
        println!();
    }

    let summary = summarize(&analysis.sheets, window);

    if let Some(ref path) = output {
        ResultsExporter::new(path).export_summary(&summary)?;
        if !json {
            println!("{} {}\n", "✅ Summary written to".green(), path.display());
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summary.rows)?);
        return Ok(());
    }

    print_window_summary(&summary);
    println!();
    println!("{}", "✅ Summary complete".bold().green());

    Ok(())
}

/// Execute the report-card command
#[allow(clippy::too_many_arguments)]
pub fn report_card(
    file: PathBuf,
    student: Option<String>,
    sheet: Option<String>,
    output: PathBuf,
    config: Option<PathBuf>,
    layout: LayoutOverrides,
    verbose: bool,
) -> IngazResult<()> {
    let config = load_config(config.as_deref(), &layout)?;

    println!("{}", "🎓 Ingaz - Student Report Cards".bold().green());
    println!("   File: {}\n", file.display());

    let workbook = WorkbookLoader::new(&file).load()?;
    let analyzer = Analyzer::new(&config)?;
    let selection: Option<Vec<String>> = sheet.map(|name| vec![name]);
    let analysis = analyzer.analyze_selected(&workbook, selection.as_deref());

    print_warnings(&analysis);

    fs::create_dir_all(&output)?;

    let mut written = 0usize;
    for record in analysis.records() {
        if let Some(ref name) = student {
            if &record.name != name {
                continue;
            }
        }
        let filename = format!(
            "{} - {}.html",
            sanitize_filename(&record.name),
            sanitize_filename(&record.subject)
        );
        let path = output.join(filename);
        fs::write(&path, render_report_card(record))?;
        if verbose {
            println!("   {} {}", "📄".cyan(), path.display());
        }
        written += 1;
    }

    if written == 0 {
        if let Some(name) = student {
            return Err(IngazError::InvalidInput(format!(
                "No student named '{}' found in the workbook",
                name
            )));
        }
        println!("{}", "⚠️  No usable sheets found in workbook".yellow());
        return Ok(());
    }

    println!();
    println!(
        "{}",
        format!("✅ Wrote {} report cards to {}", written, output.display())
            .bold()
            .green()
    );

    Ok(())
}

/// Execute the digest command
#[allow(clippy::too_many_arguments)]
pub fn digest(
    file: PathBuf,
    sheet: Option<String>,
    html: bool,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    layout: LayoutOverrides,
    verbose: bool,
) -> IngazResult<()> {
    let config = load_config(config.as_deref(), &layout)?;

    println!("{}", "📬 Ingaz - Class Digest".bold().green());
    println!("   File: {}\n", file.display());

    let workbook = WorkbookLoader::new(&file).load()?;
    let analyzer = Analyzer::new(&config)?;
    let selection: Option<Vec<String>> = sheet.map(|name| vec![name]);
    let analysis = analyzer.analyze_selected(&workbook, selection.as_deref());

    print_warnings(&analysis);

    if analysis.sheets.is_empty() {
        return Err(IngazError::InvalidInput(
            "No usable sheets found in workbook".to_string(),
        ));
    }

    if verbose {
        println!(
            "   {}",
            format!("Covering {} sheets", analysis.sheets.len()).cyan()
        );
        println!();
    }

    let generator = DigestGenerator::new(config.thresholds);

    let document = if html {
        match analysis.sheets.as_slice() {
            [single] => generator.render_html(single),
            _ => {
                return Err(IngazError::InvalidInput(
                    "HTML digests cover one sheet at a time; pick one with --sheet".to_string(),
                ))
            }
        }
    } else {
        analysis
            .sheets
            .iter()
            .map(|sheet| generator.render_text(sheet))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    match output {
        Some(path) => {
            fs::write(&path, &document)?;
            println!("{} {}", "✅ Digest written to".bold().green(), path.display());
        }
        None => println!("{}", document),
    }

    Ok(())
}

/// Execute the watch command
pub fn watch(
    file: PathBuf,
    config: Option<PathBuf>,
    layout: LayoutOverrides,
    verbose: bool,
) -> IngazResult<()> {
    println!("{}", "👁️  Ingaz - Watch Mode".bold().green());
    println!("   Watching: {}", file.display());
    println!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    // Verify file exists
    if !file.exists() {
        return Err(IngazError::InvalidInput(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let config = load_config(config.as_deref(), &layout)?;
    let analyzer = Analyzer::new(&config)?;

    // Get canonical path and parent directory
    let canonical_path = file.canonicalize()?;
    let parent_dir = canonical_path.parent().ok_or_else(|| {
        IngazError::InvalidInput("Cannot determine parent directory".to_string())
    })?;

    // Create channel for file system events
    let (tx, rx) = channel();

    // Create a debouncer to avoid rapid-fire events during file saves
    let mut debouncer = new_debouncer(Duration::from_millis(200), tx)
        .map_err(|e| IngazError::InvalidInput(format!("Failed to create file watcher: {}", e)))?;

    // Watch the parent directory (watches all workbooks in that directory)
    debouncer
        .watcher()
        .watch(parent_dir, RecursiveMode::NonRecursive)
        .map_err(|e| IngazError::InvalidInput(format!("Failed to watch directory: {}", e)))?;

    if verbose {
        println!(
            "   {} {}",
            "Watching directory:".cyan(),
            parent_dir.display()
        );
    }

    // Run initial analysis
    println!("{}", "🔄 Initial run...".cyan());
    run_watch_action(&analyzer, &file, verbose);
    println!();

    // Watch loop
    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                // Check if any event is for our file (or any workbook in directory)
                let relevant = events.iter().any(|event| {
                    if event.kind != DebouncedEventKind::Any {
                        return false;
                    }
                    // Office drops ~$ lock files next to an open workbook
                    if let Some(name_str) = event.path.file_name().and_then(|n| n.to_str()) {
                        if name_str.starts_with("~$") {
                            return false;
                        }
                    }
                    // Check if it's our main file
                    if let Ok(event_canonical) = event.path.canonicalize() {
                        if event_canonical == canonical_path {
                            return true;
                        }
                    }
                    // Check if filename matches our file
                    if let Some(filename) = event.path.file_name() {
                        if let Some(our_filename) = canonical_path.file_name() {
                            if filename == our_filename {
                                return true;
                            }
                        }
                        // Also trigger on any workbook changes in the directory
                        if let Some(name_str) = filename.to_str() {
                            if name_str.ends_with(".xlsx")
                                || name_str.ends_with(".xlsm")
                                || name_str.ends_with(".xls")
                                || name_str.ends_with(".ods")
                            {
                                return true;
                            }
                        }
                    }
                    false
                });

                if relevant {
                    // Clear screen for fresh output (optional, can be verbose mode only)
                    if verbose {
                        print!("\x1B[2J\x1B[1;1H"); // ANSI clear screen
                    }
                    println!(
                        "\n{} {}",
                        "🔄 Change detected at".cyan(),
                        Local::now().format("%H:%M:%S").to_string().cyan()
                    );
                    run_watch_action(&analyzer, &file, verbose);
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

/// Run one watch-mode analysis pass
fn run_watch_action(analyzer: &Analyzer, file: &Path, verbose: bool) {
    match analyze_internal(analyzer, file, verbose) {
        Ok(_) => println!("{}", "✅ Analysis complete".bold().green()),
        Err(e) => println!("{} {}", "❌ Analysis failed:".bold().red(), e),
    }
}

/// Internal analysis function for watch mode
fn analyze_internal(analyzer: &Analyzer, file: &Path, verbose: bool) -> IngazResult<()> {
    let workbook = WorkbookLoader::new(file).load()?;
    let analysis = analyzer.analyze_workbook(&workbook);

    print_warnings(&analysis);

    for sheet in &analysis.sheets {
        println!(
            "   📊 {} ({} students)",
            sheet.sheet_name,
            sheet.records.len()
        );
        if verbose {
            for (category, count) in category_counts(&sheet.records) {
                println!("      {}: {}", category, count);
            }
        }
    }
    if analysis.sheets.is_empty() {
        println!("   {}", "⚠️  No usable sheets found in workbook".yellow());
    }

    Ok(())
}

/// Load an analysis profile, falling back to the built-in defaults.
/// Layout flags from the command line override the profile values.
fn load_config(path: Option<&Path>, layout: &LayoutOverrides) -> IngazResult<AnalyzerConfig> {
    let mut config = match path {
        Some(path) => load_profile(path)?,
        None => AnalyzerConfig::default(),
    };
    layout.apply(&mut config.layout);
    Ok(config)
}

/// Parse a CLI date argument with the same permissive rules as due-date cells
fn parse_cli_date(text: &str) -> IngazResult<chrono::NaiveDate> {
    dates::parse_str(text).ok_or_else(|| {
        IngazError::InvalidInput(format!(
            "Unrecognized date '{}'; try a form like 2024-09-15 or 15/9/2024",
            text
        ))
    })
}

/// Resolve the summary window: CLI flags win over the profile's date range
fn resolve_window(
    config: &AnalyzerConfig,
    from: Option<&str>,
    to: Option<&str>,
) -> IngazResult<Option<DateWindow>> {
    match (from, to) {
        (Some(from), Some(to)) => {
            let start = parse_cli_date(from)?;
            let end = parse_cli_date(to)?;
            if end < start {
                return Err(IngazError::InvalidInput(format!(
                    "Date range is reversed: {} is after {}",
                    from, to
                )));
            }
            Ok(Some(DateWindow::new(start, end)))
        }
        (None, None) => Ok(config.date_range),
        _ => Err(IngazError::InvalidInput(
            "--from and --to must be given together".to_string(),
        )),
    }
}

fn print_warnings(analysis: &WorkbookAnalysis) {
    for skipped in &analysis.skipped {
        eprintln!("{} {}", "⚠️".yellow(), skipped.warning.yellow());
    }
}

fn print_sheet(sheet: &SheetAnalysis, verbose: bool) {
    println!(
        "{}",
        format!("📊 {}", sheet.sheet_name).bold().bright_blue()
    );
    println!("   Subject: {}", sheet.identity.subject);
    println!(
        "   Level: {}   Section: {}",
        sheet.identity.level, sheet.identity.section
    );
    println!(
        "   Assessments: {}   Students: {}",
        sheet.columns.len(),
        sheet.records.len()
    );

    if verbose {
        for record in &sheet.records {
            println!(
                "   {} {}: {}/{} ({:.2}%) {}",
                "•".cyan(),
                record.name,
                record.solved,
                record.total,
                record.solve_pct,
                record.category
            );
        }
    }

    println!("   {}", "📈 Categories:".cyan());
    for (category, count) in category_counts(&sheet.records) {
        println!("      {}: {}", category, count);
    }
    println!();
}

/// Tally categories in first-seen order so output follows the band order
fn category_counts(records: &[StudentRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        match counts.iter_mut().find(|(name, _)| name == &record.category) {
            Some((_, count)) => *count += 1,
            None => counts.push((record.category.clone(), 1)),
        }
    }
    counts
}

fn print_window_summary(summary: &WindowSummary) {
    println!("{}", "📅 Achievement Summary:".bold().cyan());
    println!(
        "   Period: {} to {}",
        summary.window.start.format("%Y-%m-%d"),
        summary.window.end.format("%Y-%m-%d")
    );

    if summary.is_empty() {
        println!("   {}", "⚠️  No assessments due in this period".yellow());
        return;
    }

    println!();
    println!("   {}", "📚 Subjects:".bold());
    for totals in summary.subject_totals() {
        println!(
            "      {}: {}/{} ({:.2}%)",
            totals.subject, totals.solved, totals.total, totals.achievement_pct
        );
    }

    println!();
    println!("   {}", "🏫 Sections:".bold());
    for row in &summary.rows {
        let label = [row.subject.as_str(), row.level.as_str(), row.section.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "      {}: {}/{} ({:.2}%)",
            label, row.solved, row.total, row.achievement_pct
        );
    }
}

/// Strip path separators and other characters that break filenames
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
