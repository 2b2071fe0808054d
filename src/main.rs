use clap::{Args, Parser, Subcommand};
use ingaz::cli;
use ingaz::config::LayoutOverrides;
use ingaz::error::IngazResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ingaz")]
#[command(about = "Weekly assessment analysis for teacher-maintained Excel workbooks.")]
#[command(long_about = "Ingaz - Weekly assessment analysis for school workbooks

Reads teacher-maintained Excel sheets, classifies every student's
assessment completion, and produces categorized records, achievement
summaries, report cards, and class digests.

COMMANDS:
  analyze     - Analyze sheets and categorize every student
  summary     - Aggregate achievement over a due-date range
  report-card - Render per-student HTML report cards
  digest      - Render a class digest (text or HTML email body)
  watch       - Re-analyze whenever the workbook changes

EXAMPLES:
  ingaz analyze grades.xlsx                        # Whole workbook
  ingaz analyze grades.xlsx -s \"علوم 07 1\"         # One sheet
  ingaz analyze grades.xlsx --json > records.json
  ingaz summary grades.xlsx --from 2024-09-01 --to 2024-09-30
  ingaz report-card grades.xlsx -o reports
  ingaz digest grades.xlsx --sheet \"علوم 07 1\" --html")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Layout flags shared by every workbook-reading command. A given flag
/// overrides the profile value for that position.
#[derive(Args)]
struct LayoutFlags {
    /// Column letter where assessment headers begin (default: H)
    #[arg(long, value_name = "LETTER")]
    start_col: Option<String>,

    /// 1-indexed row of student names and assessment headers (default: 5)
    #[arg(long, value_name = "ROW")]
    names_row: Option<u32>,

    /// Column letter of student names (default: A)
    #[arg(long, value_name = "LETTER")]
    names_col: Option<String>,

    /// 1-indexed row of due dates (default: 3)
    #[arg(long, value_name = "ROW")]
    due_row: Option<u32>,
}

impl From<LayoutFlags> for LayoutOverrides {
    fn from(flags: LayoutFlags) -> Self {
        LayoutOverrides {
            start_col_letter: flags.start_col,
            names_row: flags.names_row,
            names_col: flags.names_col,
            due_row: flags.due_row,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Analyze assessment sheets and categorize every student.

Locates the assessment columns (right of the configured start column),
counts solved and unsolved work per student, and assigns each student a
performance category with a recommendation.

SHEET NAMES:
  Sheets named like \"علوم 07 1\" (subject, level, section) feed the
  per-section identity. Sheets that do not match still analyze; their
  identity fields stay empty.

DATE WINDOW:
  Pass --from and --to to append a cross-sheet achievement summary
  restricted to assessments due inside that range. Dates accept
  2024-09-15, 15/9/2024, or day + Arabic month forms like \"15 سبتمبر\".

EXAMPLES:
  ingaz analyze grades.xlsx
  ingaz analyze grades.xlsx -s \"علوم 07 1,رياضيات 07 2\"
  ingaz analyze grades.xlsx --from 2024-09-01 --to 2024-09-30
  ingaz analyze grades.xlsx --start-col C --names-row 2
  ingaz analyze grades.xlsx --json -o results.xlsx")]
    /// Analyze sheets and categorize every student
    Analyze {
        /// Path to the workbook (.xlsx, .xlsm, .xls, .ods)
        file: PathBuf,

        /// Comma-separated sheet names to analyze (default: all)
        #[arg(short, long, value_delimiter = ',')]
        sheets: Vec<String>,

        /// Path to a YAML analysis profile
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutFlags,

        /// Start of the due-date window (requires --to)
        #[arg(long)]
        from: Option<String>,

        /// End of the due-date window (requires --from)
        #[arg(long)]
        to: Option<String>,

        /// Print student records as JSON instead of the report
        #[arg(long)]
        json: bool,

        /// Write results to an Excel workbook
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show per-student detail
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Aggregate achievement over a due-date range.

Counts solved and expected assessments per subject, level, and section,
restricted to assessment columns whose due date falls inside the range
(bounds included). Assessments without a parseable due date are left
out of the window.

DATE FORMATS:
  2024-09-15 | 15/9/2024 | ١٥/٩/٢٠٢٤ | 15 سبتمبر
  Day-plus-Arabic-month forms assume the current year.

EXAMPLES:
  ingaz summary grades.xlsx --from 2024-09-01 --to 2024-09-30
  ingaz summary grades.xlsx --from \"1 سبتمبر\" --to \"30 سبتمبر\" -o summary.xlsx")]
    /// Aggregate achievement over a due-date range
    Summary {
        /// Path to the workbook
        file: PathBuf,

        /// Start of the due-date window
        #[arg(long)]
        from: String,

        /// End of the due-date window
        #[arg(long)]
        to: String,

        /// Path to a YAML analysis profile
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutFlags,

        /// Print summary rows as JSON instead of the report
        #[arg(long)]
        json: bool,

        /// Write the summary to an Excel workbook
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show parsing detail
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Render per-student HTML report cards.

Writes one HTML file per student record, named
\"<student> - <subject>.html\", into the output directory. Cards are
right-to-left documents showing the student's counts, achievement
percentage, category, recommendation, and unsolved assessment titles.

EXAMPLES:
  ingaz report-card grades.xlsx
  ingaz report-card grades.xlsx -o reports --sheet \"علوم 07 1\"
  ingaz report-card grades.xlsx --student \"أحمد محمد\"")]
    /// Render per-student HTML report cards
    ReportCard {
        /// Path to the workbook
        file: PathBuf,

        /// Only render cards for this student name
        #[arg(long)]
        student: Option<String>,

        /// Only render cards from this sheet
        #[arg(long)]
        sheet: Option<String>,

        /// Directory to write the cards into
        #[arg(short, long, default_value = "reports")]
        output: PathBuf,

        /// Path to a YAML analysis profile
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutFlags,

        /// List each card as it is written
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Render a class digest for teachers.

Text mode (default) prints a boxed Arabic report per sheet: class
statistics, performance bands, and recommended follow-ups. HTML mode
renders an email-ready body for a single sheet; use --sheet when the
workbook has more than one.

EXAMPLES:
  ingaz digest grades.xlsx
  ingaz digest grades.xlsx --sheet \"علوم 07 1\" --html -o digest.html")]
    /// Render a class digest (text or HTML email body)
    Digest {
        /// Path to the workbook
        file: PathBuf,

        /// Only cover this sheet
        #[arg(long)]
        sheet: Option<String>,

        /// Render an HTML email body instead of text
        #[arg(long)]
        html: bool,

        /// Write the digest to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to a YAML analysis profile
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutFlags,

        /// Show sheet coverage detail
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Watch a workbook and re-analyze on changes.

Monitors the workbook's directory and re-runs the analysis whenever the
file is saved. Office lock files (~$...) are ignored; saves are
debounced so a single save triggers a single run.

EXAMPLES:
  ingaz watch grades.xlsx
  ingaz watch grades.xlsx --verbose

Press Ctrl+C to stop watching.")]
    /// Watch a workbook and re-analyze on changes
    Watch {
        /// Path to the workbook to watch
        file: PathBuf,

        /// Path to a YAML analysis profile
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutFlags,

        /// Show category detail on each run
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> IngazResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            file,
            sheets,
            config,
            layout,
            from,
            to,
            json,
            output,
            verbose,
        } => cli::analyze(
            file,
            sheets,
            config,
            layout.into(),
            from,
            to,
            json,
            output,
            verbose,
        ),

        Commands::Summary {
            file,
            from,
            to,
            config,
            layout,
            json,
            output,
            verbose,
        } => cli::summary(file, from, to, config, layout.into(), json, output, verbose),

        Commands::ReportCard {
            file,
            student,
            sheet,
            output,
            config,
            layout,
            verbose,
        } => cli::report_card(file, student, sheet, output, config, layout.into(), verbose),

        Commands::Digest {
            file,
            sheet,
            html,
            output,
            config,
            layout,
            verbose,
        } => cli::digest(file, sheet, html, output, config, layout.into(), verbose),

        Commands::Watch {
            file,
            config,
            layout,
            verbose,
        } => cli::watch(file, config, layout.into(), verbose),
    }
}
