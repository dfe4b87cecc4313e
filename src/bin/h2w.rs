//! h2w CLI - HTML tables to WordprocessingML merge-marked grids

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use tabspan::{
    diagnostics::{format_diagnostics, CheckResult},
    normalize_html_table, render_table, GridError, GridOptions, GridResult, MarkupCell,
    NormalizedTable, OutputCell, WordmlOptions,
};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "h2w")]
#[command(version)]
#[command(about = "h2w - HTML table spans to WordprocessingML merge markers", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Wordml)]
    format: Format,

    /// Pad short rows with vacant cells so every row covers every column
    #[arg(long)]
    pad: bool,

    /// Indent the WordprocessingML output
    #[arg(short, long)]
    pretty: bool,

    /// Table style id written as w:tblStyle
    #[arg(long)]
    style: Option<String>,

    /// Width of every grid column in twentieths of a point
    #[arg(long)]
    col_width: Option<u32>,

    /// Declare the w namespace so the output stands alone as XML
    #[arg(long)]
    standalone: bool,

    /// Strict mode: cap tables at 63 columns, pad rows and exit with error
    /// if any structural warning occurs
    #[arg(long)]
    strict: bool,

    /// Quiet mode: suppress warning output to stderr
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored diagnostics
    #[arg(long)]
    no_color: bool,

    /// Log grid building steps to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Report structural irregularities without converting
    Check {
        /// Input file to check
        input: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Apply the 63-column limit of WordprocessingML consumers and exit
        /// with error if any structural warning occurs
        #[arg(long)]
        strict: bool,
    },

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// WordprocessingML w:tbl element
    Wordml,
    /// One line per normalized row, for reading
    Grid,
    /// Normalized rows and diagnostics as JSON
    Json,
}

#[cfg(feature = "cli")]
fn main() {
    let mut cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.verbose { "debug" } else { "error" }),
    )
    .init();

    // Handle subcommands first
    let result = match cli.command.take() {
        Some(cmd) => handle_subcommand(cmd),
        None => convert(cli),
    };
    if let Err(err) = result {
        exit_with_error(&err);
    }
}

#[cfg(feature = "cli")]
fn convert(cli: Cli) -> GridResult<()> {
    let input = read_input(cli.input_file.as_deref())?;

    let grid_options = GridOptions {
        pad_short_rows: cli.pad || cli.strict,
        ..if cli.strict {
            GridOptions::strict()
        } else {
            GridOptions::default()
        }
    };

    let table = normalize_html_table(&input, &grid_options)?;
    let diagnostics = &table.diagnostics;

    // Print diagnostics to stderr (unless quiet mode)
    if !cli.quiet && !diagnostics.is_empty() {
        print_diagnostics_to_stderr(diagnostics, !cli.no_color);
    }

    // Check strict mode
    if diagnostics.fails(cli.strict) {
        eprintln!(
            "Error: {} structural warning(s) in strict mode",
            diagnostics.warnings
        );
        std::process::exit(1);
    }

    let result = match cli.format {
        Format::Wordml => {
            let options = WordmlOptions {
                pretty: cli.pretty,
                table_style: cli.style.clone(),
                grid_col_width: cli.col_width,
                declare_namespace: cli.standalone,
            };
            render_table(&table, &options)
        }
        Format::Grid => describe_grid(&table),
        Format::Json => to_json(&table, cli.pretty)?,
    };

    // Output
    match cli.output {
        Some(path) => {
            let mut file = fs::File::create(&path)?;
            writeln!(file, "{}", result.trim_end())?;
            if diagnostics.has_warnings() {
                eprintln!(
                    "⚠ Output written to: {} ({} warning(s))",
                    path, diagnostics.warnings
                );
            } else {
                eprintln!("✓ Output written to: {}", path);
            }
        }
        None => {
            println!("{}", result.trim_end());
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn handle_subcommand(cmd: Commands) -> GridResult<()> {
    match cmd {
        Commands::Check {
            input,
            no_color,
            strict,
        } => {
            let content = read_input(input.as_deref())?;
            let options = if strict {
                GridOptions::strict()
            } else {
                GridOptions::default()
            };

            let table = normalize_html_table(&content, &options)?;
            println!(
                "{} row(s), {} column(s)",
                table.rows.len(),
                table.column_count
            );
            println!("{}", format_diagnostics(&table.diagnostics, !no_color));
            if table.diagnostics.fails(strict) {
                std::process::exit(1);
            }
        }

        Commands::Info => {
            println!("h2w - HTML table spans to WordprocessingML merge markers");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Features:");
            println!("  ✓ rowspan → w:vMerge restart/continue cells");
            println!("  ✓ colspan → w:gridSpan");
            println!("  ✓ Combined spans and overlapping spans");
            println!("  ✓ Browser span clamping (colspan ≤ 1000, rowspan ≤ 65534, rowspan=0)");
            println!("  ✓ Diagnostics for short rows and truncated runs");
            println!();
            println!("Output formats: wordml, grid, json");
            println!();
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn read_input(path: Option<&str>) -> GridResult<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(feature = "cli")]
fn exit_with_error(err: &GridError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}

/// One line per row: `"text"` origins, `^` continuations, `.` vacant cells
#[cfg(feature = "cli")]
fn describe_grid(table: &NormalizedTable<MarkupCell>) -> String {
    let mut out = format!(
        "{} row(s), {} column(s)\n",
        table.rows.len(),
        table.column_count
    );
    for row in &table.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| {
                let cols = cell.columns();
                let span = if cols.len() > 1 {
                    format!("{}-{}", cols.start, cols.end - 1)
                } else {
                    cols.start.to_string()
                };
                match cell {
                    OutputCell::Origin {
                        content,
                        vertical_merge_restart,
                        ..
                    } => {
                        let marker = if *vertical_merge_restart { " restart" } else { "" };
                        format!("{:?} @{}{}", content.text, span, marker)
                    }
                    OutputCell::Continuation { .. } => format!("^ @{}", span),
                    OutputCell::Vacant { .. } => format!(". @{}", span),
                }
            })
            .collect();
        out.push_str(&format!("row {}: {}\n", row.index, cells.join(" | ")));
    }
    out
}

#[cfg(feature = "cli")]
fn to_json(table: &NormalizedTable<MarkupCell>, pretty: bool) -> GridResult<String> {
    let value = serde_json::json!({
        "column_count": table.column_count,
        "rows": table.rows,
        "diagnostics": table.diagnostics.diagnostics,
    });
    let result = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    result.map_err(|err| GridError::IoError {
        message: err.to_string(),
    })
}

/// Print diagnostics to stderr with optional color coding
#[cfg(feature = "cli")]
fn print_diagnostics_to_stderr(diagnostics: &CheckResult, use_color: bool) {
    eprintln!();
    eprintln!(
        "{}Structural Warnings ({}):{}",
        if use_color { "\x1b[33m" } else { "" },
        diagnostics.len(),
        if use_color { "\x1b[0m" } else { "" }
    );
    eprintln!();

    for diag in &diagnostics.diagnostics {
        let color = if use_color { "\x1b[33m" } else { "" };
        let reset = if use_color { "\x1b[0m" } else { "" };

        match (diag.row, diag.column) {
            (Some(row), Some(col)) => eprintln!(
                "  {}[{}]{} row {}, column {}: {}",
                color,
                diag.kind,
                reset,
                row + 1,
                col + 1,
                diag.message
            ),
            (Some(row), None) => eprintln!(
                "  {}[{}]{} row {}: {}",
                color,
                diag.kind,
                reset,
                row + 1,
                diag.message
            ),
            _ => eprintln!("  {}[{}]{} {}", color, diag.kind, reset, diag.message),
        }
    }
    eprintln!();
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install tabspan --features cli");
    eprintln!("  h2w [OPTIONS] [INPUT_FILE]");
}
