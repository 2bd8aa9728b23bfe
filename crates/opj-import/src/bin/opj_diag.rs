use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use opj_import::{OriginFile, ParseOptions, ParseStatus};
use opj_model::{NodeKind, ProjectTree};

#[derive(Debug)]
struct Args {
    path: PathBuf,
    codepage: u16,
    json: bool,
    show_log: bool,
}

fn invalid(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message.into())
}

fn parse_codepage(value: &str) -> Result<u16, io::Error> {
    value
        .parse()
        .map_err(|_| invalid(format!("invalid --codepage value: {value}")))
}

impl Args {
    fn parse() -> Result<Self, io::Error> {
        let mut path: Option<PathBuf> = None;
        let mut codepage = opj_import::DEFAULT_CODEPAGE;
        let mut json = false;
        let mut show_log = false;

        let mut it = env::args().skip(1);
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                "--codepage" => {
                    let value = it.next().ok_or_else(|| invalid("--codepage expects <n>"))?;
                    codepage = parse_codepage(&value)?;
                }
                "--json" => json = true,
                "--log" => show_log = true,
                _ if arg.starts_with("--codepage=") => {
                    codepage = parse_codepage(&arg["--codepage=".len()..])?;
                }
                _ if arg.starts_with('-') => {
                    return Err(invalid(format!("unknown option: {arg}")));
                }
                _ => {
                    if path.is_some() {
                        return Err(invalid(format!("unexpected argument: {arg}")));
                    }
                    path = Some(PathBuf::from(arg));
                }
            }
        }

        let path = path.ok_or_else(|| invalid("missing <path>"))?;
        Ok(Self {
            path,
            codepage,
            json,
            show_log,
        })
    }
}

fn print_usage() {
    println!(
        "\
opj-diag: summarize what the importer recovers from an Origin project file

Usage:
  opj-diag <path.opj> [--codepage <n>] [--json] [--log]

Options:
  --codepage <n>   Windows codepage of 8-bit strings (default 1252)
  --json           Print the decoded project as JSON instead of a summary
  --log            Also print the import diagnostics log
"
    );
}

fn kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Folder => "folder",
        NodeKind::SpreadSheet => "spreadsheet",
        NodeKind::Matrix => "matrix",
        NodeKind::Excel => "excel",
        NodeKind::Graph => "graph",
        NodeKind::Note => "note",
    }
}

fn write_tree(out: &mut impl Write, tree: &ProjectTree) -> io::Result<()> {
    let root = tree.get(tree.root()).map_or("", |n| n.name.as_str());
    writeln!(out, "tree: {}", if root.is_empty() { "<project>" } else { root })?;
    for (id, depth) in tree.walk() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        writeln!(
            out,
            "  {:indent$}{} [{}]{}",
            "",
            node.name,
            kind_label(node.kind),
            if node.hidden { " (hidden)" } else { "" },
            indent = depth * 2
        )?;
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, file: &OriginFile) -> io::Result<()> {
    writeln!(out, "{}", file.format_version().describe())?;
    writeln!(out, "datasets:     {}", file.dataset_count())?;
    writeln!(out, "spreadsheets: {}", file.spread_count())?;
    writeln!(out, "matrices:     {}", file.matrix_count())?;
    writeln!(out, "excels:       {}", file.excel_count())?;
    writeln!(out, "functions:    {}", file.function_count())?;
    writeln!(out, "graphs:       {}", file.graph_count())?;
    writeln!(out, "notes:        {}", file.note_count())?;
    writeln!(out, "parameters:   {}", file.parameters().len())?;
    match file.status() {
        ParseStatus::Complete => writeln!(out, "status: complete")?,
        ParseStatus::Partial { errors } => {
            writeln!(out, "status: partial ({} sections skipped)", errors.len())?;
            for err in errors {
                writeln!(out, "  {err}")?;
            }
        }
    }
    write_tree(out, file.project())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse()?;
    let file = OriginFile::open_with_options(
        &args.path,
        ParseOptions {
            codepage: args.codepage,
        },
    )?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &file.result().project)?;
        writeln!(out)?;
    } else {
        write_summary(&mut out, &file)?;
    }
    if args.show_log {
        write!(out, "{}", file.results_log())?;
    }
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("opj-diag: {err}");
        std::process::exit(1);
    }
}
