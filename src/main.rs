use anyhow::{Context, Result};
use clap::Parser;
use csvfile::{CsvFile, FieldKind, MappedRow, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::{self, Write};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Print the rows of a CSV file, stream or URL")]
struct Args {
    /// File path, http(s) URL, or `-` for stdin
    source: String,
    /// One JSON object per row
    #[arg(long)]
    json: bool,
    /// Plain field lists, no header mapping
    #[arg(long, conflicts_with = "json")]
    raw: bool,
    /// Discard the first line before reading rows
    #[arg(long)]
    skip_header: bool,
    /// Header names to use instead of the first line
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,
    /// Columns to read as typed values, e.g. `qty:int,price:double`
    #[arg(long, value_delimiter = ',', value_parser = parse_typed_column)]
    types: Vec<(String, FieldKind)>,
}

/// `NAME:KIND` → (name, kind); the kind goes through `FieldKind::from_str`.
fn parse_typed_column(s: &str) -> Result<(String, FieldKind)> {
    let (name, kind) = s
        .split_once(':')
        .with_context(|| format!("expected NAME:KIND, got {:?}", s))?;
    Ok((name.trim().to_string(), kind.parse()?))
}

fn open(source: &str) -> Result<CsvFile> {
    if source == "-" {
        return Ok(CsvFile::from_reader(io::stdin()));
    }
    if source.starts_with("http://") || source.starts_with("https://") {
        return CsvFile::from_url(source).with_context(|| format!("fetching {}", source));
    }
    CsvFile::open(source).with_context(|| format!("opening {}", source))
}

/// A row with every field read as its requested kind, strings otherwise.
struct TypedRow(Vec<(String, Value)>);

impl TypedRow {
    fn from_row(row: &MappedRow, types: &[(String, FieldKind)]) -> Result<Self> {
        let fields = row
            .keys()
            .map(|name| {
                let kind = types
                    .iter()
                    .find(|(n, _)| n == name)
                    .map_or(FieldKind::String, |(_, k)| *k);
                let value = row
                    .get(name, kind)
                    .with_context(|| format!("reading column {}", name))?;
                Ok((name.to_string(), value))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TypedRow(fields))
    }

    fn to_text(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{} = {}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Serialize for TypedRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging (stderr, so stdout only carries rows) ───────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    // ─── 2) open the source ─────────────────────────────────────────
    let args = Args::parse();
    debug!(?args, "parsed arguments");
    let mut file = open(&args.source)?;

    if args.skip_header && !file.skip_first_line() {
        info!("no valid header line to skip");
    }

    // ─── 3) stream rows to stdout ────────────────────────────────────
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0usize;

    if args.raw {
        for row in file.rows() {
            writeln!(out, "{}", row.join(" | "))?;
            count += 1;
        }
    } else {
        let rows = match &args.columns {
            Some(columns) => file.mapped_rows(columns),
            None => file.mapped_first_line_rows(),
        };
        for row in rows {
            let typed = TypedRow::from_row(&row, &args.types)
                .with_context(|| format!("row {}", count + 1))?;
            if args.json {
                serde_json::to_writer(&mut out, &typed)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", typed.to_text())?;
            }
            count += 1;
        }
    }
    out.flush()?;

    // ─── 4) release ──────────────────────────────────────────────────
    file.close();
    info!(rows = count, source = %args.source, "done");
    Ok(())
}
