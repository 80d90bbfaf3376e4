use crate::error::{CoreError, Result};
use crate::index::{Corpus, MovieRecord};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Outcome of parsing one structured attribute cell (`cast`, `crew`, `genres`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellNames {
    Parsed(Vec<String>),
    Empty,
}

impl CellNames {
    pub fn joined(&self) -> String {
        match self {
            CellNames::Parsed(names) => names.join(" "),
            CellNames::Empty => String::new(),
        }
    }
}

/// Extract every `name` from a list of objects, with whitespace removed so each name is one token.
/// Accepts JSON and Python-literal lists. A cell that does not parse, or that holds any entry
/// without a string `name`, is `Empty` as a whole.
pub fn parse_names(cell: &str) -> CellNames {
    let cell = cell.trim();
    if cell.is_empty() || cell == "[]" {
        return CellNames::Empty;
    }
    let parsed: Option<Vec<Value>> = serde_json::from_str(cell)
        .ok()
        .or_else(|| python_literal_to_json(cell).and_then(|j| serde_json::from_str(&j).ok()));
    let Some(entries) = parsed else { return CellNames::Empty };
    let names: Option<Vec<String>> = entries
        .iter()
        .map(|e| e.get("name").and_then(Value::as_str))
        .map(|n| n.map(|n| n.chars().filter(|c| !c.is_whitespace()).collect()))
        .collect();
    match names {
        Some(names) if !names.is_empty() => CellNames::Parsed(names),
        _ => CellNames::Empty,
    }
}

/// Rewrite a Python literal (single-quoted strings, `None`, `True`, `False`) as JSON text.
fn python_literal_to_json(src: &str) -> Option<String> {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let mut s = String::new();
                loop {
                    match chars.next()? {
                        '\\' => match chars.next()? {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            'r' => s.push('\r'),
                            'x' => s.push(hex_escape(&mut chars, 2)?),
                            'u' => s.push(hex_escape(&mut chars, 4)?),
                            'U' => s.push(hex_escape(&mut chars, 8)?),
                            other => s.push(other),
                        },
                        q if q == c => break,
                        other => s.push(other),
                    }
                }
                out.push_str(&serde_json::to_string(&s).ok()?);
            }
            c if c.is_ascii_alphabetic() => {
                let mut word = String::from(c);
                while let Some(&n) = chars.peek() {
                    if !n.is_ascii_alphanumeric() && n != '_' { break; }
                    word.push(n);
                    chars.next();
                }
                match word.as_str() {
                    "None" => out.push_str("null"),
                    "True" => out.push_str("true"),
                    "False" => out.push_str("false"),
                    _ => return None,
                }
            }
            other => out.push(other),
        }
    }
    Some(out)
}

/// Decode the `digits` hex characters of a `\x`, `\u` or `\U` escape.
fn hex_escape<I: Iterator<Item = char>>(chars: &mut I, digits: usize) -> Option<char> {
    let hex: String = chars.take(digits).collect();
    if hex.len() != digits {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
}

struct Columns {
    width: usize,
    title: usize,
    cast: Option<usize>,
    crew: Option<usize>,
    genres: Option<usize>,
    overview: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let title = find("title")
            .ok_or_else(|| CoreError::InvalidArgument("dataset has no `title` column".into()))?;
        Ok(Self {
            width: headers.len(),
            title,
            cast: find("cast"),
            crew: find("crew"),
            genres: find("genres"),
            overview: find("overview"),
        })
    }
}

/// Build the tag string for one row. Empty components still contribute their separator.
pub fn build_tags(cast: &CellNames, crew: &CellNames, genres: &CellNames, overview: &str) -> String {
    format!("{} {} {} {}", cast.joined(), crew.joined(), genres.joined(), overview).to_lowercase()
}

fn record_from_row(row: &csv::StringRecord, cols: &Columns) -> MovieRecord {
    let field = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("");
    let names = |idx: Option<usize>| parse_names(field(idx));
    let tags = build_tags(&names(cols.cast), &names(cols.crew), &names(cols.genres), field(cols.overview));
    MovieRecord { title: field(Some(cols.title)).to_string(), tags }
}

/// Read a quoted CSV movie table into a corpus.
///
/// Rows with more fields than the header or that fail to decode are skipped; short rows
/// are padded with empty values. Bad attribute cells degrade to empty tags, never drop rows.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Corpus> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quote(b'"')
        .from_reader(reader);
    let cols = Columns::from_headers(rdr.headers()?)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in rdr.records() {
        match row {
            Ok(row) if row.len() <= cols.width => records.push(record_from_row(&row, &cols)),
            Ok(_) => skipped += 1,
            Err(e) => {
                tracing::debug!(error = %e, "skipping malformed row");
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "skipped malformed dataset rows");
    }
    tracing::info!(num_movies = records.len(), "loaded dataset");
    Ok(Corpus::new(records))
}

pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Corpus> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(CoreError::DatasetNotFound { path: path.to_path_buf() });
    }
    let f = std::fs::File::open(path)?;
    load_from_reader(std::io::BufReader::new(f))
}
