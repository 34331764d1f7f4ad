//! Purpose: Load the film catalog CSV into an immutable in-memory table.
//! Exports: `Film`, `Table`, `TableStats`, `REQUIRED_COLUMNS`.
//! Role: One-shot loader; the table never changes after construction.
//! Invariants: Missing file or missing required columns abort the load.
//! Invariants: Per-row decode or parse failures never abort the load; bad
//! cells become `None` and undecodable rows are skipped with a warning.

use std::path::Path;

use time::format_description::BorrowedFormatItem;
use time::Date;

use crate::core::error::{Error, ErrorKind};

pub const REQUIRED_COLUMNS: [&str; 9] = [
    "title",
    "release_date",
    "popularity",
    "vote_count",
    "vote_average",
    "budget",
    "revenue",
    "return",
    "production_companies_names",
];

const ISO_DATE: &[BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");
const SLASH_DATE: &[BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]/[month]/[day]");

/// One catalog row. Numeric fields are `None` when the source cell is empty
/// or unparseable; absent values never participate in matches or sums.
#[derive(Clone, Debug, PartialEq)]
pub struct Film {
    pub title: String,
    pub release_date: Option<Date>,
    pub popularity: Option<f64>,
    pub vote_count: Option<i64>,
    pub vote_average: Option<f64>,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub return_ratio: Option<f64>,
    pub production_companies: String,
}

/// Ordered, immutable film table loaded once at process start.
#[derive(Clone, Debug)]
pub struct Table {
    pub(crate) films: Vec<Film>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TableStats {
    pub rows: usize,
    pub dated: usize,
}

struct Columns {
    title: usize,
    release_date: usize,
    popularity: usize,
    vote_count: usize,
    vote_average: usize,
    budget: usize,
    revenue: usize,
    return_ratio: usize,
    production_companies: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord, path: &Path) -> Result<Self, Error> {
        // Field order must match REQUIRED_COLUMNS.
        let mut indexes = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in indexes.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| {
                    Error::new(ErrorKind::Schema)
                        .with_message("dataset is missing a required column")
                        .with_path(path)
                        .with_column(name)
                        .with_hint("Check that the CSV header row matches the catalog schema.")
                })?;
        }
        let [title, release_date, popularity, vote_count, vote_average, budget, revenue, return_ratio, production_companies] =
            indexes;
        Ok(Self {
            title,
            release_date,
            popularity,
            vote_count,
            vote_average,
            budget,
            revenue,
            return_ratio,
            production_companies,
        })
    }
}

impl Table {
    /// Read the catalog CSV at `path`. Fatal only when the file is unreadable
    /// or a required column is absent from the header row.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|err| {
                let (kind, message) = match err.kind() {
                    csv::ErrorKind::Io(io_err)
                        if io_err.kind() == std::io::ErrorKind::NotFound =>
                    {
                        (ErrorKind::NotFound, "dataset not found")
                    }
                    _ => (ErrorKind::Io, "failed to open dataset"),
                };
                Error::new(kind)
                    .with_message(message)
                    .with_path(path)
                    .with_source(err)
            })?;

        let headers = reader
            .headers()
            .map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read dataset header row")
                    .with_path(path)
                    .with_source(err)
            })?
            .clone();
        let columns = Columns::resolve(&headers, path)?;

        let mut films = Vec::new();
        let mut skipped: u64 = 0;
        for (row, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!(row, error = %err, "skipping undecodable row");
                    skipped += 1;
                    continue;
                }
            };
            films.push(film_from_record(&record, &columns));
        }

        let table = Table { films };
        let stats = table.stats();
        tracing::info!(
            path = %path.display(),
            rows = stats.rows,
            dated = stats.dated,
            skipped,
            "loaded film catalog"
        );
        Ok(table)
    }

    /// Build a table directly from records, preserving their order.
    pub fn from_films(films: Vec<Film>) -> Self {
        Self { films }
    }

    pub fn films(&self) -> &[Film] {
        &self.films
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            rows: self.films.len(),
            dated: self
                .films
                .iter()
                .filter(|film| film.release_date.is_some())
                .count(),
        }
    }
}

fn film_from_record(record: &csv::StringRecord, columns: &Columns) -> Film {
    let field = |index: usize| record.get(index).unwrap_or("");
    Film {
        title: field(columns.title).to_string(),
        release_date: parse_release_date(field(columns.release_date)),
        popularity: parse_number(field(columns.popularity)),
        vote_count: parse_count(field(columns.vote_count)),
        vote_average: parse_number(field(columns.vote_average)),
        budget: parse_number(field(columns.budget)),
        revenue: parse_number(field(columns.revenue)),
        return_ratio: parse_number(field(columns.return_ratio)),
        production_companies: field(columns.production_companies).to_string(),
    }
}

/// Tolerant date parsing: `YYYY-MM-DD` with a `YYYY/MM/DD` fallback; a
/// trailing time-of-day component is ignored. Anything else is absent.
fn parse_release_date(raw: &str) -> Option<Date> {
    let raw = raw.split_whitespace().next()?;
    Date::parse(raw, ISO_DATE)
        .or_else(|_| Date::parse(raw, SLASH_DATE))
        .ok()
}

fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_count(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<i64>()
        .ok()
        .or_else(|| parse_number(raw).map(|value| value as i64))
}
