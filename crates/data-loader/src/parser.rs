//! Parser for tabular movie metadata.
//!
//! The source is a CSV file with a header row. Only five columns matter:
//! title, genres, overview, popularity and vote_average. Everything else is
//! ignored. Bytes are decoded lossily so a stray Latin-1 character in an
//! overview never aborts a load.

use crate::error::{DataLoadError, Result};
use crate::types::{MovieRow, REQUIRED_COLUMNS};
use std::io::Read;

/// Cell values the original data tooling reads as "not available".
const NA_TOKENS: [&str; 17] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "<NA>", "#N/A",
    "#NA", "1.#IND", "1.#QNAN", "-1.#IND", "-1.#QNAN",
];

/// Counters gathered while parsing, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Data records read from the source (header excluded)
    pub records_read: usize,
    /// Records dropped because a required field was missing
    pub dropped_missing: usize,
    /// Numeric fields that failed coercion and were replaced by 0
    pub coerced_to_zero: usize,
}

/// Output of [`parse_movies_csv`]
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub rows: Vec<MovieRow>,
    pub stats: ParseStats,
}

/// Positions of the required columns in the header
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    title: usize,
    genres: usize,
    overview: usize,
    popularity: usize,
    vote_average: usize,
}

/// Parse CSV movie metadata, keeping at most `max_rows` complete rows.
///
/// Rows are dropped (not rejected) when any required field is missing, and
/// the cap is applied after dropping, so the result holds the first
/// `max_rows` complete rows in source order.
pub fn parse_movies_csv<R: Read>(reader: R, max_rows: usize) -> Result<ParsedTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .byte_headers()
        .map_err(|e| DataLoadError::Parse {
            line: 1,
            reason: e.to_string(),
        })?
        .clone();
    let columns = resolve_columns(&headers)?;

    let mut rows = Vec::new();
    let mut stats = ParseStats::default();

    for record in csv_reader.byte_records() {
        if rows.len() >= max_rows {
            break;
        }
        let record = record.map_err(|e| DataLoadError::Parse {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        stats.records_read += 1;

        let field =
            |i: usize| record.get(i).map(|bytes| String::from_utf8_lossy(bytes).into_owned());

        let (Some(title), Some(genres), Some(overview), Some(popularity), Some(vote_average)) = (
            present(field(columns.title)),
            present(field(columns.genres)),
            present(field(columns.overview)),
            present(field(columns.popularity)),
            present(field(columns.vote_average)),
        ) else {
            stats.dropped_missing += 1;
            continue;
        };

        let popularity = coerce_popularity(&popularity).unwrap_or_else(|| {
            stats.coerced_to_zero += 1;
            0.0
        });
        let vote_average = coerce_vote_average(&vote_average).unwrap_or_else(|| {
            stats.coerced_to_zero += 1;
            0.0
        });

        rows.push(MovieRow {
            title,
            genres,
            overview,
            popularity,
            vote_average,
        });
    }

    Ok(ParsedTable { rows, stats })
}

/// Find every required column, reporting all of the missing ones at once.
fn resolve_columns(headers: &csv::ByteRecord) -> Result<ColumnMap> {
    let names: Vec<String> = headers
        .iter()
        .map(|h| {
            String::from_utf8_lossy(h)
                .trim_start_matches('\u{feff}')
                .trim()
                .to_string()
        })
        .collect();

    let position = |name: &str| names.iter().position(|n| n == name);
    let found: Vec<Option<usize>> = REQUIRED_COLUMNS.iter().map(|c| position(c)).collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .zip(&found)
        .filter(|(_, pos)| pos.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataLoadError::Schema { missing });
    }

    match found[..] {
        [
            Some(title),
            Some(genres),
            Some(overview),
            Some(popularity),
            Some(vote_average),
        ] => Ok(ColumnMap {
            title,
            genres,
            overview,
            popularity,
            vote_average,
        }),
        _ => Err(DataLoadError::Schema { missing: Vec::new() }),
    }
}

/// `None` when a field is absent, blank or an NA token.
fn present(field: Option<String>) -> Option<String> {
    let value = field?;
    let trimmed = value.trim();
    if trimmed.is_empty() || NA_TOKENS.contains(&trimmed) {
        None
    } else {
        Some(value)
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Popularity must be a non-negative number.
fn coerce_popularity(s: &str) -> Option<f64> {
    parse_finite(s).filter(|v| *v >= 0.0)
}

/// Vote averages live on a 0-10 scale.
fn coerce_vote_average(s: &str) -> Option<f64> {
    parse_finite(s).filter(|v| (0.0..=10.0).contains(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "adult,title,genres,overview,popularity,vote_average,vote_count\n";

    fn parse(body: &str) -> Result<ParsedTable> {
        parse_movies_csv(format!("{HEADER}{body}").as_bytes(), 5000)
    }

    #[test]
    fn test_parses_required_columns_and_ignores_others() {
        let table = parse("False,Heat,Crime,A heist goes wrong,17.9,7.7,1886\n").unwrap();
        assert_eq!(table.rows.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.title, "Heat");
        assert_eq!(row.genres, "Crime");
        assert_eq!(row.popularity, 17.9);
        assert_eq!(row.vote_average, 7.7);
    }

    #[test]
    fn test_missing_columns_are_reported_together() {
        let err = parse_movies_csv("title,overview\nA,B\n".as_bytes(), 10).unwrap_err();
        match err {
            DataLoadError::Schema { missing } => {
                assert_eq!(missing, vec!["genres", "popularity", "vote_average"]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_rows_with_missing_fields_are_dropped() {
        let body = "\
False,Heat,Crime,,17.9,7.7,1
False,,Drama,Plot,1,1,1
False,Alien,Horror,NaN,1,1,1
False,Ronin,Action,Plot,2,6,1
False,Short,Action
";
        let table = parse(body).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].title, "Ronin");
        assert_eq!(table.stats.dropped_missing, 4);
        assert_eq!(table.stats.records_read, 5);
    }

    #[test]
    fn test_invalid_numbers_become_zero() {
        let body = "\
False,A,Drama,Plot,not-a-number,7.5,1
False,B,Drama,Plot,3.2,11,1
False,C,Drama,Plot,-4,inf,1
";
        let table = parse(body).unwrap();
        assert_eq!(table.rows[0].popularity, 0.0);
        assert_eq!(table.rows[0].vote_average, 7.5);
        assert_eq!(table.rows[1].vote_average, 0.0);
        assert_eq!(table.rows[2].popularity, 0.0);
        assert_eq!(table.rows[2].vote_average, 0.0);
        assert_eq!(table.stats.coerced_to_zero, 4);
    }

    #[test]
    fn test_cap_applies_after_dropping() {
        let body = "\
False,A,Drama,,1,1,1
False,B,Drama,Plot,1,1,1
False,C,Drama,Plot,1,1,1
False,D,Drama,Plot,1,1,1
";
        let table = parse_movies_csv(format!("{HEADER}{body}").as_bytes(), 2).unwrap();
        let titles: Vec<_> = table.rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C"]);
    }

    #[test]
    fn test_quoted_fields_and_bom_header() {
        let csv = "\u{feff}title,genres,overview,popularity,vote_average\n\
                   \"Crouching Tiger, Hidden Dragon\",\"[{'name': 'Action'}]\",\
                   \"Two warriors, one sword\",9.5,7.2\n";
        let table = parse_movies_csv(csv.as_bytes(), 10).unwrap();
        assert_eq!(table.rows[0].title, "Crouching Tiger, Hidden Dragon");
        assert_eq!(table.rows[0].genres, "[{'name': 'Action'}]");
    }
}
