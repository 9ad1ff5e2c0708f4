use std::collections::HashMap;
use std::time::Instant;

use crate::error::Result;
use crate::observability::metrics;

/// One data row keyed by header name.
///
/// Header names are folded before lookup (ASCII lowercase, punctuation and
/// whitespace dropped) so `LOCATION_NAME`, `locationName` and `Location Name`
/// address the same field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

/// Fold a header name into its lookup key
pub fn header_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl RawRow {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (header_key(k.as_ref()), v.into()))
            .collect();
        Self { fields }
    }

    /// Value of a field, whatever the casing of its header
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(&header_key(name)).map(|s| s.as_str())
    }

    /// First alias that is present with a non-blank value
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|n| self.get(n))
            .find(|v| !v.trim().is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|v| v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Turns raw dataset bytes into header-keyed rows
pub trait Parser {
    fn parse(&self, input: &[u8]) -> Result<Vec<RawRow>>;
}

/// A wrapper that adds metrics to any parser implementation
pub struct MetricsParser<P: Parser> {
    inner: P,
}

impl<P: Parser> MetricsParser<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: Parser> Parser for MetricsParser<P> {
    fn parse(&self, input: &[u8]) -> Result<Vec<RawRow>> {
        let start_time = Instant::now();

        match self.inner.parse(input) {
            Ok(rows) => {
                metrics::parser::parse_success();
                metrics::parser::rows_extracted(rows.len() as u64);
                metrics::parser::duration(start_time.elapsed().as_secs_f64());
                Ok(rows)
            }
            Err(e) => {
                metrics::parser::parse_error();
                metrics::parser::duration(start_time.elapsed().as_secs_f64());
                Err(e)
            }
        }
    }
}

/// Delimited text with a header row. Short rows just lack the trailing fields;
/// blank lines and rows with only empty cells are skipped. Fields must be
/// valid UTF-8, otherwise the whole input is rejected.
pub struct DelimitedTextParser {
    delimiter: u8,
}

impl DelimitedTextParser {
    pub fn csv() -> Self {
        Self { delimiter: b',' }
    }

    pub fn tsv() -> Self {
        Self { delimiter: b'\t' }
    }
}

impl Default for DelimitedTextParser {
    fn default() -> Self {
        Self::csv()
    }
}

impl Parser for DelimitedTextParser {
    fn parse(&self, input: &[u8]) -> Result<Vec<RawRow>> {
        use tracing::debug;
        debug!("DelimitedTextParser: start input_len={}", input.len());

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        let mut out = Vec::new();
        let mut skipped = 0usize;

        for result in reader.records() {
            let record = result?;
            let row = RawRow::from_pairs(headers.iter().zip(record.iter()));
            if row.is_blank() {
                skipped += 1;
                continue;
            }
            out.push(row);
        }

        debug!(
            "DelimitedTextParser: rows={} blank_skipped={} columns={}",
            out.len(),
            skipped,
            headers.len()
        );
        Ok(out)
    }
}

/// Parse CSV input with the default parser, recording parser metrics
pub fn parse_csv(input: impl AsRef<[u8]>) -> Result<Vec<RawRow>> {
    MetricsParser::new(DelimitedTextParser::csv()).parse(input.as_ref())
}
