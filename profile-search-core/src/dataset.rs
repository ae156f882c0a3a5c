use crate::record::{Profile, ProfileLayout};
use profile_search_common::{ColumnMap, DatasetConfig, ProfileSearchError, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

// cells matching one of these are read as missing, same set pandas treats as NaN
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Null => serializer.serialize_none(),
            Cell::Int(v) => serializer.serialize_i64(*v),
            Cell::Float(v) => serializer.serialize_f64(*v),
            Cell::Text(s) => serializer.serialize_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Float,
    Text,
}

pub fn is_na(raw: &str) -> bool {
    NA_MARKERS.contains(&raw)
}

/// narrowest kind every non-missing value in the column parses as
pub fn infer_kind<'a>(values: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut kind = ColumnKind::Int;
    for v in values.filter(|v| !is_na(v)) {
        let v = v.trim();
        if kind == ColumnKind::Int && v.parse::<i64>().is_err() {
            kind = ColumnKind::Float;
        }
        if kind == ColumnKind::Float && v.parse::<f64>().is_err() {
            return ColumnKind::Text;
        }
    }
    kind
}

fn to_cell(raw: &str, kind: ColumnKind) -> Cell {
    if is_na(raw) {
        return Cell::Null;
    }
    match kind {
        ColumnKind::Int => raw.trim().parse().map(Cell::Int).unwrap_or_else(|_| Cell::Text(raw.to_owned())),
        ColumnKind::Float => raw.trim().parse().map(Cell::Float).unwrap_or_else(|_| Cell::Text(raw.to_owned())),
        ColumnKind::Text => Cell::Text(raw.to_owned()),
    }
}

/// One dataset record. Serializes as a JSON object keyed by the source headers, in source order.
#[derive(Debug, Clone)]
pub struct Row {
    headers: Arc<[String]>,
    cells: Vec<Cell>,
    raw: Vec<String>,
    profile: Profile,
}

impl Row {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.cells.get(idx)
    }

    /// source text of every non-missing cell
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cells
            .iter()
            .zip(&self.raw)
            .filter(|(c, _)| !c.is_null())
            .map(|(_, r)| r.as_str())
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (h, c) in self.headers.iter().zip(&self.cells) {
            map.serialize_entry(h, c)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub columns: ColumnMap,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',', columns: ColumnMap::default() }
    }
}

impl TryFrom<&DatasetConfig> for LoadOptions {
    type Error = ProfileSearchError;
    fn try_from(cfg: &DatasetConfig) -> Result<Self> {
        let delimiter = u8::try_from(cfg.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| ProfileSearchError::Config(format!("delimiter must be ASCII, got {:?}", cfg.delimiter)))?;
        Ok(Self { delimiter, columns: cfg.columns.clone() })
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Arc<[String]>,
    kinds: Vec<ColumnKind>,
    columns: ColumnMap,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn from_reader<R: Read>(reader: R, opts: &LoadOptions) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(opts.delimiter)
            .has_headers(true)
            .from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_owned()).collect();
        let mut records: Vec<csv::StringRecord> = Vec::new();
        for rec in rdr.records() {
            records.push(rec?); // ragged rows fail the whole load
        }
        let kinds: Vec<ColumnKind> = (0..headers.len())
            .map(|i| infer_kind(records.iter().filter_map(|r| r.get(i))))
            .collect();
        for (h, k) in headers.iter().zip(&kinds) {
            debug!(column = %h, kind = ?k, "inferred column kind");
        }
        let layout = ProfileLayout::new(&headers, &opts.columns);
        let headers: Arc<[String]> = headers.into();
        let rows = records
            .iter()
            .map(|rec| {
                let raw: Vec<String> = rec.iter().map(str::to_owned).collect();
                let cells: Vec<Cell> = raw.iter().zip(&kinds).map(|(r, k)| to_cell(r, *k)).collect();
                let profile = layout.extract(&cells, &raw);
                Row { headers: Arc::clone(&headers), cells, raw, profile }
            })
            .collect();
        Ok(Self { headers, kinds, columns: opts.columns.clone(), rows })
    }

    pub fn load_csv(path: &Path, opts: &LoadOptions) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let ds = Self::from_reader(file, opts)?;
        info!(path = %path.display(), rows = ds.len(), columns = ds.headers.len(), "dataset loaded");
        Ok(ds)
    }
}
