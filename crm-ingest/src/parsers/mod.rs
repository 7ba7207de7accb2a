pub mod currencies;
pub mod dates;
pub mod payments;
pub mod rates;

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;

/// Open a CSV export for one of the `read_*` functions
pub(crate) fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("opening {}", path.display()))
}

pub(crate) fn reader<R: std::io::Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr)
}
