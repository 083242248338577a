pub mod cities;
pub mod client;
pub mod error;
pub mod fallback;

use crate::extract::error::ExtractError;
use crate::types::raw_row::RawRow;

/// Outcome of extracting one city.
///
/// Both variants carry rows tagged with the city slug, so the pipeline can
/// always continue. `Fallback` additionally says why live data was not used.
#[derive(Debug)]
pub enum Extraction {
    /// Rows decoded from the forecast API.
    Live(Vec<RawRow>),
    /// Synthetic rows from [`fallback::fallback_series`].
    Fallback {
        rows: Vec<RawRow>,
        reason: ExtractError,
    },
}

impl Extraction {
    pub fn rows(&self) -> &[RawRow] {
        match self {
            Extraction::Live(rows) | Extraction::Fallback { rows, .. } => rows,
        }
    }

    pub fn into_rows(self) -> Vec<RawRow> {
        match self {
            Extraction::Live(rows) | Extraction::Fallback { rows, .. } => rows,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Extraction::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&ExtractError> {
        match self {
            Extraction::Live(_) => None,
            Extraction::Fallback { reason, .. } => Some(reason),
        }
    }
}
