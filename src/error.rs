//! Error types for the wx-viewer crate.
use chrono::NaiveDateTime;
use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Error type for the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A profile that is required for this analysis is missing.
    #[error("missing profile required for the analysis")]
    MissingProfile,
    /// A value (surface value, index, location, etc) that is required is not available.
    #[error("missing value required for analysis")]
    MissingValue,
    /// Not enough data available for anlaysis
    #[error("not enough data available for analysis")]
    NotEnoughData,
    /// There is no data available that meets the requirements.
    #[error("profile is full of missing values, cannot do analysis")]
    NoDataProfile,
    /// Bad or invalid input.
    #[error("invalid input")]
    InvalidInput,
    /// Missing data during interpolation, or it would have been extrapolation
    #[error("none value encountered during interpolation")]
    InterpolationError,
    /// A formula in the metfor crate could not produce a value.
    #[error("metfor could not compute a value")]
    MetForError,

    /// The HTTP request failed or returned an error status.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The upper-air service has no sounding for this station and time.
    #[error("no data available for {time} for station {station}")]
    NoSounding {
        /// Station identifier as entered.
        station: String,
        /// Requested valid time.
        time: NaiveDateTime,
    },
    /// A response or data file did not have the expected layout.
    #[error("unable to parse {what}: {detail}")]
    Parse {
        /// What was being parsed.
        what: &'static str,
        /// Details about the offending content.
        detail: String,
    },
    /// A date was not in DD-MM-YYYY format or does not exist.
    #[error("invalid date {0:?}, expected DD-MM-YYYY")]
    BadDate(String),
    /// A user entry could not be converted to the requested type.
    #[error("invalid entry {input:?}, expected {expected}")]
    BadInput {
        /// The raw text entered.
        input: String,
        /// Description of what was expected.
        expected: &'static str,
    },
    /// Forwarded IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Forwarded CSV error.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// No track dataset was loaded because the basin selection was not valid.
    #[error("no track dataset loaded, select a basin between 0 and 5")]
    NoDataset,
    /// No storm in the dataset has this name and year.
    #[error("could not find storm {name} in {year}")]
    StormNotFound {
        /// Storm name as entered.
        name: String,
        /// Season.
        year: i32,
    },
    /// More than one storm in the dataset has this name and year.
    #[error("multiple storms named {name} in {year}: {}", .ids.join(", "))]
    AmbiguousStorm {
        /// Storm name as entered.
        name: String,
        /// Season.
        year: i32,
        /// Identifiers of all the matching storms.
        ids: Vec<String>,
    },

    /// Drawing a figure failed.
    #[error("drawing failed: {0}")]
    Render(String),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, Error>;

impl<E> From<DrawingAreaErrorKind<E>> for Error
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Error::Render(err.to_string())
    }
}
