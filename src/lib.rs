#![warn(missing_docs)]
//! Interactive viewers for upper air soundings and tropical cyclone tracks.
//!
//! Soundings come from the University of Wyoming upper air archive. Each one is analyzed for the
//! usual parcel and wind quantities and drawn as a skew-T with a hodograph and a text panel.
//! Tropical cyclone tracks come from the HURDAT2 and IBTrACS archives and are drawn on a map
//! colored by intensity.

//
// API
//
pub use crate::{
    analysis::{format_quantity, round_to_tenth, Analysis, PanelEntry},
    error::{Error, Result},
    indexes::precipitable_water,
    interpolation::{
        linear_interpolate, linear_interpolate_sounding, linear_interpolate_sounding_at_height,
    },
    layers::{layer_agl, Layer},
    levels::{height_level, height_level_agl, Level},
    parcel::{mixed_layer_parcel, most_unstable_parcel, surface_parcel, Parcel},
    parcel_profile::{lift_parcel, parcel_trajectory, ParcelAscentAnalysis},
    prompt::Prompt,
    sounding::{DataRow, Sounding, StationInfo},
    viewer::{CycloneViewer, SoundingViewer, ViewerOptions},
    wind::{bulk_shear, wind_components},
    wyoming::{parse_valid_time, UpperAirSource, WyomingUpperAir},
};

pub mod render;
pub mod tracks;
pub mod wyoming;

#[doc(hidden)]
pub use crate::sounding::doctest;

//
// Internal use only
//
mod analysis;
mod error;
mod indexes;
mod interpolation;
mod layers;
mod levels;
mod parcel;
mod parcel_profile;
mod prompt;
mod sounding;
mod viewer;
mod wind;
