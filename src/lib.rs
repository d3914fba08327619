#![warn(missing_docs)]
//! Turbulent dissipation along a CTD transect from Thorpe-scale overturns.
//!
//! Casts are screened and run through an overturn detector, the diagnostics are resampled onto a
//! common meters-above-bottom axis and gathered into one table per variable with a column per
//! station. After cleaning, the dissipation is filled with a background rate where water was
//! sampled, averaged in longitude bins, and written out for the transect figure.

//
// API
//
pub use crate::analysis::{core_mean_profile, MeanProfile};
pub use crate::assemble::{Transect, TransectBuilder};
pub use crate::background::fill_background;
pub use crate::binning::{bin_table, BinnedTable, LongitudeBins};
pub use crate::cast::{Cast, StationInfo};
pub use crate::config::{BinConfig, FigureConfig, OverturnConfig, QualityConfig, TransectConfig};
pub use crate::error::{AnalysisError, Result};
pub use crate::figure::{
    cell_edges, contour_segments, log_fraction, render_figure, render_figures, FigureData,
    FigureKind, Segment,
};
pub use crate::interpolation::{nearest_interpolate, NearestInterpolator};
pub use crate::keys::Variable;
pub use crate::loader::{casts_from_reader, load_casts};
pub use crate::normalize::{meters_above_bottom, normalize_cast, MabAxis, NormalizedCast};
pub use crate::output::{
    publish_copy, read_binned_csv, read_table, write_binned, write_mean_profile_npz,
    write_station_tables, write_table, write_table_csv, BINNED_DISSIPATION_FILE,
    BINNED_NEUTRAL_DENSITY_FILE, MEAN_PROFILE_FILE,
};
pub use crate::overturn::{eps_overturn, Diagnostics, Overturn, OverturnParams};
pub use crate::pipeline::{process, run, write_outputs, OutputPaths, PipelineOutput, Processed};
pub use crate::points::{points_from_reader, read_point_estimates, PointEstimate};
pub use crate::quality::{clean_thorpe_scales, screen_cast, Rejection};
pub use crate::table::{StationTable, StationTableBuilder};

pub mod seawater;

//
// Internal use only
//
mod analysis;
mod assemble;
mod background;
mod binning;
mod cast;
mod config;
mod error;
mod figure;
mod interpolation;
mod keys;
mod loader;
mod normalize;
mod output;
mod overturn;
mod pipeline;
mod points;
mod quality;
mod table;
mod utility;
