//! The complete processing run, from CTD casts to the derived data files.
use crate::{
    analysis::{core_mean_profile, MeanProfile},
    assemble::{Transect, TransectBuilder},
    background::fill_background,
    binning::{bin_table, BinnedTable, LongitudeBins},
    cast::Cast,
    config::TransectConfig,
    error::Result,
    keys::Variable,
    loader::load_casts,
    normalize::{normalize_cast, MabAxis, NormalizedCast},
    output::{
        publish_copy, write_binned, write_mean_profile_npz, write_station_tables,
        BINNED_DISSIPATION_FILE, BINNED_NEUTRAL_DENSITY_FILE, MEAN_PROFILE_FILE,
    },
    overturn::OverturnParams,
    quality::{clean_thorpe_scales, screen_cast, Rejection},
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where the results go.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    /// Directory for every table of this run.
    pub results: PathBuf,
    /// Shared directory receiving a copy of the binned dissipation table.
    pub derived: PathBuf,
}

/// The in-memory products of a run.
#[derive(Debug, Clone)]
pub struct Processed {
    /// Cleaned station tables, before any background fill.
    pub transect: Transect,
    /// Mean dissipation profile of the core stations.
    pub mean_profile: MeanProfile,
    /// Background filled dissipation averaged into longitude bins.
    pub binned_dissipation: BinnedTable,
    /// Neutral density averaged into the same bins.
    pub binned_neutral_density: BinnedTable,
    /// Stations left out, with the reason, in station order.
    pub rejected: Vec<(String, Rejection)>,
}

/// The products of a run and the files written.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Everything computed.
    pub processed: Processed,
    /// Every file written, in the order written.
    pub files: Vec<PathBuf>,
}

/// Screen and normalize one cast.
fn process_cast(
    cast: &Cast,
    params: &OverturnParams,
    cfg: &TransectConfig,
    axis: &MabAxis,
) -> std::result::Result<NormalizedCast, Rejection> {
    let diagnostics = screen_cast(cast, params, &cfg.quality)?;
    normalize_cast(cast, &diagnostics, axis)
        .map_err(|err| Rejection::DetectionFailed(err.to_string()))
}

/// Run the analysis on casts already in memory.
///
/// Stations are processed in parallel, but the result only depends on the casts and the
/// configuration, never on the order the stations finish in.
pub fn process(casts: &[Cast], cfg: &TransectConfig) -> Result<Processed> {
    let params = OverturnParams::from(&cfg.overturn);
    let axis = MabAxis::new(cfg.axis_length);

    let results: Vec<std::result::Result<NormalizedCast, Rejection>> = casts
        .par_iter()
        .map(|cast| process_cast(cast, &params, cfg, &axis))
        .collect();

    let mut builder = TransectBuilder::new(&axis);
    let mut rejected = vec![];
    for (cast, result) in casts.iter().zip(results) {
        match result {
            Ok(station) => builder.push(&station)?,
            Err(rejection) => {
                match rejection {
                    Rejection::Outlier => debug!(station = cast.id(), "{}", rejection),
                    Rejection::DetectionFailed(_) => warn!(station = cast.id(), "{}", rejection),
                    _ => info!(station = cast.id(), "{}", rejection),
                }
                rejected.push((cast.id().to_owned(), rejection));
            }
        }
    }

    let mut transect = builder.build();
    info!(
        stations = transect.n_stations(),
        rejected = rejected.len(),
        "assembled transect"
    );
    if transect.n_stations() == 0 {
        warn!("no station survived screening");
    }

    clean_thorpe_scales(&mut transect, cfg.quality.max_thorpe_length)?;

    let mean_profile = core_mean_profile(
        transect.table(Variable::Dissipation),
        transect.table(Variable::Temperature),
        cfg.core_longitudes,
        cfg.background_dissipation,
    )?;

    let filled = fill_background(
        transect.table(Variable::Dissipation),
        transect.table(Variable::NeutralDensity),
        cfg.background_dissipation,
    )?;
    let bins = LongitudeBins::from_config(&cfg.bins, transect.longitudes())?;
    let binned_dissipation = bin_table(&filled, &bins)?;
    let binned_neutral_density = bin_table(transect.table(Variable::NeutralDensity), &bins)?;

    Ok(Processed {
        transect,
        mean_profile,
        binned_dissipation,
        binned_neutral_density,
        rejected,
    })
}

/// Write every product of a run.
pub fn write_outputs(processed: &Processed, paths: &OutputPaths) -> Result<Vec<PathBuf>> {
    let mut files = write_station_tables(&processed.transect, &paths.results)?;

    let npz = paths.results.join(MEAN_PROFILE_FILE);
    write_mean_profile_npz(&processed.mean_profile, &npz)?;
    files.push(npz);

    let binned = write_binned(
        &processed.binned_dissipation,
        &paths.results,
        BINNED_DISSIPATION_FILE,
    )?;
    let copy = publish_copy(&binned, &paths.derived)?;
    files.push(binned);
    files.push(copy);

    files.push(write_binned(
        &processed.binned_neutral_density,
        &paths.results,
        BINNED_NEUTRAL_DENSITY_FILE,
    )?);

    for file in &files {
        info!("wrote {}", file.display());
    }
    Ok(files)
}

/// Load the casts in `input`, process them, and write the results.
pub fn run<P: AsRef<Path>>(
    cfg: &TransectConfig,
    input: P,
    paths: &OutputPaths,
) -> Result<PipelineOutput> {
    let input = input.as_ref();
    let casts = load_casts(input)?;
    info!(casts = casts.len(), "loaded {}", input.display());

    let processed = process(&casts, cfg)?;
    let files = write_outputs(&processed, paths)?;

    Ok(PipelineOutput { processed, files })
}
