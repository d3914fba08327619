//! Draw the binned dissipation transect.
//!
//! The binned dissipation is shown as coloured cells on a logarithmic scale, water mass boundaries
//! as contours of binned neutral density, and independent point estimates as circles coloured on
//! the same scale.
use crate::{
    binning::BinnedTable,
    config::FigureConfig,
    error::{AnalysisError, Result},
    interpolation::linear_interp,
    points::PointEstimate,
};
use plotters::{coord::Shift, prelude::*, style::colors::colormaps::ViridisRGB};
use std::{
    panic,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Everything drawn in the transect figure.
#[derive(Debug, Clone)]
pub struct FigureData {
    /// Binned dissipation rate.
    pub eps: BinnedTable,
    /// Binned neutral density, contoured at the water mass boundaries.
    pub boundaries: Option<BinnedTable>,
    /// Point estimates drawn over the cells.
    pub points: Vec<PointEstimate>,
}

/// Output format of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureKind {
    /// Bitmap image.
    Png,
    /// Vector image.
    Svg,
}

impl FigureKind {
    /// File extension of the format.
    pub fn extension(self) -> &'static str {
        match self {
            FigureKind::Png => "png",
            FigureKind::Svg => "svg",
        }
    }
}

/// A straight piece of a contour line in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// One end, (longitude, meters above bottom).
    pub start: (f64, f64),
    /// The other end.
    pub end: (f64, f64),
}

/// Position of `value` on a logarithmic scale from `vmin` to `vmax`, clamped to [0, 1].
pub fn log_fraction(value: f64, vmin: f64, vmax: f64) -> f64 {
    let (lo, hi) = (vmin.log10(), vmax.log10());
    ((value.log10() - lo) / (hi - lo)).max(0.0).min(1.0)
}

/// Cell edges for cells centred on `centres`. Inner edges are half way between centres, the
/// outer cells are as wide as their neighbour.
pub fn cell_edges(centres: &[f64]) -> Vec<f64> {
    match centres.len() {
        0 => vec![],
        1 => vec![centres[0] - 0.5, centres[0] + 0.5],
        n => {
            let mut edges = Vec::with_capacity(n + 1);
            edges.push(centres[0] - (centres[1] - centres[0]) / 2.0);
            edges.extend(centres.windows(2).map(|w| (w[0] + w[1]) / 2.0));
            edges.push(centres[n - 1] + (centres[n - 1] - centres[n - 2]) / 2.0);
            edges
        }
    }
}

/// Line segments of the `level` contour of a table, using rows up to `max_mab`.
///
/// Grid cells with a missing corner contribute nothing. Saddle cells are resolved with the mean of
/// their corners.
pub fn contour_segments(table: &BinnedTable, level: f64, max_mab: f64) -> Vec<Segment> {
    let xs = table.longitudes();
    let ys = table.mab();
    let mut segments = vec![];

    for row in 0..table.n_rows().saturating_sub(1) {
        if ys[row + 1] > max_mab {
            break;
        }
        for col in 0..xs.len().saturating_sub(1) {
            // Corners counter clockwise from the lower left
            let corners = [(col, row), (col + 1, row), (col + 1, row + 1), (col, row + 1)];
            let vals: Option<Vec<f64>> = corners
                .iter()
                .map(|&(c, r)| table.get(r, c).into_option())
                .collect();
            let vals = match vals {
                Some(vals) => vals,
                None => continue,
            };
            let pos: Vec<(f64, f64)> = corners.iter().map(|&(c, r)| (xs[c], ys[r])).collect();

            // Crossing on each edge, bottom, right, top, left.
            let crossings: Vec<Option<(f64, f64)>> = (0..4)
                .map(|i| {
                    let j = (i + 1) % 4;
                    if (vals[i] >= level) == (vals[j] >= level) {
                        return None;
                    }
                    Some((
                        linear_interp(level, vals[i], vals[j], pos[i].0, pos[j].0),
                        linear_interp(level, vals[i], vals[j], pos[i].1, pos[j].1),
                    ))
                })
                .collect();

            let found: Vec<(f64, f64)> = crossings.iter().filter_map(|c| *c).collect();
            match found.len() {
                2 => segments.push(Segment {
                    start: found[0],
                    end: found[1],
                }),
                4 => {
                    let centre = vals.iter().sum::<f64>() / 4.0;
                    let pairs = if (centre >= level) == (vals[0] >= level) {
                        // Lower left and upper right are joined, cut off the other corners
                        [(0, 1), (2, 3)]
                    } else {
                        [(3, 0), (1, 2)]
                    };
                    for &(a, b) in pairs.iter() {
                        segments.push(Segment {
                            start: found[a],
                            end: found[b],
                        });
                    }
                }
                _ => {}
            }
        }
    }

    segments
}

/// Draw the figure into `path` in the given format.
///
/// A panic inside the plotting backend, e.g. from missing fonts, is returned as an error.
pub fn render_figure<P: AsRef<Path>>(
    data: &FigureData,
    cfg: &FigureConfig,
    path: P,
    kind: FigureKind,
) -> Result<()> {
    let path = path.as_ref();
    let render = || -> std::result::Result<(), String> {
        match kind {
            FigureKind::Png => {
                let root = BitMapBackend::new(path, cfg.size).into_drawing_area();
                draw(root, data, cfg)
            }
            FigureKind::Svg => {
                let root = SVGBackend::new(path, cfg.size).into_drawing_area();
                draw(root, data, cfg)
            }
        }
    };

    panic::catch_unwind(panic::AssertUnwindSafe(render))
        .map_err(|_| "plotting backend panicked".to_owned())
        .and_then(|res| res)
        .map_err(|message| AnalysisError::Figure {
            path: path.to_path_buf(),
            message,
        })
}

/// Draw the figure as `<stem>.png` and `<stem>.svg`, returning the files written.
pub fn render_figures<P: AsRef<Path>>(
    data: &FigureData,
    cfg: &FigureConfig,
    stem: P,
) -> Result<Vec<PathBuf>> {
    [FigureKind::Png, FigureKind::Svg]
        .iter()
        .map(|&kind| -> Result<PathBuf> {
            let path = stem.as_ref().with_extension(kind.extension());
            render_figure(data, cfg, &path, kind)?;
            Ok(path)
        })
        .collect()
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    data: &FigureData,
    cfg: &FigureConfig,
) -> std::result::Result<(), String> {
    let err = |e: DrawingAreaErrorKind<DB::ErrorType>| e.to_string();
    let colour = |v: f64| ViridisRGB.get_color(log_fraction(v, cfg.vmin, cfg.vmax));

    root.fill(&WHITE).map_err(err)?;
    let bar_width = 160;
    let plot_width = cfg.size.0.saturating_sub(bar_width);
    let (plot_area, bar_area) = root.split_horizontally(plot_width);

    let lons = data.eps.longitudes();
    let x_edges = cell_edges(lons);
    let (x_min, x_max) = match (x_edges.first(), x_edges.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => return Err("nothing to draw".to_owned()),
    };

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, -10.0..cfg.max_mab)
        .map_err(err)?;

    chart
        .plotting_area()
        .fill(&RGBColor(211, 211, 211))
        .map_err(err)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Longitude (°W)")
        .y_desc("Meters above bottom")
        .x_label_formatter(&|v| format!("{:.1}", -v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()
        .map_err(err)?;

    let mab = data.eps.mab();
    let mut cells = vec![];
    for (col, x) in x_edges.windows(2).enumerate() {
        for (row, &h) in mab.iter().enumerate().take_while(|&(_, &h)| h <= cfg.max_mab) {
            if let Some(v) = data.eps.get(row, col).into_option() {
                cells.push(Rectangle::new(
                    [(x[0], h - 0.5), (x[1], h + 0.5)],
                    colour(v).filled(),
                ));
            }
        }
    }
    debug!(cells = cells.len(), "drawing binned dissipation");
    chart.draw_series(cells).map_err(err)?;

    if let Some(boundaries) = &data.boundaries {
        let styles = [WHITE.stroke_width(3), BLACK.stroke_width(3)];
        for (level, style) in cfg.water_mass_boundaries.iter().zip(styles.iter().cycle()) {
            let segments = contour_segments(boundaries, *level, cfg.max_mab);
            chart
                .draw_series(
                    segments
                        .into_iter()
                        .map(|s| PathElement::new(vec![s.start, s.end], *style)),
                )
                .map_err(err)?;
        }
    }

    chart
        .draw_series(
            data.points
                .iter()
                .map(|p| Circle::new((p.longitude, p.mab), 9, colour(p.value).filled())),
        )
        .map_err(err)?;
    chart
        .draw_series(
            data.points
                .iter()
                .map(|p| Circle::new((p.longitude, p.mab), 9, BLACK.stroke_width(1))),
        )
        .map_err(err)?;

    draw_colour_bar(&bar_area, cfg).map_err(err)?;

    root.present().map_err(err)
}

fn draw_colour_bar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    cfg: &FigureConfig,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (_, height) = area.dim_in_pixel();
    let (top, bottom) = (40i32, 60i32);
    let x0 = 20i32;
    let usable = (height as i32).saturating_sub(top + bottom);
    if usable < 2 {
        return Ok(());
    }

    for i in 0..usable {
        let frac = 1.0 - i as f64 / (usable - 1) as f64;
        area.draw(&Rectangle::new(
            [(x0, top + i), (x0 + 30, top + i + 1)],
            ViridisRGB.get_color(frac).filled(),
        ))?;
    }

    // One label per decade
    let (lo, hi) = (cfg.vmin.log10().ceil() as i32, cfg.vmax.log10().floor() as i32);
    let style = TextStyle::from(("sans-serif", 16).into_font()).color(&BLACK);
    for exp in lo..=hi {
        let frac = log_fraction(10f64.powi(exp), cfg.vmin, cfg.vmax);
        let y = top + ((1.0 - frac) * (usable - 1) as f64) as i32;
        area.draw_text(&format!("1e{}", exp), &style, (x0 + 36, y - 8))?;
    }
    area.draw_text("ε (W/kg)", &style, (x0, top + usable + 15))?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{table::StationTable, utility::test_tools::approx_equal};
    use optional::{none, some};

    #[test]
    fn test_log_fraction() {
        assert!(approx_equal(log_fraction(1.0e-9, 1.0e-10, 1.0e-7), 1.0 / 3.0, 1.0e-12));
        assert_eq!(log_fraction(1.0e-12, 1.0e-10, 1.0e-7), 0.0);
        assert_eq!(log_fraction(1.0e-5, 1.0e-10, 1.0e-7), 1.0);
    }

    #[test]
    fn test_cell_edges() {
        let edges = cell_edges(&[-53.5, -53.0, -52.5]);
        assert_eq!(edges, vec![-53.75, -53.25, -52.75, -52.25]);
        assert_eq!(cell_edges(&[1.0]), vec![0.5, 1.5]);
        assert!(cell_edges(&[]).is_empty());
    }

    #[test]
    fn test_contour_straight_line() {
        let table = StationTable::from_columns(
            vec![0.0, 1.0],
            vec![(0.0, vec![some(0.0), some(0.0)]), (1.0, vec![some(1.0), some(1.0)])],
        )
        .unwrap();

        let segments = contour_segments(&table, 0.5, 500.0);
        assert_eq!(
            segments,
            vec![Segment {
                start: (0.5, 0.0),
                end: (0.5, 1.0)
            }]
        );
        assert!(contour_segments(&table, 2.0, 500.0).is_empty());
        // The only cell reaches above the ceiling
        assert!(contour_segments(&table, 0.5, 0.5).is_empty());
    }

    #[test]
    fn test_unwritable_target_is_an_error() {
        let eps = StationTable::from_columns(
            vec![0.0, 1.0],
            vec![
                (-50.0, vec![some(1.0e-9), none()]),
                (-49.5, vec![some(1.0e-8), some(1.0e-10)]),
            ],
        )
        .unwrap();
        let data = FigureData {
            eps,
            boundaries: None,
            points: vec![],
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("eps_transect.svg");

        let cfg = FigureConfig::default();
        let err = render_figure(&data, &cfg, &path, FigureKind::Svg).unwrap_err();
        assert!(err.to_string().contains("eps_transect.svg"));
        assert!(!path.exists());
    }

    #[test]
    fn test_contour_saddle_and_missing() {
        let saddle = StationTable::from_columns(
            vec![0.0, 1.0],
            vec![(0.0, vec![some(1.0), some(0.0)]), (1.0, vec![some(0.0), some(1.0)])],
        )
        .unwrap();
        assert_eq!(contour_segments(&saddle, 0.5, 500.0).len(), 2);

        let gappy = StationTable::from_columns(
            vec![0.0, 1.0],
            vec![(0.0, vec![some(0.0), none()]), (1.0, vec![some(1.0), some(1.0)])],
        )
        .unwrap();
        assert!(contour_segments(&gappy, 0.5, 500.0).is_empty());
    }
}
