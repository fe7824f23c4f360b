//! ASCII plotting for terminal output.
//!
//! Fixed-size character grids, deterministic so they can be tested:
//!
//! - `render_fit_plot`: kept points `o`, rejected points `x`, fitted curve `-`
//! - `render_chi_square_map`: χ² over `(width, mass)`, band edges as digits,
//!   the `χ²min + 1` contour as `#`, the grid minimum as `*`

use crate::domain::{Observation, ParameterPair, PhysicsConstants};
use crate::fit::ChiSquareGrid;
use crate::models::predict;

/// Number of χ² bands drawn in the contour map.
const BANDS: usize = 10;

/// Plot the observations against the fitted curve.
pub fn render_fit_plot(
    kept: &[Observation],
    rejected: &[Observation],
    params: ParameterPair,
    constants: &PhysicsConstants,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = x_range(kept.iter().chain(rejected)).unwrap_or((params.mass - 5.0, params.mass + 5.0));
    let curve = sample_curve(params, constants, x_min, x_max, width);

    let (y_min, y_max) = y_range(kept.iter().chain(rejected), &curve).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curve first so points overlay it.
    draw_curve(&mut grid, &curve, x_min, x_max, y_min, y_max);

    for (points, ch) in [(kept, 'o'), (rejected, 'x')] {
        for o in points {
            let x = map_x(o.x, x_min, x_max, width);
            let y = map_y(o.y, y_min, y_max, height);
            grid[y][x] = ch;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: energy=[{x_min:.3}, {x_max:.3}] GeV | cross-section=[{y_min:.4}, {y_max:.4}] nb\n"
    ));
    push_grid(&mut out, grid);
    out
}

/// Draw a χ² grid as a character map, width across and mass down (highest
/// mass on top).
pub fn render_chi_square_map(grid: &ChiSquareGrid, chi_square_min: f64, cols: usize, rows: usize) -> String {
    let cols = cols.max(10);
    let rows = rows.max(5);

    let n_mass = grid.masses.len();
    let n_width = grid.widths.len();
    if n_mass < 2 || n_width < 2 {
        return String::from("(empty chi-square grid)\n");
    }

    let level = ChiSquareGrid::one_sigma_level(chi_square_min);
    let (v_min, v_max) = grid
        .values
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    // Sample the grid at the cell centers of the character map.
    let sampled: Vec<Vec<f64>> = (0..rows)
        .map(|r| {
            let i = n_mass - 1 - index_for(r, rows, n_mass);
            (0..cols)
                .map(|c| grid.values[i][index_for(c, cols, n_width)])
                .collect()
        })
        .collect();

    let band = |v: f64| -> usize {
        if v_max > v_min {
            (((v - v_min) / (v_max - v_min)) * BANDS as f64).floor().clamp(0.0, (BANDS - 1) as f64) as usize
        } else {
            0
        }
    };

    let mut chars = vec![vec![' '; cols]; rows];
    for r in 0..rows {
        for c in 0..cols {
            let v = sampled[r][c];
            let inside = v <= level;
            let neighbours = [(r + 1 < rows).then(|| sampled[r + 1][c]), (c + 1 < cols).then(|| sampled[r][c + 1])];

            if neighbours.iter().flatten().any(|&n| (n <= level) != inside) {
                chars[r][c] = '#';
            } else if neighbours.iter().flatten().any(|&n| band(n) != band(v)) {
                chars[r][c] = char::from_digit(band(v) as u32, 10).unwrap_or('?');
            }
        }
    }

    let (_, min_i, min_j) = grid.minimum;
    let star_r = position_for(n_mass - 1 - min_i, n_mass, rows);
    let star_c = position_for(min_j, n_width, cols);
    chars[star_r][star_c] = '*';

    let mut out = String::new();
    out.push_str(&format!(
        "Chi-square map: width=[{:.4}, {:.4}] GeV across | mass=[{:.4}, {:.4}] GeV down (high to low)\n",
        grid.widths[0],
        grid.widths[n_width - 1],
        grid.masses[n_mass - 1],
        grid.masses[0],
    ));
    out.push_str(&format!(
        "'#' chi2 = {level:.3} (min + 1) | digits: {BANDS} bands over [{v_min:.3}, {v_max:.3}] | '*' grid minimum\n"
    ));
    push_grid(&mut out, chars);
    out
}

fn push_grid(out: &mut String, grid: Vec<Vec<char>>) {
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
}

/// Map character cell `k` of `cells` onto one of `n` grid samples.
fn index_for(k: usize, cells: usize, n: usize) -> usize {
    ((k as f64 / (cells as f64 - 1.0)) * (n as f64 - 1.0)).round() as usize
}

/// Inverse of `index_for`.
fn position_for(i: usize, n: usize, cells: usize) -> usize {
    ((i as f64 / (n as f64 - 1.0)) * (cells as f64 - 1.0)).round() as usize
}

fn x_range<'a>(points: impl Iterator<Item = &'a Observation>) -> Option<(f64, f64)> {
    let (min_x, max_x) = points.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), o| (lo.min(o.x), hi.max(o.x)));
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn sample_curve(params: ParameterPair, constants: &PhysicsConstants, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x_min + u * (x_max - x_min);
            (x, predict(x, params, constants))
        })
        .collect()
}

fn y_range<'a>(points: impl Iterator<Item = &'a Observation>, curve: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for y in points.map(|o| o.y).chain(curve.iter().map(|&(_, y)| y)) {
        if y.is_finite() {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y_max is row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        if !y.is_finite() {
            prev = None;
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bowl(n: usize) -> ChiSquareGrid {
        let axis: Vec<f64> = (0..n).map(|k| -1.0 + 2.0 * k as f64 / (n as f64 - 1.0)).collect();
        let values = axis
            .iter()
            .map(|m| axis.iter().map(|w| 10.0 * (m * m + w * w)).collect())
            .collect();
        ChiSquareGrid {
            masses: axis.clone(),
            widths: axis,
            values,
            minimum: (0.0, n / 2, n / 2),
        }
    }

    #[test]
    fn fit_plot_marks_kept_rejected_and_curve() {
        let c = PhysicsConstants::default();
        let params = ParameterPair::new(91.19, 2.5);
        let kept: Vec<Observation> = [87.0, 89.0, 91.0, 93.0, 95.0]
            .iter()
            .map(|&x| Observation::new(x, predict(x, params, &c), 0.05))
            .collect();
        let rejected = [Observation::new(90.0, 5.0, 0.1)];

        let txt = render_fit_plot(&kept, &rejected, params, &c, 40, 12);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines[0].starts_with("Plot: energy=[87.000, 95.000] GeV"));
        assert!(lines[1..].iter().all(|l| l.chars().count() <= 40));

        // The rejected point is the highest value: top row.
        assert!(lines[1].contains('x'));
        let body = lines[1..].join("\n");
        assert_eq!(body.matches('x').count(), 1);
        assert_eq!(body.matches('o').count(), 5);
        assert!(body.contains('-'));
    }

    #[test]
    fn fit_plot_handles_empty_input() {
        let c = PhysicsConstants::default();
        let txt = render_fit_plot(&[], &[], ParameterPair::new(91.19, 2.5), &c, 20, 6);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[1..].iter().any(|l| l.contains('-')));
    }

    #[test]
    fn chi_square_map_marks_minimum_and_contour() {
        let grid = bowl(21);
        let txt = render_chi_square_map(&grid, 0.0, 21, 21);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 23);
        let body = lines[2..].join("\n");

        assert_eq!(body.matches('*').count(), 1);
        let star_row = lines[2..].iter().position(|l| l.contains('*')).unwrap();
        assert_eq!(star_row, 10);
        assert_eq!(lines[2 + star_row].find('*'), Some(10));

        // The χ² = 1 contour has radius ≈ 0.32, i.e. about three cells.
        assert!(body.contains('#'));
        for (r, line) in lines[2..].iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                if ch == '#' {
                    let dr = r as f64 - 10.0;
                    let dc = c as f64 - 10.0;
                    assert!((dr * dr + dc * dc).sqrt() <= 5.0, "contour cell at ({r}, {c})");
                }
            }
        }
        // Band edges appear away from the minimum.
        assert!(body.chars().any(|ch| ch.is_ascii_digit()));
    }

    #[test]
    fn chi_square_map_resamples_to_requested_size() {
        let grid = bowl(101);
        let txt = render_chi_square_map(&grid, 0.0, 30, 12);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 14);
        assert!(lines[2..].iter().all(|l| l.chars().count() <= 30));
        assert_eq!(lines[2..].join("\n").matches('*').count(), 1);
    }
}
