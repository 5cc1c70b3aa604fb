//! Geometry/event finder: scalar-function root-finding over a search
//! window, plus the pre-built geometric predicates (distance, occultation,
//! illumination, spherical coordinate, field-of-view, day/night) that
//! supply the scalar function.
//!
//! Grounded in `GeometryFinder.h`'s five `FindWindowsOn*`/`FindWindowsIn*`
//! static functions and `RelationalOperator`/`RelationnalOperator.cpp`'s
//! seven named comparators.

pub mod predicates;

use crate::errors::{AstroError, AstroResult};
use crate::time::{Duration, Tdb, Window};
use std::fmt;

/// Absolute root tolerance, in seconds, used to bisect a sign change down
/// to a precise crossing epoch (spec.md §4.4 step 2).
pub const ROOT_TOLERANCE_SECONDS: f64 = 1e-6;

/// The seven comparators a constraint can be evaluated against, mirroring
/// the original `RelationalOperator` value type's named static instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationalOperator {
    /// `f(t) > value`.
    GreaterThan,
    /// `f(t) < value`.
    LowerThan,
    /// `f(t) == value`, located as an isolated root rather than an
    /// interval.
    Equal,
    /// The global minimum of `f` over the search window.
    AbsMin,
    /// The global maximum of `f` over the search window.
    AbsMax,
    /// Every local minimum of `f` over the search window.
    LocalMin,
    /// Every local maximum of `f` over the search window.
    LocalMax,
}

impl RelationalOperator {
    /// The original's `ToCharArray` string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationalOperator::GreaterThan => ">",
            RelationalOperator::LowerThan => "<",
            RelationalOperator::Equal => "=",
            RelationalOperator::AbsMin => "ABSMIN",
            RelationalOperator::AbsMax => "ABSMAX",
            RelationalOperator::LocalMin => "LOCMIN",
            RelationalOperator::LocalMax => "LOCMAX",
        }
    }

    /// Parse the original's string form, mirroring `ToRelationalOperator`.
    pub fn parse(name: &str) -> AstroResult<Self> {
        Ok(match name {
            ">" => RelationalOperator::GreaterThan,
            "<" => RelationalOperator::LowerThan,
            "=" => RelationalOperator::Equal,
            "ABSMIN" => RelationalOperator::AbsMin,
            "ABSMAX" => RelationalOperator::AbsMax,
            "LOCMIN" => RelationalOperator::LocalMin,
            "LOCMAX" => RelationalOperator::LocalMax,
            other => {
                return Err(AstroError::InvalidArgument {
                    field: "relational_operator".to_string(),
                    reason: format!("`{}` is not a recognized relational operator", other),
                })
            }
        })
    }
}

impl fmt::Display for RelationalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Find every disjoint sub-window of `search_window` in which
/// `relation(f(t), value)` holds, per spec.md §4.4's four-step algorithm:
/// uniform sampling, bisection of sign changes to a precise root, a
/// numerical-derivative sign-change pass for the extrema relations, and a
/// final coalescing of touching intervals.
pub fn find_windows(
    f: impl Fn(Tdb) -> AstroResult<f64>,
    relation: RelationalOperator,
    value: f64,
    search_window: Window<Tdb>,
    step: Duration,
) -> AstroResult<Vec<Window<Tdb>>> {
    if step.to_seconds() <= 0.0 {
        return Err(AstroError::InvalidArgument {
            field: "step".to_string(),
            reason: "event finder step must be positive".to_string(),
        });
    }

    match relation {
        RelationalOperator::GreaterThan | RelationalOperator::LowerThan => {
            find_threshold_windows(&f, relation, value, search_window, step)
        }
        RelationalOperator::Equal => find_equality_roots(&f, value, search_window, step),
        RelationalOperator::AbsMin
        | RelationalOperator::AbsMax
        | RelationalOperator::LocalMin
        | RelationalOperator::LocalMax => find_extrema(&f, relation, search_window, step),
    }
}

fn grid(search_window: Window<Tdb>, step: Duration) -> Vec<Tdb> {
    let mut epochs = Vec::new();
    let mut t = search_window.start();
    while t < search_window.end() {
        epochs.push(t);
        t = t + step;
    }
    epochs.push(search_window.end());
    epochs
}

fn satisfies(relation: RelationalOperator, y: f64, value: f64) -> bool {
    match relation {
        RelationalOperator::GreaterThan => y > value,
        RelationalOperator::LowerThan => y < value,
        _ => unreachable!("threshold relations only"),
    }
}

fn bisect_root(
    f: &impl Fn(Tdb) -> AstroResult<f64>,
    value: f64,
    mut lo: Tdb,
    mut hi: Tdb,
) -> AstroResult<Tdb> {
    let mut g_lo = f(lo)? - value;
    while (hi - lo).to_seconds().abs() > ROOT_TOLERANCE_SECONDS {
        let mid = lo + (hi - lo) * 0.5;
        let g_mid = f(mid)? - value;
        if g_mid == 0.0 {
            return Ok(mid);
        }
        if g_mid.signum() == g_lo.signum() {
            lo = mid;
            g_lo = g_mid;
        } else {
            hi = mid;
        }
    }
    Ok(lo + (hi - lo) * 0.5)
}

fn find_threshold_windows(
    f: &impl Fn(Tdb) -> AstroResult<f64>,
    relation: RelationalOperator,
    value: f64,
    search_window: Window<Tdb>,
    step: Duration,
) -> AstroResult<Vec<Window<Tdb>>> {
    let epochs = grid(search_window, step);
    let mut windows = Vec::new();
    let mut current_start: Option<Tdb> = None;
    let mut prev_epoch = epochs[0];
    let mut prev_satisfied = satisfies(relation, f(prev_epoch)?, value);
    if prev_satisfied {
        current_start = Some(prev_epoch);
    }

    for &epoch in &epochs[1..] {
        let satisfied = satisfies(relation, f(epoch)?, value);
        if satisfied != prev_satisfied {
            let boundary = bisect_root(f, value, prev_epoch, epoch)?;
            match current_start {
                Some(start) => {
                    windows.push(Window::new(start, boundary));
                    current_start = None;
                }
                None => current_start = Some(boundary),
            }
        }
        prev_epoch = epoch;
        prev_satisfied = satisfied;
    }
    if let Some(start) = current_start {
        windows.push(Window::new(start, search_window.end()));
    }

    Ok(coalesce(windows))
}

fn find_equality_roots(
    f: &impl Fn(Tdb) -> AstroResult<f64>,
    value: f64,
    search_window: Window<Tdb>,
    step: Duration,
) -> AstroResult<Vec<Window<Tdb>>> {
    let epochs = grid(search_window, step);
    let mut roots = Vec::new();
    let mut prev_epoch = epochs[0];
    let mut prev_g = f(prev_epoch)? - value;
    if prev_g == 0.0 {
        roots.push(prev_epoch);
    }
    for &epoch in &epochs[1..] {
        let g = f(epoch)? - value;
        if g == 0.0 {
            roots.push(epoch);
        } else if g.signum() != prev_g.signum() {
            roots.push(bisect_root(f, value, prev_epoch, epoch)?);
        }
        prev_epoch = epoch;
        prev_g = g;
    }
    Ok(roots.into_iter().map(|t| Window::new(t, t)).collect())
}

fn derivative_at(
    f: &impl Fn(Tdb) -> AstroResult<f64>,
    t: Tdb,
    h: Duration,
) -> AstroResult<f64> {
    Ok((f(t + h)? - f(t - h)?) / (2.0 * h.to_seconds()))
}

fn find_extrema(
    f: &impl Fn(Tdb) -> AstroResult<f64>,
    relation: RelationalOperator,
    search_window: Window<Tdb>,
    step: Duration,
) -> AstroResult<Vec<Window<Tdb>>> {
    let h = Duration::from_seconds((step.to_seconds() * 0.01).max(1e-3));
    let deriv = |t: Tdb| derivative_at(f, t, h);

    let epochs = grid(search_window, step);
    let mut candidates = Vec::new();
    let mut prev_epoch = epochs[0];
    let mut prev_d = deriv(prev_epoch)?;
    for &epoch in &epochs[1..] {
        let d = deriv(epoch)?;
        if d.signum() != prev_d.signum() {
            let root = bisect_root(&deriv, 0.0, prev_epoch, epoch)?;
            let is_min = prev_d < 0.0 && d > 0.0;
            let is_max = prev_d > 0.0 && d < 0.0;
            if is_min || is_max {
                candidates.push((root, f(root)?, is_min));
            }
        }
        prev_epoch = epoch;
        prev_d = d;
    }

    // Always consider the search window's own endpoints as candidate
    // extrema: a monotonic function's global min/max sits at a boundary,
    // not at an interior root of the derivative.
    candidates.push((search_window.start(), f(search_window.start())?, false));
    candidates.push((search_window.start(), f(search_window.start())?, true));
    candidates.push((search_window.end(), f(search_window.end())?, false));
    candidates.push((search_window.end(), f(search_window.end())?, true));

    let selected: Vec<Tdb> = match relation {
        RelationalOperator::LocalMin => candidates
            .iter()
            .filter(|(t, _, is_min)| {
                *is_min && *t != search_window.start() && *t != search_window.end()
            })
            .map(|(t, _, _)| *t)
            .collect(),
        RelationalOperator::LocalMax => candidates
            .iter()
            .filter(|(t, _, is_min)| {
                !*is_min && *t != search_window.start() && *t != search_window.end()
            })
            .map(|(t, _, _)| *t)
            .collect(),
        RelationalOperator::AbsMin => {
            let best = candidates
                .iter()
                .filter(|(_, _, is_min)| *is_min)
                .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
            best.map(|(t, _, _)| vec![*t]).unwrap_or_default()
        }
        RelationalOperator::AbsMax => {
            let best = candidates
                .iter()
                .filter(|(_, _, is_min)| !*is_min)
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
            best.map(|(t, _, _)| vec![*t]).unwrap_or_default()
        }
        _ => unreachable!("extrema relations only"),
    };

    Ok(selected.into_iter().map(|t| Window::new(t, t)).collect())
}

/// Merge any windows that touch or overlap, per spec.md §4.4 step 4.
fn coalesce(mut windows: Vec<Window<Tdb>>) -> Vec<Window<Tdb>> {
    if windows.is_empty() {
        return windows;
    }
    windows.sort_by(|a, b| a.start().partial_cmp(&b.start()).unwrap());
    let mut merged = vec![windows[0]];
    for w in &windows[1..] {
        let last = merged.last_mut().unwrap();
        match last.merge(w) {
            Some(m) => *last = m,
            None => merged.push(*w),
        }
    }
    merged
}
