//! Gap filling for a single region's chronologically sorted series.

/// Result of filling one series.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Filled {
    pub values: Vec<Option<f64>>,
    /// Number of entries that are still missing after filling.
    pub unresolved: usize,
}

/// Fills missing values by linear interpolation against `positions` (the time axis).
///
/// Interior gaps are interpolated between the nearest observed neighbours; leading and
/// trailing gaps take the nearest observed value. With fewer than two observed points
/// nothing is filled and every missing entry is reported as unresolved.
///
/// `positions` must be strictly increasing and the same length as `values`.
pub(crate) fn fill_linear(positions: &[f64], values: &[Option<f64>]) -> Filled {
    debug_assert_eq!(positions.len(), values.len());

    let observed: Vec<usize> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|_| i))
        .collect();
    let missing = values.len() - observed.len();

    if missing == 0 {
        return Filled {
            values: values.to_vec(),
            unresolved: 0,
        };
    }
    if observed.len() < 2 {
        return Filled {
            values: values.to_vec(),
            unresolved: missing,
        };
    }

    let mut filled = values.to_vec();
    let first = observed[0];
    let last = observed[observed.len() - 1];

    for slot in filled.iter_mut().take(first) {
        *slot = values[first];
    }
    for slot in filled.iter_mut().skip(last + 1) {
        *slot = values[last];
    }

    for pair in observed.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if hi - lo < 2 {
            continue;
        }
        let (Some(y0), Some(y1)) = (values[lo], values[hi]) else {
            continue;
        };
        let (x0, x1) = (positions[lo], positions[hi]);
        for i in lo + 1..hi {
            let t = (positions[i] - x0) / (x1 - x0);
            filled[i] = Some(y0 + t * (y1 - y0));
        }
    }

    Filled {
        values: filled,
        unresolved: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_gap_follows_the_time_axis() {
        // Gap at x=1 between (0, 10) and (4, 30): 10 + 20 * 1/4
        let filled = fill_linear(&[0.0, 1.0, 4.0], &[Some(10.0), None, Some(30.0)]);
        assert_eq!(filled.unresolved, 0);
        assert_eq!(filled.values, vec![Some(10.0), Some(15.0), Some(30.0)]);
    }

    #[test]
    fn several_consecutive_gaps_are_filled() {
        let filled = fill_linear(
            &[0.0, 1.0, 2.0, 4.0],
            &[Some(0.0), None, None, Some(4.0)],
        );
        assert_eq!(
            filled.values,
            vec![Some(0.0), Some(1.0), Some(2.0), Some(4.0)]
        );
    }

    #[test]
    fn edge_gaps_take_nearest_observation() {
        let filled = fill_linear(
            &[0.0, 1.0, 2.0, 3.0, 4.0],
            &[None, Some(5.0), Some(7.0), None, None],
        );
        assert_eq!(
            filled.values,
            vec![Some(5.0), Some(5.0), Some(7.0), Some(7.0), Some(7.0)]
        );
    }

    #[test]
    fn single_observation_cannot_be_interpolated() {
        let filled = fill_linear(&[0.0, 1.0, 2.0], &[None, Some(4.0), None]);
        assert_eq!(filled.unresolved, 2);
        assert_eq!(filled.values, vec![None, Some(4.0), None]);
    }

    #[test]
    fn complete_series_is_untouched() {
        let filled = fill_linear(&[0.0], &[Some(1.5)]);
        assert_eq!(filled.unresolved, 0);
        assert_eq!(filled.values, vec![Some(1.5)]);
    }
}
