//! Small numeric helpers shared by the aggregator and the engine.

/// Converts a collection length to `f64` without a lossy cast.
pub(super) fn len_as_f64(len: usize) -> f64 {
    u32::try_from(len).map_or(f64::from(u32::MAX), f64::from)
}

/// Arithmetic mean; `None` for an empty slice.
pub(super) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / len_as_f64(values.len()))
}

/// Median; `None` for an empty slice.
pub(super) fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let middle = sorted.len().div_euclid(2);
    if sorted.len().rem_euclid(2) == 1 {
        sorted.get(middle).copied()
    } else {
        let upper = sorted.get(middle)?;
        let lower = sorted.get(middle.checked_sub(1)?)?;
        Some(f64::midpoint(*lower, *upper))
    }
}

/// Running weighted mean over `(value, weight)` pairs.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct WeightedMean {
    weighted_sum: f64,
    total_weight: f64,
}

impl WeightedMean {
    pub(super) fn add(&mut self, value: f64, weight: u32) {
        let weight_value = f64::from(weight);
        self.weighted_sum += value * weight_value;
        self.total_weight += weight_value;
    }

    /// `None` when no weight has been added.
    pub(super) fn value(self) -> Option<f64> {
        (self.total_weight > 0.0).then(|| self.weighted_sum / self.total_weight)
    }
}
