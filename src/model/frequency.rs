//! Population frequency information of a variant.

/// Maximal observed population allele frequency, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct FrequencyData {
    max_freq: Option<f32>,
}

impl FrequencyData {
    /// Construct; a NaN frequency counts as not observed.
    pub fn new(max_freq: Option<f32>) -> Self {
        Self {
            max_freq: max_freq.filter(|freq| !freq.is_nan()),
        }
    }

    pub fn max_freq(&self) -> Option<f32> {
        self.max_freq
    }

    /// Rarity score: `1.0` for unobserved variants dropping to `0.0` above 2%.
    pub fn score(&self) -> f32 {
        match self.max_freq {
            None => 1.0,
            Some(freq) if freq <= 0.0 => 1.0,
            Some(freq) if freq > 2.0 => 0.0,
            Some(freq) => 1.0 - 0.13533 * freq.exp(),
        }
    }
}
