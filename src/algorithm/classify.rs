//! Cluster-quadrant classification of local statistics
//!
//! The quadrant depends only on the signs of the deviation and the spatial
//! lag; the label additionally collapses to [`ClusterLabel::NotSignificant`]
//! whenever the p-value reaches the caller-supplied threshold.

/// Moran scatterplot quadrant of one unit
///
/// Zero deviations and zero lags fall into the non-positive bucket, so an
/// exactly-average unit classifies as low and an isolate (whose lag is zero
/// by construction) always lands in [`Quadrant::LowLow`] or
/// [`Quadrant::HighLow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// High value surrounded by high values
    HighHigh,
    /// Low value surrounded by high values
    LowHigh,
    /// Low value surrounded by low values
    LowLow,
    /// High value surrounded by low values
    HighLow,
}

impl Quadrant {
    /// Classify by the signs of the deviation and the lag
    pub const fn from_signs(z_deviation: f64, lag: f64) -> Self {
        match (z_deviation > 0.0, lag > 0.0) {
            (true, true) => Self::HighHigh,
            (false, true) => Self::LowHigh,
            (false, false) => Self::LowLow,
            (true, false) => Self::HighLow,
        }
    }

    /// Two-letter quadrant code
    pub const fn code(self) -> &'static str {
        match self {
            Self::HighHigh => "HH",
            Self::LowHigh => "LH",
            Self::LowLow => "LL",
            Self::HighLow => "HL",
        }
    }
}

/// Final cluster label of one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterLabel {
    /// Significant high-high cluster
    HighHigh,
    /// Significant low-high outlier
    LowHigh,
    /// Significant low-low cluster
    LowLow,
    /// Significant high-low outlier
    HighLow,
    /// No significant spatial pattern
    NotSignificant,
}

impl ClusterLabel {
    /// All labels in display order
    pub const ALL: [Self; 5] = [
        Self::HighHigh,
        Self::LowHigh,
        Self::LowLow,
        Self::HighLow,
        Self::NotSignificant,
    ];

    /// Short label code used in tables and exports
    pub const fn code(self) -> &'static str {
        match self {
            Self::HighHigh => "HH",
            Self::LowHigh => "LH",
            Self::LowLow => "LL",
            Self::HighLow => "HL",
            Self::NotSignificant => "ns",
        }
    }

    /// Whether the label marks a significant cluster or outlier
    pub const fn is_significant(self) -> bool {
        !matches!(self, Self::NotSignificant)
    }
}

impl From<Quadrant> for ClusterLabel {
    fn from(quadrant: Quadrant) -> Self {
        match quadrant {
            Quadrant::HighHigh => Self::HighHigh,
            Quadrant::LowHigh => Self::LowHigh,
            Quadrant::LowLow => Self::LowLow,
            Quadrant::HighLow => Self::HighLow,
        }
    }
}

/// Classify one unit from its deviation, lag, and p-value
///
/// The quadrant is independent of the p-value; the label is
/// [`ClusterLabel::NotSignificant`] exactly when `p_value` is at or above
/// `significance_threshold`.
pub fn classify(
    z_deviation: f64,
    lag: f64,
    p_value: f64,
    significance_threshold: f64,
) -> (Quadrant, ClusterLabel) {
    let quadrant = Quadrant::from_signs(z_deviation, lag);
    let label = if p_value >= significance_threshold {
        ClusterLabel::NotSignificant
    } else {
        ClusterLabel::from(quadrant)
    };
    (quadrant, label)
}

/// Per-unit analysis result
///
/// One per spatial unit in a batch; never mutated after creation. A new
/// year or dataset produces a new, independent collection.
#[derive(Debug, Clone)]
pub struct LocalStatistic {
    /// Identifier of the unit this row describes
    pub unit_id: u64,
    /// Attribute value the statistic was computed from
    pub attribute_value: f64,
    /// Deviation from the batch mean
    pub z_deviation: f64,
    /// Spatial lag (weighted neighbor deviation; zero for isolates)
    pub lag: f64,
    /// Local Moran statistic
    pub local_i: f64,
    /// Empirical two-sided p-value
    pub p_value: f64,
    /// Moran scatterplot quadrant
    pub quadrant: Quadrant,
    /// Cluster label after the significance cut
    pub label: ClusterLabel,
}
