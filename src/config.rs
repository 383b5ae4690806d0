//! Per-algorithm parameter sets
//!
//! Defaults follow the published values for each method.

/// COACH (core-attachment) thresholds
#[derive(Debug, Clone, Copy)]
pub struct CoachParams {
    /// Minimum density a candidate core must reach
    pub density_threshold: f64,

    /// NA-score above which two cores are considered redundant
    pub affinity_threshold: f64,

    /// Fraction of core members a peripheral node must touch to be attached
    pub closeness_threshold: f64,
}

impl Default for CoachParams {
    fn default() -> Self {
        Self {
            density_threshold: 0.7,
            affinity_threshold: 0.225,
            closeness_threshold: 0.5,
        }
    }
}

/// DPCLUS growth thresholds
#[derive(Debug, Clone, Copy)]
pub struct DpclusParams {
    /// Minimum cluster density during greedy growth
    pub d_threshold: f64,

    /// Cluster-property acceptance threshold (halved under fine-tuning)
    pub cp_threshold: f64,
}

impl Default for DpclusParams {
    fn default() -> Self {
        Self {
            d_threshold: 0.9,
            cp_threshold: 0.5,
        }
    }
}

/// IPCA expansion threshold
#[derive(Debug, Clone, Copy)]
pub struct IpcaParams {
    /// A candidate must connect to at least `t_in * |cluster|` members
    pub t_in: f64,
}

impl Default for IpcaParams {
    fn default() -> Self {
        Self { t_in: 0.5 }
    }
}

/// MCODE expansion threshold
#[derive(Debug, Clone, Copy)]
pub struct McodeParams {
    /// Nodes join a seed's complex while their weight exceeds
    /// `seed_weight * (1 - weight_threshold)`
    pub weight_threshold: f64,
}

impl Default for McodeParams {
    fn default() -> Self {
        Self {
            weight_threshold: 0.2,
        }
    }
}
