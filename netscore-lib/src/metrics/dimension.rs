use strum::{Display, EnumIter, IntoStaticStr};

/// The quality dimensions that make up a NetScore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum Dimension {
    #[strum(serialize = "BusFactor")]
    BusFactor,

    #[strum(serialize = "Correctness")]
    Correctness,

    #[strum(serialize = "License")]
    License,

    #[strum(serialize = "RampUp")]
    RampUp,

    #[strum(serialize = "ResponsiveMaintainer")]
    Responsiveness,
}

impl Dimension {
    /// Contribution of this dimension to the NetScore. Weights sum to 1.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::BusFactor | Self::RampUp | Self::Correctness => 0.1,
            Self::License => 0.3,
            Self::Responsiveness => 0.4,
        }
    }
}
