use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// The set of generation variables an energy table tracks.
    ///
    /// `TOTAL`, `COAL`, `SOLAR` and `WIND` are always tracked. `HYDRO` is optional:
    /// when it is not part of the set the hydro column is absent, which is not the same as zero.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TrackedSources: u32 {
        const TOTAL = 1 << 0;
        const COAL  = 1 << 1;
        const SOLAR = 1 << 2;
        const WIND  = 1 << 3;
        const HYDRO = 1 << 4;

        /// Variables every energy table carries.
        const REQUIRED = Self::TOTAL.bits()
                       | Self::COAL.bits()
                       | Self::SOLAR.bits()
                       | Self::WIND.bits();

        const ALL = Self::REQUIRED.bits() | Self::HYDRO.bits();
    }
}

impl Default for TrackedSources {
    fn default() -> Self {
        TrackedSources::REQUIRED
    }
}

impl TrackedSources {
    pub fn with_hydro(track_hydro: bool) -> Self {
        if track_hydro {
            TrackedSources::ALL
        } else {
            TrackedSources::REQUIRED
        }
    }

    /// Per-source columns (everything except the total) present under this set, in display order.
    pub fn source_variables(self) -> Vec<EnergyVariable> {
        EnergyVariable::ALL
            .into_iter()
            .filter(|v| v.is_source() && self.contains(v.flag()))
            .collect()
    }
}

/// A generation variable as labelled in the long-format energy release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnergyVariable {
    TotalGeneration,
    Coal,
    Solar,
    Wind,
    Hydro,
}

impl EnergyVariable {
    pub const ALL: [EnergyVariable; 5] = [
        EnergyVariable::TotalGeneration,
        EnergyVariable::Coal,
        EnergyVariable::Solar,
        EnergyVariable::Wind,
        EnergyVariable::Hydro,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EnergyVariable::TotalGeneration => "Total Generation",
            EnergyVariable::Coal => "Coal",
            EnergyVariable::Solar => "Solar",
            EnergyVariable::Wind => "Wind",
            EnergyVariable::Hydro => "Hydro",
        }
    }

    /// Matches a release label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|v| v.label().eq_ignore_ascii_case(label))
    }

    pub fn flag(self) -> TrackedSources {
        match self {
            EnergyVariable::TotalGeneration => TrackedSources::TOTAL,
            EnergyVariable::Coal => TrackedSources::COAL,
            EnergyVariable::Solar => TrackedSources::SOLAR,
            EnergyVariable::Wind => TrackedSources::WIND,
            EnergyVariable::Hydro => TrackedSources::HYDRO,
        }
    }

    pub fn is_source(self) -> bool {
        self != EnergyVariable::TotalGeneration
    }

    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EnergyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_case_insensitively() {
        assert_eq!(
            EnergyVariable::from_label(" total generation "),
            Some(EnergyVariable::TotalGeneration)
        );
        assert_eq!(EnergyVariable::from_label("SOLAR"), Some(EnergyVariable::Solar));
        assert_eq!(EnergyVariable::from_label("Gas"), None);
    }

    #[test]
    fn hydro_is_opt_in() {
        assert!(!TrackedSources::default().contains(TrackedSources::HYDRO));
        assert!(TrackedSources::with_hydro(true).contains(TrackedSources::HYDRO));
    }

    #[test]
    fn source_variables_follow_tracked_set() {
        assert_eq!(
            TrackedSources::REQUIRED.source_variables(),
            vec![EnergyVariable::Coal, EnergyVariable::Solar, EnergyVariable::Wind]
        );
        assert_eq!(
            TrackedSources::ALL.source_variables().last(),
            Some(&EnergyVariable::Hydro)
        );
    }
}
