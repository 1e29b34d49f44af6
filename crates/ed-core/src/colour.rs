//! Triage colours and dispatch priority.

use std::fmt;

/// Acuity class assigned by a call-taker.
///
/// `Purple` is the highest acuity and `Yellow` the lowest class that goes
/// straight to dispatch.  `Teal` calls are first offered to a secondary
/// triage clinician.  A call that has not been triaged yet carries
/// `Option<TriageColour>::None`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageColour {
    Purple,
    Red,
    Orange,
    Yellow,
    Teal,
}

impl TriageColour {
    /// All colours in weight-vector order.
    pub const ALL: [TriageColour; 5] = [
        TriageColour::Purple,
        TriageColour::Red,
        TriageColour::Orange,
        TriageColour::Yellow,
        TriageColour::Teal,
    ];

    /// Dispatchable colours in the order ambulances scan them.
    pub const DISPATCH_PRIORITY: [TriageColour; 4] = [
        TriageColour::Purple,
        TriageColour::Red,
        TriageColour::Orange,
        TriageColour::Yellow,
    ];

    /// `true` for colours that enter a dispatch queue directly.
    #[inline]
    pub fn is_dispatchable(self) -> bool {
        !matches!(self, TriageColour::Teal)
    }

    /// Position in [`DISPATCH_PRIORITY`](Self::DISPATCH_PRIORITY), `None`
    /// for teal.
    #[inline]
    pub fn priority_rank(self) -> Option<usize> {
        match self {
            TriageColour::Purple => Some(0),
            TriageColour::Red    => Some(1),
            TriageColour::Orange => Some(2),
            TriageColour::Yellow => Some(3),
            TriageColour::Teal   => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TriageColour::Purple => "purple",
            TriageColour::Red    => "red",
            TriageColour::Orange => "orange",
            TriageColour::Yellow => "yellow",
            TriageColour::Teal   => "teal",
        }
    }
}

impl fmt::Display for TriageColour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
