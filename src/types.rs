//! Core types shared by the store and the study.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The state of a recorded configuration in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TrialState {
    /// The configuration was proposed and is waiting for a human judgment.
    Running,
    /// The configuration took part in at least one reported preference.
    Complete,
}
