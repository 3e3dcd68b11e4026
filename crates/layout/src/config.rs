use crate::BreakError;
use folio_types::MinOptMax;
use serde::{Deserialize, Serialize};

/// Text-alignment style of a container, as far as the breaker cares.
///
/// Only `Center` and `Justify` change behavior: `Center` keeps leading non-box
/// elements in the first container, `Justify` on the last container disables the
/// ragged-last treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BreakingConfig {
    /// Alignment of every container except the last.
    ///
    /// Defaults to `Alignment::Justify`.
    pub alignment: Alignment,

    /// Alignment of the last container. Anything other than `Justify` lets an
    /// underfull last container stay ragged instead of being penalized.
    ///
    /// Defaults to `Alignment::Start`.
    pub alignment_last: Alignment,

    /// Largest adjustment ratio a container may need and still count as feasible.
    ///
    /// - **Higher values**: fewer restarts, but looser containers are accepted.
    /// - **Lower values**: tighter layouts, more reliance on the restart policy.
    ///
    /// Defaults to `1.0`.
    pub threshold: f64,

    /// When every candidate becomes infeasible, restart from the least bad one
    /// instead of failing with [`BreakError::NoFeasibleBreaks`].
    ///
    /// Defaults to `true`.
    pub force: bool,

    /// Whether flagged penalties are break candidates at all.
    ///
    /// Defaults to `true`.
    pub hyphenation_allowed: bool,

    /// Added when two consecutive breaks both happen at flagged penalties.
    ///
    /// Defaults to `50`.
    pub repeated_flagged_demerit: f64,

    /// Added when adjacent containers' fitness classes are more than one step apart.
    /// Also the slack within which near-best candidates are kept alive.
    ///
    /// Defaults to `50`.
    pub incompatible_fitness_demerit: f64,

    /// Added when a page ends in the middle of a footnote body.
    ///
    /// Defaults to `5000`.
    pub split_footnote_demerits: f64,

    /// Added per footnote list pushed to a later page than its anchor.
    ///
    /// Defaults to `10000`.
    pub deferred_footnote_demerits: f64,

    /// Space between the main flow and the footnote area. Its elasticity joins the
    /// page's whenever footnotes are placed.
    ///
    /// Defaults to zero.
    pub footnote_separator: MinOptMax,

    /// Pages grow to fit their content, so overflow is expected and not warned about.
    ///
    /// Defaults to `false`.
    pub auto_height: bool,
}

impl Default for BreakingConfig {
    fn default() -> Self {
        Self {
            alignment: Alignment::Justify,
            alignment_last: Alignment::Start,
            threshold: 1.0,
            force: true,
            hyphenation_allowed: true,
            repeated_flagged_demerit: 50.0,
            incompatible_fitness_demerit: 50.0,
            split_footnote_demerits: 5000.0,
            deferred_footnote_demerits: 10000.0,
            footnote_separator: MinOptMax::zero(),
            auto_height: false,
        }
    }
}

impl BreakingConfig {
    pub fn validate(&self) -> Result<(), BreakError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(BreakError::InvalidConfig(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        let demerits = [
            ("repeatedFlaggedDemerit", self.repeated_flagged_demerit),
            ("incompatibleFitnessDemerit", self.incompatible_fitness_demerit),
            ("splitFootnoteDemerits", self.split_footnote_demerits),
            ("deferredFootnoteDemerits", self.deferred_footnote_demerits),
        ];
        for (name, value) in demerits {
            if !value.is_finite() || value < 0.0 {
                return Err(BreakError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !self.footnote_separator.is_valid() {
            return Err(BreakError::InvalidConfig(format!(
                "footnoteSeparator must satisfy 0 <= min <= opt <= max, got {:?}",
                self.footnote_separator
            )));
        }
        Ok(())
    }
}
