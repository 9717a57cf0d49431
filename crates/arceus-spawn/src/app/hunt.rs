//! Hunting policy
//!
//! A `MatchPolicy` decides which predicted spawns are worth pursuing and how many
//! hits end a scan.

use crate::app::report::SpawnRecord;
use crate::constants::{DEFAULT_MAX_HITS, IV_COUNT};
use crate::domain::species::species_by_name;
use crate::error::SpawnError;

/// Predicate over predicted spawns with a bounded hit count
pub trait MatchPolicy {
    fn is_match(&self, record: &SpawnRecord) -> bool;

    /// Hits after which an early-stopping scan ends
    fn max_hits(&self) -> usize {
        DEFAULT_MAX_HITS
    }
}

impl<F> MatchPolicy for F
where
    F: Fn(&SpawnRecord) -> bool,
{
    fn is_match(&self, record: &SpawnRecord) -> bool {
        self(record)
    }
}

/// Policy that matches nothing and never stops early
#[derive(Clone, Copy, Debug, Default)]
pub struct Unfiltered;

impl MatchPolicy for Unfiltered {
    fn is_match(&self, _record: &SpawnRecord) -> bool {
        false
    }

    fn max_hits(&self) -> usize {
        usize::MAX
    }
}

/// Configurable hunting filter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuntFilter {
    /// Species allow-list; empty accepts every species
    pub species: Vec<u16>,
    /// Exact IV vector (HP/Atk/Def/SpA/SpD/Spe)
    pub target_ivs: Option<[u8; IV_COUNT]>,
    pub alpha_only: bool,
    pub shiny_only: bool,
    pub max_hits: usize,
}

impl Default for HuntFilter {
    fn default() -> Self {
        Self {
            species: Vec::new(),
            target_ivs: None,
            alpha_only: false,
            shiny_only: true,
            max_hits: DEFAULT_MAX_HITS,
        }
    }
}

impl HuntFilter {
    pub fn shiny() -> Self {
        Self::default()
    }

    pub fn with_species(mut self, species: Vec<u16>) -> Self {
        self.species = species;
        self
    }

    pub fn with_target_ivs(mut self, ivs: [u8; IV_COUNT]) -> Self {
        self.target_ivs = Some(ivs);
        self
    }

    pub fn alpha_only(mut self, alpha_only: bool) -> Self {
        self.alpha_only = alpha_only;
        self
    }
}

impl MatchPolicy for HuntFilter {
    fn is_match(&self, record: &SpawnRecord) -> bool {
        if self.shiny_only && !record.outcome.shiny.is_shiny() {
            return false;
        }
        if self.alpha_only && !record.is_alpha {
            return false;
        }
        if !self.species.is_empty() && !self.species.contains(&record.species) {
            return false;
        }
        match self.target_ivs {
            Some(ivs) => record.outcome.ivs == ivs,
            None => true,
        }
    }

    fn max_hits(&self) -> usize {
        self.max_hits
    }
}

/// Parse a species allow-list separated by commas and/or spaces
///
/// Accepts species names or national dex numbers.
pub fn parse_species_list(list: &str) -> Result<Vec<u16>, SpawnError> {
    list.split([',', ' '])
        .filter(|s| !s.is_empty())
        .map(|token| {
            if let Ok(id) = token.parse::<u16>() {
                return Ok(id);
            }
            species_by_name(token)
                .map(|info| info.id)
                .ok_or_else(|| SpawnError::unsupported(format!("unknown species '{}'", token)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::individual::{generate_individual, ShinyKind, StatParams, TrainerId};
    use crate::domain::walker::{Phase, Round};

    fn record(species: u16, is_alpha: bool, shiny: ShinyKind) -> SpawnRecord {
        let params = StatParams {
            flawless_ivs: 0,
            shiny_rolls: 1,
            gender_ratio: 127,
            trainer: TrainerId::default(),
        };
        let mut outcome = generate_individual(1, &params);
        outcome.shiny = shiny;
        outcome.ivs = [31, 31, 31, 0, 31, 31];
        SpawnRecord {
            round: Round::Main,
            phase: Phase::Single,
            index: 0,
            advance: 0,
            slot_value: None,
            fallback: false,
            location: String::new(),
            species,
            form: 0,
            is_alpha,
            outcome,
            matched: false,
        }
    }

    #[test]
    fn test_default_filter_wants_shiny() {
        let filter = HuntFilter::default();
        assert!(filter.is_match(&record(215, false, ShinyKind::Star)));
        assert!(!filter.is_match(&record(215, false, ShinyKind::None)));
        assert_eq!(filter.max_hits(), DEFAULT_MAX_HITS);
    }

    #[test]
    fn test_species_allow_list() {
        let filter = HuntFilter::shiny().with_species(vec![461]);
        assert!(filter.is_match(&record(461, false, ShinyKind::Square)));
        assert!(!filter.is_match(&record(215, false, ShinyKind::Square)));
    }

    #[test]
    fn test_alpha_only() {
        let filter = HuntFilter::shiny().alpha_only(true);
        assert!(filter.is_match(&record(215, true, ShinyKind::Star)));
        assert!(!filter.is_match(&record(215, false, ShinyKind::Star)));
    }

    #[test]
    fn test_target_ivs_exact() {
        let filter = HuntFilter::shiny().with_target_ivs([31, 31, 31, 0, 31, 31]);
        assert!(filter.is_match(&record(215, false, ShinyKind::Star)));

        let filter = HuntFilter::shiny().with_target_ivs([31; 6]);
        assert!(!filter.is_match(&record(215, false, ShinyKind::Star)));
    }

    #[test]
    fn test_closure_policy() {
        let policy = |r: &SpawnRecord| r.is_alpha;
        assert!(policy.is_match(&record(1, true, ShinyKind::None)));
        assert_eq!(policy.max_hits(), DEFAULT_MAX_HITS);
        assert!(!Unfiltered.is_match(&record(1, true, ShinyKind::Square)));
    }

    #[test]
    fn test_parse_species_list() {
        assert_eq!(
            parse_species_list("Sneasel, Weavile 137").unwrap(),
            vec![215, 461, 137]
        );
        assert!(parse_species_list("").unwrap().is_empty());
        assert!(parse_species_list("Sneasel,Agumon").is_err());
    }
}
