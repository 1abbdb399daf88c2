use rand::Rng;
use rand::seq::index;

use crate::model::{SiteMask, percent_of};

/// Parameters of the two-state hidden-chain missingness model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainParams {
    /// Missingness probability while in the good state.
    pub baseline: f64,
    /// Factor applied to `baseline` while in the bad state.
    pub multiplier: f64,
    pub good_to_bad: f64,
    pub bad_to_good: f64,
}

impl ChainParams {
    pub fn emission_probability(&self, state: ChainState) -> f64 {
        match state {
            ChainState::Good => self.baseline,
            ChainState::Bad => (self.baseline * self.multiplier).min(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Good,
    Bad,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MissingnessModel {
    /// Drop exactly `round(percent / 100 * N)` sites chosen uniformly.
    Count { percent: f64 },
    HiddenChain(ChainParams),
}

pub fn generate<R: Rng + ?Sized>(model: &MissingnessModel, n_sites: usize, rng: &mut R) -> SiteMask {
    match model {
        MissingnessModel::Count { percent } => count_mask(*percent, n_sites, rng),
        MissingnessModel::HiddenChain(params) => {
            let states = walk_states(params, n_sites, rng);
            emit(params, &states, rng)
        }
    }
}

fn count_mask<R: Rng + ?Sized>(percent: f64, n_sites: usize, rng: &mut R) -> SiteMask {
    let mut masked = vec![false; n_sites];
    let k = percent_of(percent, n_sites).min(n_sites);
    if k > 0 {
        for site in index::sample(rng, n_sites, k) {
            masked[site] = true;
        }
    }
    SiteMask::from_flags(masked)
}

/// Hidden state per site. Starts good; the transition drawn at site `i` applies from `i + 1`.
pub fn walk_states<R: Rng + ?Sized>(
    params: &ChainParams,
    n_sites: usize,
    rng: &mut R,
) -> Vec<ChainState> {
    let mut states = Vec::with_capacity(n_sites);
    let mut current = ChainState::Good;
    for _ in 0..n_sites {
        states.push(current);
        current = match current {
            ChainState::Good if rng.r#gen::<f64>() < params.good_to_bad => ChainState::Bad,
            ChainState::Bad if rng.r#gen::<f64>() < params.bad_to_good => ChainState::Good,
            state => state,
        };
    }
    states
}

pub fn emit<R: Rng + ?Sized>(params: &ChainParams, states: &[ChainState], rng: &mut R) -> SiteMask {
    let masked = states
        .iter()
        .map(|&state| rng.r#gen::<f64>() < params.emission_probability(state))
        .collect();
    SiteMask::from_flags(masked)
}
