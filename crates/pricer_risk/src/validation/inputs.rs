//! Prices consumed by the validation battery.

use pricer_core::market_data::MarketParams;
use pricer_core::types::PricingError;
use pricer_models::analytical::BlackScholes;
use pricer_models::instruments::OptionType;
use pricer_models::models::{LatticeArity, LatticeParams};
use pricer_pricing::lattice::{LatticeEngine, RetentionMode};
use rayon::prelude::*;

/// Call and put prices of one lattice in both exercise styles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeQuotes {
    /// Lattice parameters the prices were computed with.
    pub params: LatticeParams,
    /// European call.
    pub european_call: f64,
    /// European put.
    pub european_put: f64,
    /// American call.
    pub american_call: f64,
    /// American put.
    pub american_put: f64,
}

impl LatticeQuotes {
    /// Prices calls and puts on one lattice; each backward pass yields both styles.
    pub fn compute(
        market: &MarketParams,
        steps: usize,
        arity: LatticeArity,
    ) -> Result<Self, PricingError> {
        let engine = LatticeEngine::new(market, steps, arity)?;
        let call = engine.value(OptionType::Call, RetentionMode::PriceOnly)?;
        let put = engine.value(OptionType::Put, RetentionMode::PriceOnly)?;
        Ok(Self {
            params: *engine.params(),
            european_call: call.european,
            european_put: put.european,
            american_call: call.american,
            american_put: put.american,
        })
    }

    /// Lattice arity.
    #[inline]
    pub fn arity(&self) -> LatticeArity {
        self.params.arity()
    }

    /// Step count.
    #[inline]
    pub fn steps(&self) -> usize {
        self.params.steps()
    }

    /// European price of `option_type`.
    pub fn european(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.european_call,
            OptionType::Put => self.european_put,
        }
    }

    /// American price of `option_type`.
    pub fn american(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.american_call,
            OptionType::Put => self.american_put,
        }
    }
}

/// The completed result set the battery checks.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationInputs {
    /// Market snapshot.
    pub market: MarketParams,
    /// Closed-form European call.
    pub analytic_call: f64,
    /// Closed-form European put.
    pub analytic_put: f64,
    /// Both lattices at the reference step count.
    pub reference: Vec<LatticeQuotes>,
    /// Both lattices at the convergence-target step count.
    pub convergence: Vec<LatticeQuotes>,
}

impl ValidationInputs {
    /// Prices everything the battery needs, lattices in parallel.
    ///
    /// The convergence lattices are reused when both step counts coincide.
    pub fn compute(
        market: &MarketParams,
        reference_steps: usize,
        convergence_steps: usize,
    ) -> Result<Self, PricingError> {
        let analytic_call = BlackScholes::valuation(market, OptionType::Call)?.price;
        let analytic_put = BlackScholes::valuation(market, OptionType::Put)?.price;

        let mut jobs: Vec<(usize, LatticeArity)> = LatticeArity::ALL
            .iter()
            .map(|&arity| (reference_steps, arity))
            .collect();
        if convergence_steps != reference_steps {
            jobs.extend(LatticeArity::ALL.iter().map(|&arity| (convergence_steps, arity)));
        }

        let quotes = jobs
            .par_iter()
            .map(|&(steps, arity)| LatticeQuotes::compute(market, steps, arity))
            .collect::<Result<Vec<_>, PricingError>>()?;

        let reference: Vec<LatticeQuotes> = quotes
            .iter()
            .filter(|q| q.steps() == reference_steps)
            .copied()
            .collect();
        let convergence: Vec<LatticeQuotes> = quotes
            .iter()
            .filter(|q| q.steps() == convergence_steps)
            .copied()
            .collect();

        Ok(Self {
            market: *market,
            analytic_call,
            analytic_put,
            reference,
            convergence,
        })
    }

    /// Closed-form price of `option_type`.
    pub fn analytic(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.analytic_call,
            OptionType::Put => self.analytic_put,
        }
    }
}
