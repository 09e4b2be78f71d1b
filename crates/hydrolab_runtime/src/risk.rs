//! Environmental risk estimate.
//!
//! A fixed four-node network:
//!
//! ```text
//! IndustryNearby -> ChemicalPollution --\
//!                                        +--> TotalRisk
//! HeavyRain      -> IncreasedTurbidity -/
//! ```
//!
//! Both causes are observed, so P(`TotalRisk` | evidence) is computed by
//! summing over the two hidden middle nodes.

use std::fmt;

use hydrolab_engine::{Evidence, OracleError, RiskEstimator};

/// Probability reported when the model cannot be evaluated.
pub const FALLBACK_RISK: f64 = 0.5;

/// Conditional probability tables of the network.
#[derive(Clone, Debug, PartialEq)]
pub struct TabularRiskModel {
    /// P(industry nearby).
    pub prior_industry: f64,
    /// P(heavy rain).
    pub prior_rain: f64,
    /// P(chemical pollution | industry), indexed by `industry as usize`.
    pub chemical_given_industry: [f64; 2],
    /// P(increased turbidity | rain), indexed by `rain as usize`.
    pub turbidity_given_rain: [f64; 2],
    /// P(risk | chemical, turbidity), indexed `[chemical][turbidity]`.
    pub risk_given: [[f64; 2]; 2],
}

impl Default for TabularRiskModel {
    fn default() -> Self {
        Self {
            prior_industry: 0.2,
            prior_rain: 0.3,
            chemical_given_industry: [0.05, 0.60],
            turbidity_given_rain: [0.10, 0.80],
            risk_given: [[0.01, 0.40], [0.60, 0.95]],
        }
    }
}

impl TabularRiskModel {
    fn check(&self) -> Result<(), OracleError> {
        let all = [self.prior_industry, self.prior_rain]
            .into_iter()
            .chain(self.chemical_given_industry)
            .chain(self.turbidity_given_rain)
            .chain(self.risk_given.into_iter().flatten());
        for p in all {
            if !(0.0..=1.0).contains(&p) {
                return Err(OracleError::Invalid(format!("probability out of range: {p}")));
            }
        }
        Ok(())
    }
}

impl RiskEstimator for TabularRiskModel {
    fn risk_probability(&self, evidence: &Evidence) -> Result<f64, OracleError> {
        self.check()?;

        let p_chemical = self.chemical_given_industry[usize::from(evidence.industry_nearby)];
        let p_turbidity = self.turbidity_given_rain[usize::from(evidence.heavy_rain)];

        let mut risk = 0.0;
        for chemical in [false, true] {
            let pc = [1.0 - p_chemical, p_chemical][usize::from(chemical)];
            for turbidity in [false, true] {
                let pt = [1.0 - p_turbidity, p_turbidity][usize::from(turbidity)];
                risk += pc * pt * self.risk_given[usize::from(chemical)][usize::from(turbidity)];
            }
        }
        Ok(risk)
    }
}

/// Outcome of a risk estimate for the report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiskAssessment {
    /// Estimated probability.
    pub probability: f64,
    /// True if the estimator failed and [`FALLBACK_RISK`] was used.
    pub fallback: bool,
    /// True if the probability exceeds the warning level.
    pub elevated: bool,
}

impl RiskAssessment {
    /// Runs `estimator`, falling back to [`FALLBACK_RISK`] on failure.
    #[must_use]
    pub fn assess(estimator: &dyn RiskEstimator, evidence: &Evidence, warning: f64) -> Self {
        let (probability, fallback) = match estimator.risk_probability(evidence) {
            Ok(p) if (0.0..=1.0).contains(&p) => (p, false),
            Ok(p) => {
                tracing::warn!(
                    probability = p,
                    "risk estimate out of range, using fallback"
                );
                (FALLBACK_RISK, true)
            }
            Err(error) => {
                tracing::warn!(%error, "risk estimate failed, using fallback");
                (FALLBACK_RISK, true)
            }
        };
        Self {
            probability,
            fallback,
            elevated: probability > warning,
        }
    }
}

impl fmt::Display for RiskAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environmental risk: {:.1}%", self.probability * 100.0)?;
        if self.fallback {
            write!(f, " (model unavailable)")?;
        }
        if self.elevated {
            write!(f, " - HIGH RISK: immediate checks recommended")?;
        }
        Ok(())
    }
}
