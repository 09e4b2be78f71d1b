//! The water-quality rule base.

use hydrolab_foundation::Result;

use super::{
    CORROSION_PH, CORROSION_SULFATE, Classification, Observation, Parameter, SOLIDS_DATASET_MEAN,
    attrs, critical_problem, kinds, problem, within_range,
};
use crate::diagnosis::InterventionCategory;
use crate::engine::ActionContext;
use crate::notify::Severity;
use crate::pattern::{Condition, FactPattern, Predicate};
use crate::rule::{Rule, RuleBase};

/// Announcement runs before anything else.
const START_SALIENCE: i32 = 100;

/// Category inference waits until every diagnostic rule has fired.
const CATEGORY_SALIENCE: i32 = -10;

/// Builds the water-quality rule base.
///
/// Registration order is also the tie-break order: start announcement,
/// one threshold rule per [`Parameter`], the corrosion rule, observation
/// rules, then category inference (chemical, physical, critical).
///
/// # Errors
/// Returns an error only if two rules share a name.
pub fn rule_base() -> Result<RuleBase> {
    let mut rules = RuleBase::new();

    rules.add(announce_start())?;
    for param in Parameter::ALL {
        rules.add(threshold_rule(param))?;
    }
    rules.add(corrosion_rule())?;

    rules.add(turbid_confirmed())?;
    rules.add(turbid_unconfirmed())?;
    for observation in [Observation::Odor, Observation::Taste, Observation::Sediment] {
        rules.add(advisory_rule(observation))?;
    }

    for category in [InterventionCategory::Chemical, InterventionCategory::Physical] {
        rules.add(category_rule(category))?;
    }
    rules.add(critical_rule())?;

    Ok(rules)
}

// =============================================================================
// Diagnostic Rules
// =============================================================================

fn announce_start() -> Rule {
    Rule::new("announce-start", FactPattern::new(kinds::START), |_, ctx| {
        ctx.notify(Severity::Info, "Water quality analysis started");
    })
    .with_salience(START_SALIENCE)
}

/// Checks one parameter's readings against its limits.
///
/// Notifications are per reading but the problem count is per problem fact:
/// pH 5.0 and pH 4.0 raise two alarms and count one acidic problem.
fn threshold_rule(param: Parameter) -> Rule {
    let pattern = FactPattern::new(kinds::READING)
        .equals(attrs::PARAM, param.name())
        .bind_number(attrs::VALUE, "value");

    Rule::new(format!("check-{param}"), pattern, move |bindings, ctx| {
        let Some(value) = bindings.number("value") else {
            return;
        };
        let limits = param.limits(ctx.oracle());

        match param.classify(value, limits) {
            Classification::Low(label) => {
                report_problem(ctx, param, label, value, limits.min);
            }
            Classification::High(label) => {
                report_problem(ctx, param, label, value, limits.max);
            }
            Classification::InRange => {
                ctx.assert(within_range(param));
                let amount = quantity(param, value);
                let message = format!("{} within limits ({amount})", param.display_name());
                ctx.notify(Severity::Success, message);
                if param == Parameter::Solids {
                    check_dataset_mean(ctx, value);
                }
            }
        }
    })
}

fn report_problem(
    ctx: &mut ActionContext<'_>,
    param: Parameter,
    label: &str,
    value: f64,
    limit: Option<f64>,
) {
    if ctx.assert(problem(param, label)) {
        ctx.record_problem();
    }
    let limit = match limit {
        Some(limit) => format!(" (limit {})", quantity(param, limit)),
        None => String::new(),
    };
    let amount = quantity(param, value);
    let message = match (param, label) {
        (Parameter::Ph, "acidic") => format!("ALARM: acidic pH ({value}), corrosive to pipes"),
        (Parameter::Ph, _) => format!("ALARM: basic pH ({value})"),
        (Parameter::Hardness, _) => format!("Very hard water: {amount}{limit}"),
        _ => {
            let direction = if label == param.low_label() {
                "low"
            } else {
                "high"
            };
            format!("{} too {direction}: {amount}{limit}", param.display_name())
        }
    };
    ctx.notify(param.severity(), message);
}

fn check_dataset_mean(ctx: &mut ActionContext<'_>, value: f64) {
    let mean = ctx.threshold(
        Parameter::Solids.ontology_class(),
        "dataset_mean",
        SOLIDS_DATASET_MEAN,
    );
    if value > mean {
        ctx.notify(
            Severity::Warning,
            format!("Dissolved solids ({value}) above the dataset mean ({mean:.0})"),
        );
    }
}

fn quantity(param: Parameter, value: f64) -> String {
    match param.unit() {
        "" => value.to_string(),
        unit => format!("{value} {unit}"),
    }
}

fn corrosion_rule() -> Rule {
    let condition = Condition::all([
        FactPattern::new(kinds::READING)
            .equals(attrs::PARAM, Parameter::Ph.name())
            .test(attrs::VALUE, Predicate::below(CORROSION_PH))
            .bind(attrs::VALUE, "ph")
            .into(),
        FactPattern::new(kinds::READING)
            .equals(attrs::PARAM, Parameter::Sulfate.name())
            .test(attrs::VALUE, Predicate::above(CORROSION_SULFATE))
            .bind(attrs::VALUE, "sulfate")
            .into(),
    ]);

    Rule::new("detect-corrosion", condition, |bindings, ctx| {
        if ctx.assert(critical_problem()) {
            let ph = bindings.number("ph").unwrap_or(f64::NAN);
            let sulfate = bindings.number("sulfate").unwrap_or(f64::NAN);
            let message = format!("CRITICAL: corrosive water (pH {ph}, sulfate {sulfate} mg/L)");
            ctx.notify(Severity::Error, message + ". The water is NOT potable");
        }
    })
}

// =============================================================================
// Observation Rules
// =============================================================================

fn observed(observation: Observation) -> FactPattern {
    FactPattern::new(kinds::OBSERVATION).equals(attrs::NAME, observation.name())
}

fn problem_with(param: Parameter) -> FactPattern {
    FactPattern::new(kinds::PROBLEM).equals(attrs::PARAM, param.name())
}

fn turbid_confirmed() -> Rule {
    let condition = Condition::all([
        observed(Observation::Turbid).into(),
        problem_with(Parameter::Turbidity).into(),
    ]);
    Rule::new("turbid-confirmed", condition, |_, ctx| {
        ctx.notify(
            Severity::Info,
            "Visual turbidity confirmed by the measurement",
        );
    })
}

fn turbid_unconfirmed() -> Rule {
    let condition = Condition::all([
        observed(Observation::Turbid).into(),
        FactPattern::new(kinds::WITHIN_RANGE)
            .equals(attrs::PARAM, Parameter::Turbidity.name())
            .into(),
    ]);
    Rule::new("turbid-unconfirmed", condition, |_, ctx| {
        ctx.notify(
            Severity::Warning,
            "Water looks turbid but measured turbidity is within range; re-check the sample",
        );
    })
}

fn advisory_rule(observation: Observation) -> Rule {
    let message = match observation {
        Observation::Odor => "Bad odor reported: check for hydrogen sulfide or excess chlorine",
        Observation::Taste => "Metallic or bitter taste reported: check for dissolved metals",
        Observation::Sediment => "Sediment reported: check the filtration stage",
        Observation::Turbid => "Turbid appearance reported",
    };
    Rule::new(format!("observe-{observation}"), observed(observation), move |_, ctx| {
        ctx.notify(Severity::Info, message);
    })
}

// =============================================================================
// Category Inference
// =============================================================================

fn category_rule(category: InterventionCategory) -> Rule {
    let branches = Parameter::ALL
        .into_iter()
        .filter(|p| p.category() == category)
        .map(|p| Condition::from(problem_with(p)));

    Rule::new(format!("infer-{category}"), Condition::any(branches), move |_, ctx| {
        ctx.suggest_intervention(category);
    })
    .with_salience(CATEGORY_SALIENCE)
}

fn critical_rule() -> Rule {
    let pattern = FactPattern::new(kinds::PROBLEM_TYPE)
        .equals(attrs::LEVEL, InterventionCategory::Critical.as_str());
    Rule::new("infer-critical", pattern, |_, ctx| {
        ctx.suggest_intervention(InterventionCategory::Critical);
    })
    .with_salience(CATEGORY_SALIENCE)
}
