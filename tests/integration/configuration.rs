//! Configuration-driven thresholds

use hydrolab::engine::water::Parameter;
use hydrolab::engine::{InterventionCategory, SemanticCheck, ThresholdOracle};
use hydrolab::runtime::{
    Oracles, RuntimeConfig, Sample, StaticOntology, TabularRiskModel, analyze,
};

fn analyze_with(config: &RuntimeConfig, sample: &Sample) -> Option<InterventionCategory> {
    let rules = hydrolab::engine::water::rule_base().unwrap();
    let ontology = StaticOntology::from_config(config);
    let model = TabularRiskModel::default();
    let oracles = Oracles {
        thresholds: &ontology,
        semantics: &ontology,
        risk: &model,
    };
    analyze(&rules, sample, &oracles, config, false)
        .unwrap()
        .intervention()
}

#[test]
fn configured_limit_tightens_the_rule() {
    let sample = Sample::new().with_reading(Parameter::Sulfate, 220.0);
    assert_eq!(analyze_with(&RuntimeConfig::default(), &sample), None);

    let strict = RuntimeConfig::from_toml("[thresholds.Sulfate]\nmax = 200\n").unwrap();
    assert_eq!(
        analyze_with(&strict, &sample),
        Some(InterventionCategory::Chemical)
    );
}

#[test]
fn class_names_are_case_insensitive() {
    let config = RuntimeConfig::from_toml("[thresholds.turbidity]\nmax = 10\n").unwrap();
    let ontology = StaticOntology::from_config(&config);
    assert_eq!(ontology.lookup("Turbidity", "max"), Ok(10.0));

    let sample = Sample::new().with_reading(Parameter::Turbidity, 7.0);
    assert_eq!(analyze_with(&config, &sample), None);
}

#[test]
fn corrosion_definition_is_configurable() {
    let toml = "[thresholds.CorrosiveWater]\nmax_ph = 7.0\nmin_sulfate = 100\n";
    let config = RuntimeConfig::from_toml(toml).unwrap();
    let ontology = StaticOntology::from_config(&config);
    assert_eq!(ontology.is_corrosive(6.5, 150.0), Ok(true));
    assert_eq!(
        StaticOntology::standard().is_corrosive(6.5, 150.0),
        Ok(false)
    );
}

#[test]
fn unconfigured_values_keep_their_defaults() {
    let config = RuntimeConfig::from_toml("[thresholds.ph]\nmin = 6.0\n").unwrap();
    let ontology = StaticOntology::from_config(&config);
    assert_eq!(ontology.lookup("ph", "min"), Ok(6.0));
    assert_eq!(ontology.lookup("ph", "max"), Ok(8.5));
}

#[test]
fn engine_limit_comes_from_config() {
    let config = RuntimeConfig::from_toml("[engine]\nmax_activations = 1\n").unwrap();
    let rules = hydrolab::engine::water::rule_base().unwrap();
    let ontology = StaticOntology::standard();
    let model = TabularRiskModel::default();
    let oracles = Oracles {
        thresholds: &ontology,
        semantics: &ontology,
        risk: &model,
    };
    let sample = Sample::new()
        .with_reading(Parameter::Ph, 7.0)
        .with_reading(Parameter::Sulfate, 100.0);
    assert!(analyze(&rules, &sample, &oracles, &config, false).is_err());
}
