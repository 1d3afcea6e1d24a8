use ads_metrics::diagnosis::{DiagnosisConfig, Rule, RULES};
use ads_metrics::{diagnose, evaluate, CalculatorId, DiagnosisSnapshot, ModuleId, Severity};

fn tabs(snapshot: &DiagnosisSnapshot) -> Vec<CalculatorId> {
    evaluate(snapshot, &DiagnosisConfig::default())
        .into_iter()
        .map(|recommendation| recommendation.target_tab)
        .collect()
}

#[test]
fn reference_snapshot_fires_every_warning_rule() {
    let snapshot = DiagnosisSnapshot::default();
    let diagnosis = diagnose(&snapshot, &DiagnosisConfig::default());

    assert!((diagnosis.gaps.roas_gap_pct.unwrap_or(0.0) + 33.333_333).abs() < 1e-3);
    assert!((diagnosis.gaps.cpa_gap_pct.unwrap_or(0.0) - 50.0).abs() < 1e-9);
    assert!((diagnosis.gaps.spend_rate_pct.unwrap_or(0.0) - 96.0).abs() < 1e-9);

    let targets: Vec<CalculatorId> = diagnosis
        .recommendations
        .iter()
        .map(|recommendation| recommendation.target_tab)
        .collect();
    assert_eq!(
        targets,
        vec![
            CalculatorId::SearchTerm,
            CalculatorId::Daypart,
            CalculatorId::Pacer,
            CalculatorId::Auction,
        ]
    );

    let first = &diagnosis.recommendations[0];
    assert_eq!(first.severity, Severity::Critical);
    assert_eq!(first.target_module, ModuleId::Optimization);
    assert!(first.description.contains("33%"));
    assert!(diagnosis.recommendations[1].description.contains("50%"));
    assert_eq!(diagnosis.recommendations[3].severity, Severity::Opportunity);
}

#[test]
fn healthy_snapshot_suggests_scaling() {
    let snapshot = DiagnosisSnapshot {
        roas: 3.5,
        target_roas: 3.0,
        cpa: 25.0,
        target_cpa: 30.0,
        budget: 5_000.0,
        spent: 1_000.0,
    };
    assert_eq!(
        tabs(&snapshot),
        vec![CalculatorId::Seasonality, CalculatorId::Auction]
    );
}

#[test]
fn exact_targets_count_as_scale_ready() {
    let snapshot = DiagnosisSnapshot {
        roas: 3.0,
        target_roas: 3.0,
        cpa: 30.0,
        target_cpa: 30.0,
        budget: 5_000.0,
        spent: 4_750.0,
    };
    // 95% spend is at, not over, the threshold.
    assert_eq!(
        tabs(&snapshot),
        vec![CalculatorId::Seasonality, CalculatorId::Auction]
    );
}

#[test]
fn zero_denominators_still_raise_critical_alerts() {
    let snapshot = DiagnosisSnapshot {
        roas: 2.0,
        target_roas: 0.0,
        cpa: 45.0,
        target_cpa: 0.0,
        budget: 0.0,
        spent: 100.0,
    };
    let diagnosis = diagnose(&snapshot, &DiagnosisConfig::default());

    // Displayed gaps stay not applicable even though the rules fire.
    assert!(!diagnosis.gaps.roas_gap_pct.is_applicable());
    assert!(!diagnosis.gaps.cpa_gap_pct.is_applicable());
    assert!(!diagnosis.gaps.spend_rate_pct.is_applicable());

    let targets: Vec<CalculatorId> = diagnosis
        .recommendations
        .iter()
        .map(|recommendation| recommendation.target_tab)
        .collect();
    assert_eq!(
        targets,
        vec![CalculatorId::Daypart, CalculatorId::Pacer, CalculatorId::Auction]
    );
    assert!(diagnosis.recommendations[0].description.starts_with("CPA is far over target"));
}

#[test]
fn zero_over_zero_gaps_never_fire() {
    let snapshot = DiagnosisSnapshot {
        roas: 0.0,
        target_roas: 0.0,
        cpa: 0.0,
        target_cpa: 0.0,
        budget: 0.0,
        spent: 0.0,
    };
    assert_eq!(tabs(&snapshot), vec![CalculatorId::Auction]);
}

#[test]
fn gap_descriptions_round_half_away_from_zero() {
    let snapshot = DiagnosisSnapshot {
        roas: 2.625,
        target_roas: 3.0,
        cpa: 44.0,
        target_cpa: 32.0,
        budget: 5_000.0,
        spent: 1_000.0,
    };
    let recommendations = evaluate(&snapshot, &DiagnosisConfig::default());

    assert_eq!(recommendations[0].target_tab, CalculatorId::SearchTerm);
    assert!(recommendations[0].description.starts_with("Current ROAS is 13% below target"));
    assert_eq!(recommendations[1].target_tab, CalculatorId::Daypart);
    assert!(recommendations[1].description.starts_with("CPA is 38% over target"));
}

#[test]
fn thresholds_come_from_config() {
    let strict = DiagnosisConfig {
        roas_gap_pct: -50.0,
        cpa_gap_pct: 60.0,
        spend_rate_pct: 99.0,
    };
    let recommendations = evaluate(&DiagnosisSnapshot::default(), &strict);
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0].target_tab, CalculatorId::Auction);
}

#[test]
fn every_rule_links_to_a_routable_tab() {
    for rule in RULES {
        let target = rule.target();
        assert_eq!(CalculatorId::from_tab(target.tab()), Some(target));
        assert_ne!(target.module(), ModuleId::Hub);
    }
    assert!(Rule::AuctionCheck.matches(
        &DiagnosisSnapshot::default().gaps(),
        &DiagnosisConfig::default()
    ));
}
