use ads_metrics::calculators::{
    channel_roas, AbTestInput, AttributionInput, AuctionInput, BudgetScalerInput, DaypartInput,
    DeviceInput, GeoInput, LeadCacInput, LtvInput, MatchTypeInput, MediaMixInput, MixAdvice,
    PmaxInput, QualityScoreInput, SearchTermInput, SeasonalityInput, StrategyConfig, ToolsConfig,
};
use ads_metrics::{
    compute, CalculatorId, CalculatorRequest, Classification, MetricsConfig, MetricsError,
    ModuleId, CATALOG,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

fn approx(actual: Option<f64>, expected: f64, tolerance: f64) -> bool {
    actual.is_some_and(|value| (value - expected).abs() < tolerance)
}

#[test]
fn pmax_defaults_expose_brand_inflation() {
    let result = PmaxInput::default().compute(&MetricsConfig::default().optimization);

    assert!(approx(result.total_revenue.value(), 25_000.0, 1e-6));
    assert!(approx(result.brand_revenue.value(), 15_000.0, 1e-6));
    assert!(approx(result.non_brand_spend.value(), 4_000.0, 1e-6));
    assert!(approx(result.true_roas.value(), 2.5, 1e-6));
    // Exactly at the threshold is not healthy.
    assert!(!result.healthy);
    assert_eq!(result.to_metric().classification, Some(Classification::Bad));
}

#[test]
fn pmax_true_roas_never_negative() {
    let config = MetricsConfig::default().optimization;
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..500 {
        let input = PmaxInput {
            spend: rng.gen_range(1.0..50_000.0),
            roas: rng.gen_range(0.0..20.0),
            brand_roas: rng.gen_range(0.0..40.0),
            brand_share_pct: rng.gen_range(0.0..100.0),
        };
        let result = input.compute(&config);
        assert!(result.true_roas.value().is_some_and(|roas| roas >= 0.0));
        assert!(result.non_brand_revenue.value().is_some_and(|revenue| revenue >= 0.0));
    }
}

#[test]
fn pmax_without_brand_share_reports_plain_roas() {
    let config = MetricsConfig::default().optimization;
    let input = PmaxInput {
        brand_share_pct: 0.0,
        ..PmaxInput::default()
    };
    assert!(approx(input.compute(&config).true_roas.value(), input.roas, 1e-9));

    let all_brand = PmaxInput {
        brand_share_pct: 100.0,
        ..PmaxInput::default()
    };
    assert_eq!(all_brand.compute(&config).true_roas.value(), Some(0.0));
}

#[test]
fn channel_roas_decays_with_spend_and_respects_floor() {
    let config = StrategyConfig::default();
    let mut rng = StdRng::seed_from_u64(42);
    let mut spends: Vec<f64> = (0..200).map(|_| rng.gen_range(0.0..120_000.0)).collect();
    spends.sort_by(|a, b| a.total_cmp(b));

    let mut previous = f64::INFINITY;
    for spend in spends {
        let roas = channel_roas(spend, config.google_base_roas, &config);
        assert!(roas >= config.roas_floor);
        assert!(roas <= previous + 1e-12);
        previous = roas;
    }
    assert_eq!(channel_roas(0.0, 6.0, &config), 6.0);
}

#[test]
fn media_mix_defaults_are_balanced() {
    let result = MediaMixInput::default().compute(&StrategyConfig::default());

    assert!((result.google_spend - 12_000.0).abs() < 1e-6);
    assert!((result.facebook_spend - 8_000.0).abs() < 1e-6);
    assert!(approx(result.blended_roas.value(), 3.9889, 1e-3));
    assert_eq!(result.advice, MixAdvice::Balanced);
}

#[test]
fn media_mix_zero_budget_has_no_blended_roas() {
    let input = MediaMixInput {
        budget: 0.0,
        ..MediaMixInput::default()
    };
    let result = input.compute(&StrategyConfig::default());
    assert!(!result.blended_roas.is_applicable());
}

#[test]
fn ltv_ratio_requires_positive_cpa() {
    let config = StrategyConfig::default();
    let healthy = LtvInput::default().compute(&config);
    assert_eq!(healthy.ratio.value(), Some(4.0));
    assert!(healthy.healthy);

    let degenerate = LtvInput {
        cpa: 0.0,
        ..LtvInput::default()
    }
    .compute(&config);
    assert!(!degenerate.ratio.is_applicable());
    assert!(!degenerate.healthy);
}

#[test]
fn seasonality_compounds_uplift_and_cpc() {
    let result = SeasonalityInput::default().compute();
    assert!(approx(result.recommended_spend.value(), 975.0, 1e-9));
    assert!(approx(result.multiplier.value(), 1.95, 1e-9));

    let subtext = result.to_metric().subtext.unwrap_or_default();
    assert!(subtext.ends_with("x the everyday budget"));

    let no_base = SeasonalityInput {
        base_spend: 0.0,
        ..SeasonalityInput::default()
    }
    .compute();
    assert_eq!(no_base.recommended_spend.value(), Some(0.0));
    assert!(!no_base.multiplier.is_applicable());
}

#[test]
fn ab_test_defaults_are_not_significant() {
    let result = AbTestInput::default().compute(&ToolsConfig::default());

    assert!(approx(result.z_score.value(), 0.9808, 1e-3));
    assert!(approx(result.relative_lift_pct.value(), 20.0, 1e-9));
    assert!(!result.significant);
    assert_eq!(result.to_metric().subtext.as_deref(), Some("Not significant"));
}

#[test]
fn ab_test_large_samples_become_significant() {
    let input = AbTestInput {
        control_clicks: 20_000.0,
        control_conversions: 1_000.0,
        variant_clicks: 20_000.0,
        variant_conversions: 1_200.0,
    };
    let result = input.compute(&ToolsConfig::default());
    assert!(result.significant);
    assert_eq!(result.to_metric().classification, Some(Classification::Good));
}

#[test]
fn ab_test_without_clicks_is_inconclusive() {
    let input = AbTestInput {
        control_clicks: 0.0,
        control_conversions: 0.0,
        variant_clicks: 0.0,
        variant_conversions: 0.0,
    };
    let result = input.compute(&ToolsConfig::default());
    assert!(!result.z_score.is_applicable());
    assert!(!result.significant);
}

#[test]
fn budget_scaler_picks_most_profitable_point() {
    let result = BudgetScalerInput::default().compute(&MetricsConfig::default().simulation);

    let profits: Vec<Option<f64>> = result.points.iter().map(|p| p.profit.value()).collect();
    assert_eq!(profits.len(), 4);
    assert!(approx(profits[0], 110.0, 1e-9));
    assert!(approx(profits[3], 330.0, 1e-9));
    assert_eq!(result.best().map(|point| point.scale), Some(3.0));
}

#[test]
fn default_requests_cover_every_calculator() {
    let config = MetricsConfig::default();
    for id in CalculatorId::all() {
        let request = CalculatorRequest::with_defaults(id);
        assert_eq!(request.id(), id);

        let first = request.compute(&config);
        let second = request.compute(&config);
        assert_eq!(first, second);
        assert_eq!(first.calculator, id);
        assert!(!first.figures.is_empty(), "{} has no figures", id.tab());
    }
}

#[test]
fn compute_merges_fields_over_defaults() {
    let config = MetricsConfig::default();
    let result = compute(CalculatorId::Pacer, json!({ "spent": 2_500.0 }), &config)
        .expect("pacer computes");

    assert!(approx(result.get("progress_pct").and_then(|f| f.value()), 50.0, 1e-9));
    assert!(approx(result.get("remaining").and_then(|f| f.value()), 2_500.0, 1e-9));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = CalculatorRequest::from_fields(CalculatorId::Ltv, json!({ "margin": 3 }))
        .expect_err("unknown field");
    assert!(matches!(err, MetricsError::InvalidInput { ref calculator, .. } if calculator == "ltv"));
}

#[test]
fn request_fields_round_trip_through_from_fields() {
    let request = CalculatorRequest::with_defaults(CalculatorId::Device);
    let fields = request.fields().expect("fields serialize");
    let rebuilt = CalculatorRequest::from_fields(CalculatorId::Device, fields).expect("rebuild");
    assert_eq!(rebuilt, request);
}

#[test]
fn catalog_order_matches_ids() {
    for (index, info) in CATALOG.iter().enumerate() {
        assert_eq!(info.id as usize, index);
        assert_eq!(CalculatorId::from_tab(info.tab), Some(info.id));
        assert_ne!(info.module, ModuleId::Hub);
    }
    assert_eq!(CalculatorId::from_tab("nope"), None);
}

#[test]
fn every_module_default_tab_belongs_to_it() {
    for module in ModuleId::ALL {
        match module.default_tab() {
            Some(tab) => assert_eq!(tab.module(), module),
            None => assert_eq!(module, ModuleId::Hub),
        }
    }
    assert_eq!(ModuleId::Tools.calculators().count(), 6);
}

#[test]
fn search_term_cleanup_lifts_roas() {
    let result = SearchTermInput::default().compute();
    assert!(approx(result.after_roas.value(), 2.941_176, 1e-6));
    assert!(approx(result.uplift_pct.value(), 17.647_059, 1e-6));

    let metric = result.to_metric();
    assert_eq!(metric.classification, Some(Classification::Good));
    assert_eq!(metric.subtext.as_deref(), Some("Uplift +18%"));

    let all_wasted = SearchTermInput {
        wasted_pct: 100.0,
        ..SearchTermInput::default()
    }
    .compute();
    assert!(!all_wasted.after_roas.is_applicable());
    assert!(!all_wasted.uplift_pct.is_applicable());
}

#[test]
fn auction_premium_flags_expensive_rank() {
    let config = MetricsConfig::default().optimization;
    let result = AuctionInput::default().compute(&config);
    assert!(approx(result.required_cpc.value(), 3.625, 1e-9));
    assert!(approx(result.increase_pct.value(), 45.0, 1e-9));
    assert_eq!(result.to_metric().classification, Some(Classification::Bad));

    let already_there = AuctionInput {
        target_share_pct: 10.0,
        ..AuctionInput::default()
    }
    .compute(&config);
    assert!(approx(already_there.required_cpc.value(), 2.5, 1e-9));
    assert!(!already_there.alert);
    assert_eq!(already_there.to_metric().classification, Some(Classification::Warning));
}

#[test]
fn daypart_modifier_lowers_expensive_slots() {
    let result = DaypartInput::default().compute();
    assert!(approx(result.modifier_pct.value(), -33.333_333, 1e-5));
    assert_eq!(result.to_metric().classification, Some(Classification::Bad));

    let cheap = DaypartInput {
        actual_cpa: 20.0,
        ..DaypartInput::default()
    }
    .compute();
    assert!(approx(cheap.modifier_pct.value(), 50.0, 1e-9));
    assert_eq!(cheap.to_metric().classification, Some(Classification::Good));

    let no_cost = DaypartInput {
        actual_cpa: 0.0,
        ..DaypartInput::default()
    }
    .compute();
    assert!(!no_cost.modifier_pct.is_applicable());
    assert_eq!(no_cost.to_metric().classification, Some(Classification::Neutral));
}

#[test]
fn geo_blend_weights_tiers() {
    let result = GeoInput::default().compute(&MetricsConfig::default().optimization);
    assert!(approx(result.blended_roas.value(), 2.15, 1e-9));
}

#[test]
fn match_type_blend_is_healthy_at_defaults() {
    let result = MatchTypeInput::default().compute(&MetricsConfig::default().simulation);
    assert!(approx(result.blended_roas.value(), 3.55, 1e-9));
    assert!(result.healthy);
    assert_eq!(result.to_metric().classification, Some(Classification::Good));

    let all_broad = MatchTypeInput {
        broad_share_pct: 100.0,
    }
    .compute(&MetricsConfig::default().simulation);
    assert_eq!(all_broad.to_metric().classification, Some(Classification::Warning));
}

#[test]
fn device_blend_weights_mobile_bid() {
    let result = DeviceInput::default().compute();
    assert!(approx(result.mobile_bid.value(), 2.4, 1e-9));
    assert!(approx(result.weighted_cpc.value(), 2.24, 1e-9));
}

#[test]
fn quality_score_halves_cpc_at_five() {
    let result = QualityScoreInput::default().compute(&ToolsConfig::default());
    assert!(approx(result.optimized_cpc.value(), 1.0, 1e-9));
    assert!(approx(result.savings.value(), 1.0, 1e-9));
    assert_eq!(result.to_metric().classification, Some(Classification::Good));
}

#[test]
fn lead_cac_divides_by_close_rate() {
    let result = LeadCacInput::default().compute();
    assert!(approx(result.cac.value(), 200.0, 1e-9));

    let never_closes = LeadCacInput {
        close_rate_pct: 0.0,
        ..LeadCacInput::default()
    }
    .compute();
    assert!(!never_closes.cac.is_applicable());
}

#[test]
fn attribution_lag_correction_floors_reported_share() {
    let config = ToolsConfig::default();
    let result = AttributionInput::default().compute(&config);
    assert!(approx(result.reported_share_pct.value(), 60.0, 1e-9));
    assert!(approx(result.true_roas.value(), 3.333_333, 1e-6));

    let long_lag = AttributionInput {
        lag_days: 20.0,
        ..AttributionInput::default()
    }
    .compute(&config);
    assert!(approx(long_lag.reported_share_pct.value(), 30.0, 1e-9));
    assert!(approx(long_lag.true_roas.value(), 6.666_667, 1e-6));
}

#[test]
fn catalog_formulas_match_typed_dispatch() {
    let config = MetricsConfig::default();
    for info in CATALOG.iter() {
        let from_table = (info.run)(json!({}), &config).expect("defaults compute");
        assert_eq!(from_table.calculator, info.id);
        assert_eq!(from_table, CalculatorRequest::with_defaults(info.id).compute(&config));
    }

    let err = CalculatorId::Geo
        .run(json!({ "tier2_allocation_pct": 40 }), &config)
        .expect_err("unknown field");
    assert!(matches!(err, MetricsError::InvalidInput { .. }));
}
