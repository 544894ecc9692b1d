use finlit_core::grading::{grade_answers, grade_input, GradeInput, GradeItem};
use rust_decimal_macros::dec;

// ===========================================================================
// Answer grading tests (wire shapes the exercise client actually sends)
// ===========================================================================

#[test]
fn test_client_payload_grades_mixed_answers() {
    // Decimals travel as strings to keep the client float-free.
    let payload = r#"{
        "answers": [
            { "id": "payment", "submitted": "$448.90", "expected": "449.13" },
            { "id": "interest", "submitted": "2,559.00", "expected": "2572.80" },
            { "id": "principal", "submitted": "wat", "expected": "24375" }
        ]
    }"#;
    let input: GradeInput = serde_json::from_str(payload).unwrap();
    let output = grade_answers(&input).unwrap();

    assert_eq!(output.result.correct_count, 2);
    assert_eq!(output.result.total_count, 3);
    assert!((output.result.percent_correct - dec!(66.6667)).abs() < dec!(0.001));
    assert!(output
        .warnings
        .iter()
        .any(|w| w.contains("did not parse")));
}

#[test]
fn test_item_tolerance_overrides_default() {
    let input = GradeInput {
        answers: vec![
            GradeItem {
                id: "strict".into(),
                submitted: "449.13".into(),
                expected: dec!(448.90),
                tolerance_pct: Some(dec!(0)),
            },
            GradeItem {
                id: "default_band".into(),
                submitted: "449.13".into(),
                expected: dec!(448.90),
                tolerance_pct: None,
            },
        ],
        default_tolerance_pct: None,
    };
    let output = grade_answers(&input).unwrap();
    let results = &output.result.results;

    assert!(!results[0].correct);
    assert!(results[1].correct);

    // |449.13 - 448.90| / 448.90 ~ 0.0512%
    let err = results[1].relative_error_pct.unwrap();
    assert!(err > dec!(0.05) && err < dec!(0.06));
}

#[test]
fn test_zero_reference_admits_exact_zero_only() {
    assert!(grade_input("0", dec!(0), dec!(2)));
    assert!(grade_input("$0", dec!(0), dec!(2)));
    assert!(!grade_input("0.0001", dec!(0), dec!(2)));

    let input = GradeInput {
        answers: vec![GradeItem {
            id: "residual".into(),
            submitted: "0".into(),
            expected: dec!(0),
            tolerance_pct: None,
        }],
        default_tolerance_pct: None,
    };
    let output = grade_answers(&input).unwrap();
    assert!(output.result.results[0].correct);
    assert_eq!(output.result.results[0].relative_error_pct, None);
}

#[test]
fn test_wide_tolerance_is_flagged() {
    let input = GradeInput {
        answers: vec![GradeItem {
            id: "ballpark".into(),
            submitted: "115".into(),
            expected: dec!(100),
            tolerance_pct: None,
        }],
        default_tolerance_pct: Some(dec!(15)),
    };
    let output = grade_answers(&input).unwrap();
    assert!(output.result.results[0].correct);
    assert!(output.warnings.iter().any(|w| w.contains("wide bands")));
}

#[test]
fn test_envelope_wire_shape() {
    let input = GradeInput {
        answers: vec![GradeItem {
            id: "q1".into(),
            submitted: "100".into(),
            expected: dec!(100),
            tolerance_pct: None,
        }],
        default_tolerance_pct: None,
    };
    let output = grade_answers(&input).unwrap();
    let value = serde_json::to_value(&output).unwrap();

    assert!(value.get("result").is_some());
    assert!(value.get("methodology").is_some());
    assert!(value.get("assumptions").is_some());
    assert_eq!(value["metadata"]["precision"], "rust_decimal_128bit");
    assert_eq!(value["result"]["correct_count"], serde_json::json!(1));
}

// ---------------------------------------------------------------------------
// Scripted coach over the same wire conventions
// ---------------------------------------------------------------------------

#[cfg(feature = "coach")]
mod scripted_coach {
    use finlit_core::coach::{coach_reply, CoachInput};

    #[test]
    fn test_history_payload_round_trips() {
        let payload = r#"{
            "history": [
                { "role": "learner", "content": "what does APR actually cost me?" },
                { "role": "coach", "content": "APR is the yearly cost of borrowing." },
                { "role": "learner", "content": "ok, and why does diversification help?" }
            ]
        }"#;
        let input: CoachInput = serde_json::from_str(payload).unwrap();
        let output = coach_reply(&input).unwrap();

        assert_eq!(output.result.matched_keyword.as_deref(), Some("diversif"));

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["assumptions"]["history_turns"], serde_json::json!(3));
        assert_eq!(value["assumptions"]["custom_script"], serde_json::json!(false));
    }

    #[test]
    fn test_fallback_surfaces_in_warnings() {
        let payload = r#"{
            "history": [ { "role": "learner", "content": "tell me a joke" } ]
        }"#;
        let input: CoachInput = serde_json::from_str(payload).unwrap();
        let output = coach_reply(&input).unwrap();

        assert_eq!(output.result.matched_keyword, None);
        assert!(output.warnings.iter().any(|w| w.contains("fallback")));
    }
}

// ---------------------------------------------------------------------------
// Fixture-backed answer keys
// ---------------------------------------------------------------------------

#[cfg(feature = "fixtures")]
mod fixture_answer_keys {
    use finlit_core::amortization::build_amortization;
    use finlit_core::fixtures::{
        crisis_scenarios, investment_universe, showroom_purchase, worksheet_loan,
    };
    use finlit_core::grading::{grade_answers, GradeInput, GradeItem};
    use finlit_core::loan_costs::purchase::financed_principal;
    use finlit_core::portfolio::stress::{stress_impact, StressInput};
    use rust_decimal_macros::dec;

    #[test]
    fn test_worksheet_answers_grade_against_computed_references() {
        let schedule = build_amortization(&worksheet_loan()).unwrap().result;
        let financed = financed_principal(&showroom_purchase()).unwrap();

        // Submissions as a learner would type them, references as the
        // engines compute them.
        let input = GradeInput {
            answers: vec![
                GradeItem {
                    id: "monthly_payment".into(),
                    submitted: "$449.13".into(),
                    expected: schedule.payment,
                    tolerance_pct: None,
                },
                GradeItem {
                    id: "total_interest".into(),
                    submitted: "2,559".into(),
                    expected: schedule.total_interest,
                    tolerance_pct: None,
                },
                GradeItem {
                    id: "amount_financed".into(),
                    submitted: "26161.50".into(),
                    expected: financed,
                    tolerance_pct: None,
                },
            ],
            default_tolerance_pct: None,
        };
        let output = grade_answers(&input).unwrap();
        assert_eq!(output.result.correct_count, 3);
    }

    #[test]
    fn test_equal_weight_universe_gfc_loss_near_25_pct() {
        let universe = investment_universe();
        let gfc = crisis_scenarios()
            .into_iter()
            .find(|s| s.name == "2008 Financial Crisis")
            .unwrap();
        let output = stress_impact(&StressInput {
            assets: universe.assets,
            scenario: gfc,
        })
        .unwrap();
        // Equal weights, shocks summing to -150 across six assets
        assert!((output.result.portfolio_impact_pct + dec!(25)).abs() < dec!(0.0001));
    }
}
