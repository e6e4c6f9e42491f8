use approx::assert_relative_eq;

use shaft_core::calculations::criteria::{FailureCriterion, LoadHistory};
use shaft_core::calculations::endurance::{EnduranceInput, MarinFactorInputs, SizeFactorMode};
use shaft_core::calculations::fatigue::{evaluate, FatigueInput, FatigueResult, SolveMode};
use shaft_core::calculations::statics::{self, DiagramResult};
use shaft_core::calculations::FatigueFactor;
use shaft_core::materials::MaterialInput;
use shaft_core::units::{Inches, Ksi, LbfInches, Meters, Mpa, NewtonMeters, Newtons, PoundsForce};
use shaft_core::{AnalysisSettings, AnalysisState, LoadSession, PointLoad, ShaftAnalysis, UnitSystem};

const SAMPLES: usize = 1000;

fn gearbox_loads() -> Vec<PointLoad> {
    vec![
        PointLoad::new(-1800.0, 650.0, 0.15, 0.0, 0.09),
        PointLoad::new(400.0, -1200.0, 0.42, 0.12, 0.0),
        PointLoad::new(-300.0, 0.0, 0.55, 0.0, 0.0),
    ]
}

fn gearbox_session(scale: f64) -> LoadSession {
    let loads = gearbox_loads();
    let mut session = LoadSession::start(0.6, loads.len(), 0.05, 0.5).unwrap();
    for (i, load) in loads.iter().enumerate() {
        session.set_load(i, load.scaled(scale)).unwrap();
    }
    session
}

fn solve(session: &LoadSession) -> DiagramResult {
    statics::solve(session, SAMPLES).unwrap()
}

#[test]
fn diagrams_vanish_at_the_ends() {
    let result = solve(&gearbox_session(1.0));
    let field = &result.field;
    let last = field.len() - 1;
    assert_eq!(field.mh[0], 0.0);
    assert_eq!(field.mv[0], 0.0);
    assert_eq!(field.mt[0], 0.0);
    assert_eq!(field.mh[last], 0.0);
    assert_eq!(field.mv[last], 0.0);
    assert_eq!(field.len(), SAMPLES);
    assert_eq!(field.x[last], 0.6);
}

#[test]
fn diagrams_scale_linearly_with_loads() {
    let base = solve(&gearbox_session(1.0));
    for k in [2.5, -1.0, -0.3] {
        let scaled = solve(&gearbox_session(k));
        for axis in 0..3 {
            assert_relative_eq!(scaled.reactions.a[axis], k * base.reactions.a[axis], epsilon = 1e-9);
            assert_relative_eq!(scaled.reactions.b[axis], k * base.reactions.b[axis], epsilon = 1e-9);
        }
        for i in (0..SAMPLES).step_by(37) {
            assert_relative_eq!(scaled.field.mh[i], k * base.field.mh[i], epsilon = 1e-8);
            assert_relative_eq!(scaled.field.mv[i], k * base.field.mv[i], epsilon = 1e-8);
            assert_relative_eq!(scaled.field.mt[i], k * base.field.mt[i], epsilon = 1e-8);
        }
        assert_relative_eq!(scaled.max_abs_mv, k.abs() * base.max_abs_mv, max_relative = 1e-9);
    }
}

#[test]
fn central_point_load() {
    let mut session = LoadSession::start(10.0, 1, 0.0, 10.0).unwrap();
    session.add_load(0, -100.0, 0.0, 5.0, 0.0, 0.0).unwrap();
    let result = solve(&session);

    assert_relative_eq!(result.reactions.a[1], 50.0, epsilon = 1e-9);
    assert_relative_eq!(result.reactions.b[1], 50.0, epsilon = 1e-9);
    assert_relative_eq!(result.max_abs_mv, 250.0, max_relative = 0.01);

    let peak = result.field.max_resultant().unwrap();
    assert!((peak.x - 5.0).abs() < 0.02);
}

#[test]
fn loads_on_the_bearings_cause_no_bending() {
    let mut session = LoadSession::start(2.0, 2, 0.5, 1.5).unwrap();
    session.add_load(0, -100.0, 0.0, 0.5, 0.0, 0.0).unwrap();
    session.add_load(1, -100.0, 0.0, 1.5, 0.0, 0.0).unwrap();
    let result = solve(&session);

    assert_relative_eq!(result.reactions.a[1], 100.0, epsilon = 1e-9);
    assert_relative_eq!(result.reactions.b[1], 100.0, epsilon = 1e-9);
    assert!(result.max_abs_mv < 1e-9);
    assert!(result.field.mv.iter().all(|m| m.abs() < 1e-9));
}

fn fatigue_input(mode: SolveMode) -> FatigueInput {
    FatigueInput::new(
        mode,
        MaterialInput::catalog("SAE 1045 LF"),
        LoadHistory::new(220.0, 30.0, 15.0, 140.0),
    )
    .with_endurance(EnduranceInput::Marin {
        se_prime: 315.0,
        factors: MarinFactorInputs {
            ka: Some("0.79".to_string()),
            kc: Some("1".to_string()),
            ke: Some("0.868".to_string()),
            size: SizeFactorMode::Auto,
            ..MarinFactorInputs::default()
        },
    })
    .with_factors(FatigueFactor::notch(2.1, 0.82), FatigueFactor::notch(1.6, 0.9))
}

#[test]
fn forward_and_inverse_agree_for_every_criterion() {
    let settings = AnalysisSettings::default();
    for criterion in FailureCriterion::ALL {
        let forward = evaluate(
            criterion,
            &fatigue_input(SolveMode::SafetyFactor { diameter: 0.042 }),
            &settings,
        )
        .unwrap();
        let inverse = evaluate(
            criterion,
            &fatigue_input(SolveMode::Diameter {
                safety_factor: forward.safety_factor,
            }),
            &settings,
        )
        .unwrap();
        assert_relative_eq!(inverse.diameter, 0.042, max_relative = 1e-3);
        assert_relative_eq!(inverse.safety_factor, forward.safety_factor, max_relative = 1e-3);
    }
}

#[test]
fn zero_endurance_limit_is_a_domain_error() {
    let input = fatigue_input(SolveMode::SafetyFactor { diameter: 0.04 })
        .with_endurance(EnduranceInput::Direct { se: 0.0 });
    let err = evaluate(FailureCriterion::Goodman, &input, &AnalysisSettings::default()).unwrap_err();
    assert_eq!(err.error_code(), "DOMAIN_ERROR");

    let inverse = FatigueInput {
        mode: SolveMode::Diameter { safety_factor: 2.0 },
        ..input
    };
    let err = evaluate(FailureCriterion::Goodman, &inverse, &AnalysisSettings::default()).unwrap_err();
    assert_eq!(err.error_code(), "DOMAIN_ERROR");
}

/// Rotating-shaft evaluation of the gearbox at its most loaded section,
/// with every quantity expressed in `units`.
fn gearbox_in(units: UnitSystem, criterion: FailureCriterion, mode: SolveMode) -> FatigueResult {
    let length = |m: f64| match units {
        UnitSystem::Si => m,
        UnitSystem::Imperial => Inches::from(Meters(m)).value(),
    };
    let force = |n: f64| match units {
        UnitSystem::Si => n,
        UnitSystem::Imperial => PoundsForce::from(Newtons(n)).value(),
    };
    let stress = |mpa: f64| match units {
        UnitSystem::Si => mpa,
        UnitSystem::Imperial => Ksi::from(Mpa(mpa)).value(),
    };

    let loads = gearbox_loads();
    let mut analysis = ShaftAnalysis::new(AnalysisSettings::with_units(units));
    analysis
        .start(length(0.6), loads.len(), length(0.05), length(0.5))
        .unwrap();
    for (i, load) in loads.iter().enumerate() {
        analysis
            .add_load(
                i,
                force(load.fy),
                force(load.fz),
                length(load.rx),
                length(load.ry),
                length(load.rz),
            )
            .unwrap();
    }
    let section = analysis.solve_diagrams().unwrap().field.max_resultant().unwrap();

    let mode = match mode {
        SolveMode::SafetyFactor { diameter } => SolveMode::SafetyFactor {
            diameter: length(diameter),
        },
        inverse => inverse,
    };
    let input = FatigueInput::new(
        mode,
        MaterialInput::custom(stress(630.0), stress(530.0)),
        LoadHistory::rotating_shaft(&section),
    )
    .with_endurance(EnduranceInput::Direct { se: stress(210.0) })
    .with_factors(FatigueFactor::Direct { kf: 1.9 }, FatigueFactor::Direct { kf: 1.5 });

    analysis.select_criterion(criterion).unwrap();
    let result = analysis.evaluate(&input).unwrap().clone();
    result
}

#[test]
fn unit_systems_agree() {
    for criterion in FailureCriterion::ALL {
        let si = gearbox_in(UnitSystem::Si, criterion, SolveMode::SafetyFactor { diameter: 0.035 });
        let us = gearbox_in(
            UnitSystem::Imperial,
            criterion,
            SolveMode::SafetyFactor { diameter: 0.035 },
        );
        assert_relative_eq!(si.safety_factor, us.safety_factor, max_relative = 1e-2);

        let si = gearbox_in(UnitSystem::Si, criterion, SolveMode::Diameter { safety_factor: 2.0 });
        let us = gearbox_in(UnitSystem::Imperial, criterion, SolveMode::Diameter { safety_factor: 2.0 });
        let us_diameter = Meters::from(Inches(us.diameter)).value();
        assert_relative_eq!(si.diameter, us_diameter, max_relative = 1e-2);
    }
}

#[test]
fn moments_convert_between_unit_systems() {
    let si = solve(&gearbox_session(1.0));
    let si_peak = si.field.max_resultant().unwrap();

    let to_in = |m: f64| Inches::from(Meters(m)).value();
    let to_lbf = |n: f64| PoundsForce::from(Newtons(n)).value();
    let mut session = LoadSession::start(to_in(0.6), 3, to_in(0.05), to_in(0.5)).unwrap();
    for (i, load) in gearbox_loads().iter().enumerate() {
        session
            .add_load(i, to_lbf(load.fy), to_lbf(load.fz), to_in(load.rx), to_in(load.ry), to_in(load.rz))
            .unwrap();
    }
    let us = solve(&session);
    let us_peak = us.field.sample(si_peak.index).unwrap();
    let back: NewtonMeters = LbfInches(us_peak.mr).into();
    assert_relative_eq!(back.value(), si_peak.mr, max_relative = 1e-9);
}

#[test]
fn analysis_walks_through_its_states() {
    let mut analysis = ShaftAnalysis::default();
    assert_eq!(analysis.state(), AnalysisState::Uninitialized);

    analysis.start(0.6, 3, 0.05, 0.5).unwrap();
    for (i, load) in gearbox_loads().iter().enumerate() {
        assert_eq!(
            analysis.state(),
            AnalysisState::Accumulating {
                supplied: i,
                expected: 3
            }
        );
        analysis.set_load(i, *load).unwrap();
    }
    assert_eq!(analysis.state(), AnalysisState::Complete);
    assert_eq!(analysis.solve_diagrams().unwrap().field.mt[0], 0.0);

    analysis.select_criterion(FailureCriterion::Soderberg).unwrap();
    assert_eq!(analysis.state(), AnalysisState::CriterionSelected);

    analysis
        .evaluate(&fatigue_input(SolveMode::Diameter { safety_factor: 1.5 }))
        .unwrap();
    assert_eq!(analysis.state(), AnalysisState::Evaluated);

    analysis.add_load(3, 1.0, 0.0, 0.1, 0.0, 0.0).unwrap_err();
    assert_eq!(analysis.state(), AnalysisState::Evaluated);
}
