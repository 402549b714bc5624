// Copyright 2025 Cowboy AI, LLC.


use bdd_support::*;
use cim_narrative::{
    perform, Behaviour, BehaviourState, DomainCommand, NarrativeError, NarrativeResult, PersonaType,
    Scenario, ScenarioConfig, TranscriptRecorder,
};

fn scenario(recorder: &TranscriptRecorder, title: &str) -> Scenario {
    Scenario::new(shop_registry())
        .narrator(recorder.clone())
        .titled(title)
}

#[test]
fn login_scenario_reads_as_a_story() {
    let journal = journal();
    let recorder = TranscriptRecorder::new();

    let mut behaviour = scenario(&recorder, "ShouldIWantToLogIn")
        .so_that("users can access their account")
        .unwrap();
    behaviour
        .as_persona(&ui::Customer::default())
        .unwrap()
        .given(DomainCommand::new(Credentials::new("ada", &journal), "submit_credentials"))
        .unwrap()
        .when(DomainCommand::new(Credentials::new("ada", &journal), "sign_in"))
        .unwrap();

    assert_transcript(
        &recorder,
        &[
            "I Want To Log In",
            "  So that users can access their account",
            "       As Customer",
            "    Given submit Credentials credentials",
            "     When sign Credentials in",
        ],
    );
    assert_eq!(entries(&journal), vec!["ui submit ada", "ui sign_in"]);
}

#[test]
fn layer_qualifier_targets_the_service_personas() {
    let journal = journal();
    let recorder = TranscriptRecorder::new();

    let mut behaviour = scenario(&recorder, "should_log_in_through_the_api")
        .target_layer("service")
        .so_that("integrations can sign in")
        .unwrap();
    behaviour
        .as_persona(&ui::Customer::default())
        .unwrap()
        .given(DomainCommand::new(Credentials::new("grace", &journal), "submit_credentials"))
        .unwrap();

    assert_eq!(
        behaviour.current_persona(),
        Some(&PersonaType::of::<service::Customer>())
    );
    assert_eq!(entries(&journal), vec!["service submit grace"]);
    assert_eq!(recorder.lines()[0], "I Want To Log In Through The Api");
}

#[test]
fn missing_layer_implementation_is_reported_with_its_name() {
    let recorder = TranscriptRecorder::new();
    let mut behaviour = scenario(&recorder, "should_administer_remotely")
        .target_layer("service")
        .so_that("admins can work from anywhere")
        .unwrap();

    let err = behaviour.as_persona(&ui::Administrator::default()).unwrap_err();
    match err {
        NarrativeError::PersonaNotFound { attempted } => {
            assert!(attempted.contains("bdd_support::service::Administrator"), "{attempted}");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(behaviour.current_persona().is_none());
}

fn registered_customer(set: &mut Behaviour) -> NarrativeResult<()> {
    let journal = bdd_support::journal();
    perform!(set)
        .as_persona(&ui::Administrator::default())?
        .given(DomainCommand::new(Credentials::new("ada", &journal), "register"))?
        .given(DomainCommand::new(Order::new(1, &journal), "approve"))?;
    assert_eq!(entries(&journal), vec!["admin register", "admin approve"]);
    Ok(())
}

#[test]
fn setter_steps_compose_silently() {
    let journal = journal();
    let recorder = TranscriptRecorder::new();
    let mut behaviour = scenario(&recorder, "should_cancel_an_order")
        .so_that("mistakes can be undone")
        .unwrap();

    behaviour
        .as_persona(&ui::Customer::default())
        .unwrap()
        .given_set(registered_customer)
        .unwrap()
        .when(DomainCommand::new(Order::new(7, &journal), "cancel"))
        .unwrap();

    assert_transcript(
        &recorder,
        &[
            "I Want To Cancel An Order",
            "  So that mistakes can be undone",
            "       As Customer",
            "    Given registered customer",
            "     When cancel Order",
        ],
    );
    assert_eq!(entries(&journal), vec!["ui cancel order 7"]);
    assert_eq!(behaviour.current_persona(), Some(&PersonaType::of::<ui::Customer>()));
    assert!(behaviour.narration_enabled());
    assert_eq!(behaviour.state(), BehaviourState::PersonaActive);
}

#[test]
fn setter_failure_still_restores_the_session() {
    let journal = journal();
    let recorder = TranscriptRecorder::new();
    let mut behaviour = scenario(&recorder, "should_track_an_order")
        .so_that("customers know where parcels are")
        .unwrap();
    behaviour.as_persona(&ui::Customer::default()).unwrap();

    let err = behaviour
        .then_set(|set| {
            set.perform("tracked_order")
                .then(DomainCommand::new(Order::new(3, &journal), "track"))?;
            Ok(())
        })
        .unwrap_err();

    assert!(err.is_pending());
    assert!(behaviour.narration_enabled());
    assert_eq!(behaviour.current_persona(), Some(&PersonaType::of::<ui::Customer>()));
}

#[test]
fn discovers_the_title_from_the_running_test() {
    let recorder = TranscriptRecorder::new();
    Scenario::new(shop_registry())
        .narrator(recorder.clone())
        .so_that("titles need no repetition")
        .unwrap();

    assert_eq!(
        recorder.lines()[0],
        "I Want To Discovers The Title From The Running Test"
    );
}

#[test]
fn silent_configuration_narrates_only_the_opening() {
    let journal = journal();
    let recorder = TranscriptRecorder::new();
    let mut behaviour = scenario(&recorder, "should_sign_in_quietly")
        .config(ScenarioConfig {
            narrate: false,
            ..ScenarioConfig::default()
        })
        .so_that("logs stay short")
        .unwrap();

    behaviour
        .as_persona(&ui::Customer::default())
        .unwrap()
        .when(DomainCommand::new(Credentials::new("ada", &journal), "sign_in"))
        .unwrap()
        .given_set(registered_customer)
        .unwrap();

    assert_eq!(recorder.lines().len(), 2);
    assert_eq!(recorder.pending(), "");
    assert_eq!(entries(&journal), vec!["ui sign_in"]);
}
