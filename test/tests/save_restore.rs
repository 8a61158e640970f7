use std::sync::Arc;

use hla_federate::{
    shared::{FederateSnapshot, PersistenceError, SnapshotStore},
    FederateState, LogicalTime, LogicalTimeInterval, RtiError,
};
use hla_test::{
    assert_rti_error, init_logger,
    test_object_model::{vehicle_attributes, VEHICLE},
    FailingSnapshotStore, TestFederate, TestFederation,
};

fn time(value: f64) -> LogicalTime {
    LogicalTime::new(value).unwrap()
}

/// Accepts every snapshot and forgets it
struct ForgetfulStore;

impl SnapshotStore for ForgetfulStore {
    fn write(&self, _: &str, _: &str, _: FederateSnapshot) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn read(&self, label: &str, federate_name: &str) -> Result<FederateSnapshot, PersistenceError> {
        Err(PersistenceError::SnapshotNotFound {
            label: label.to_string(),
            federate: federate_name.to_string(),
        })
    }
}

fn save(federation: &TestFederation, requester: &TestFederate, label: &str) {
    requester
        .federate
        .request_federation_save(label, None)
        .unwrap();
    federation.settle();
    for member in federation.members() {
        member.federate.federate_save_begun().unwrap();
        member.federate.federate_save_complete().unwrap();
    }
    federation.settle();
}

#[test]
fn restore_rolls_back_time_and_objects() {
    init_logger();
    let mut federation = TestFederation::new("SaveRestore");
    let alpha = federation.join("alpha");
    let beta = federation.join("beta");

    alpha
        .federate
        .publish_object_class_attributes(VEHICLE, &vehicle_attributes())
        .unwrap();
    let kept = alpha
        .federate
        .register_object_instance_with_name(VEHICLE, "tank-1")
        .unwrap();
    alpha
        .federate
        .enable_time_regulation(LogicalTimeInterval::new(1.0).unwrap())
        .unwrap();
    alpha.federate.time_advance_request(time(3.0)).unwrap();
    federation.settle();
    assert_eq!(alpha.federate.query_logical_time().unwrap(), time(3.0));

    save(&federation, &alpha, "before-sortie");
    assert!(federation.store.contains("before-sortie", "alpha"));
    assert!(federation.store.contains("before-sortie", "beta"));
    assert_eq!(alpha.recorder.count("federationSaved"), 1);
    assert_eq!(beta.recorder.count("federationSaved"), 1);

    let dropped = alpha
        .federate
        .register_object_instance_with_name(VEHICLE, "tank-2")
        .unwrap();
    alpha.federate.time_advance_request(time(6.0)).unwrap();
    federation.settle();
    assert_eq!(alpha.federate.query_logical_time().unwrap(), time(6.0));

    beta.federate
        .request_federation_restore("before-sortie")
        .unwrap();
    federation.settle();
    assert_eq!(beta.recorder.count("requestFederationRestoreSucceeded"), 1);
    for member in [&alpha, &beta] {
        assert_eq!(member.recorder.count("federationRestoreBegun"), 1);
        assert_eq!(member.recorder.count("initiateFederateRestore"), 1);
        assert_eq!(
            member.federate.state().unwrap(),
            FederateState::RestoreInProgress
        );
    }

    assert_eq!(alpha.federate.query_logical_time().unwrap(), time(3.0));
    assert_eq!(
        alpha.federate.get_object_instance_handle("tank-1").unwrap(),
        Some(kept)
    );
    assert_eq!(
        alpha.federate.get_object_instance_handle("tank-2").unwrap(),
        None
    );

    for member in [&alpha, &beta] {
        member.federate.federate_restore_complete().unwrap();
    }
    federation.settle();
    for member in [&alpha, &beta] {
        assert_eq!(member.recorder.count("federationRestored"), 1);
        assert_eq!(member.federate.state().unwrap(), FederateState::Active);
    }
    assert!(federation.rti.object_exists(kept));
    assert!(!federation.rti.object_exists(dropped));
}

#[test]
fn failed_snapshot_write_fails_the_federation_save() {
    init_logger();
    let mut federation = TestFederation::new("SaveRestore");
    let config = federation.config("unlucky");
    let unlucky = federation.join_custom(config, Arc::new(FailingSnapshotStore), |ambassador| {
        ambassador
    });
    let lucky = federation.join("lucky");

    lucky
        .federate
        .request_federation_save("doomed", None)
        .unwrap();
    federation.settle();
    for member in [&unlucky, &lucky] {
        member.federate.federate_save_begun().unwrap();
    }
    lucky.federate.federate_save_complete().unwrap();
    assert_rti_error!(
        unlucky.federate.federate_save_complete(),
        RtiError::SaveFailed { .. }
    );
    federation.settle();

    for member in [&unlucky, &lucky] {
        assert_eq!(member.recorder.count("federationNotSaved"), 1);
        assert_eq!(member.federate.state().unwrap(), FederateState::Active);
    }
    assert!(federation.rti.saved_labels().is_empty());
    assert_eq!(
        federation.rti.operations(unlucky.handle()).last(),
        Some(&"federateSaveNotComplete")
    );
}

#[test]
fn unknown_label_restore_is_refused() {
    init_logger();
    let mut federation = TestFederation::new("SaveRestore");
    let alpha = federation.join("alpha");

    alpha.federate.request_federation_restore("never-saved").unwrap();
    federation.settle();

    assert_eq!(alpha.recorder.count("requestFederationRestoreFailed"), 1);
    assert_eq!(alpha.recorder.count("federationRestoreBegun"), 0);
    assert_eq!(alpha.federate.state().unwrap(), FederateState::Active);
}

#[test]
fn unreadable_snapshot_fails_the_federation_restore() {
    init_logger();
    let mut federation = TestFederation::new("SaveRestore");
    let config = federation.config("amnesiac");
    let amnesiac = federation.join_custom(config, Arc::new(ForgetfulStore), |ambassador| ambassador);
    let steady = federation.join("steady");

    save(&federation, &steady, "checkpoint");
    assert_eq!(amnesiac.recorder.count("federationSaved"), 1);

    steady.federate.request_federation_restore("checkpoint").unwrap();
    federation.settle();
    assert_eq!(amnesiac.recorder.count("initiateFederateRestore"), 0);
    assert_eq!(steady.recorder.count("initiateFederateRestore"), 1);
    assert_eq!(
        federation.rti.operations(amnesiac.handle()).last(),
        Some(&"federateRestoreNotComplete")
    );

    steady.federate.federate_restore_complete().unwrap();
    federation.settle();
    for member in [&amnesiac, &steady] {
        assert_eq!(member.recorder.count("federationNotRestored"), 1);
        assert_eq!(member.federate.state().unwrap(), FederateState::Active);
    }
}

#[test]
fn requests_are_refused_while_saving() {
    init_logger();
    let mut federation = TestFederation::new("SaveRestore");
    let alpha = federation.join("alpha");
    alpha
        .federate
        .publish_object_class_attributes(VEHICLE, &vehicle_attributes())
        .unwrap();

    assert_rti_error!(
        alpha
            .federate
            .request_federation_save("past", Some(time(0.0))),
        RtiError::LogicalTimeAlreadyPassed { .. }
    );

    alpha.federate.request_federation_save("now", None).unwrap();
    federation.settle();
    assert_eq!(
        alpha.federate.register_object_instance(VEHICLE),
        Err(RtiError::SaveInProgress {
            operation: "registerObjectInstance"
        })
    );
    assert_eq!(
        alpha.federate.federate_save_complete(),
        Err(RtiError::FederateHasNotBegunSave)
    );

    alpha.federate.federate_save_begun().unwrap();
    alpha.federate.federate_save_complete().unwrap();
    federation.settle();
    assert!(alpha.federate.register_object_instance(VEHICLE).is_ok());
}
