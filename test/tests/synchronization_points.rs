use std::collections::HashSet;

use hla_federate::{Callback, RtiError, SynchronizationPointState};
use hla_test::{assert_rti_error, init_logger, TestFederation};

#[test]
fn federation_synchronizes_once_everyone_achieved() {
    init_logger();
    let mut federation = TestFederation::new("Sync");
    let leader = federation.join("leader");
    let follower = federation.join("follower");

    leader
        .federate
        .register_federation_synchronization_point("ready", b"go".to_vec(), None)
        .unwrap();
    federation.settle();

    assert_eq!(
        leader.recorder.count("synchronizationPointRegistrationSucceeded"),
        1
    );
    for member in [&leader, &follower] {
        let point = member
            .federate
            .synchronization_point("ready")
            .unwrap()
            .expect("announced");
        assert_eq!(point.state, SynchronizationPointState::Announced);
        assert_eq!(point.tag, b"go".to_vec());
    }

    leader
        .federate
        .synchronization_point_achieved("ready", true)
        .unwrap();
    federation.settle();
    assert_eq!(leader.recorder.count("federationSynchronized"), 0);
    assert_eq!(
        leader
            .federate
            .synchronization_point("ready")
            .unwrap()
            .map(|point| point.state),
        Some(SynchronizationPointState::Achieved)
    );

    follower
        .federate
        .synchronization_point_achieved("ready", false)
        .unwrap();
    federation.settle();

    for member in [&leader, &follower] {
        let failed = member.recorder.all().into_iter().find_map(|callback| match callback {
            Callback::FederationSynchronized { label, failed } => Some((label, failed)),
            _ => None,
        });
        assert_eq!(failed, Some(("ready".to_string(), vec![follower.handle()])));
        assert_eq!(member.federate.synchronization_point("ready").unwrap(), None);
    }
}

#[test]
fn duplicate_label_fails_registration() {
    init_logger();
    let mut federation = TestFederation::new("Sync");
    let leader = federation.join("leader");

    for _ in 0..2 {
        leader
            .federate
            .register_federation_synchronization_point("twice", Vec::new(), None)
            .unwrap();
    }
    federation.settle();

    assert_eq!(
        leader.recorder.count("synchronizationPointRegistrationSucceeded"),
        1
    );
    assert_eq!(
        leader.recorder.count("synchronizationPointRegistrationFailed"),
        1
    );
}

#[test]
fn restricted_point_is_announced_to_named_federates_only() {
    init_logger();
    let mut federation = TestFederation::new("Sync");
    let leader = federation.join("leader");
    let chosen = federation.join("chosen");
    let bystander = federation.join("bystander");

    let federates: HashSet<_> = [chosen.handle()].into_iter().collect();
    leader
        .federate
        .register_federation_synchronization_point("pair", Vec::new(), Some(federates))
        .unwrap();
    federation.settle();

    assert_eq!(chosen.recorder.count("announceSynchronizationPoint"), 1);
    assert_eq!(bystander.recorder.count("announceSynchronizationPoint"), 0);
    assert_eq!(leader.recorder.count("announceSynchronizationPoint"), 0);

    assert_rti_error!(
        bystander
            .federate
            .synchronization_point_achieved("pair", true),
        RtiError::SynchronizationPointLabelNotAnnounced { .. }
    );

    chosen
        .federate
        .synchronization_point_achieved("pair", true)
        .unwrap();
    federation.settle();
    assert_eq!(chosen.recorder.count("federationSynchronized"), 1);
}
