use hla_federate::{AttributeValues, Callback, ParameterValues, RtiError};
use hla_test::{
    assert_rti_error, init_logger,
    test_object_model::{attributes, vehicle_attributes, COLLISION, FUEL, POSITION, SEVERITY, VEHICLE},
    TestFederation,
};

fn values(pairs: &[(hla_federate::AttributeHandle, &str)]) -> AttributeValues {
    pairs
        .iter()
        .map(|(attribute, value)| (*attribute, value.as_bytes().to_vec()))
        .collect()
}

#[test]
fn interactions_reach_subscribers_only() {
    init_logger();
    let mut federation = TestFederation::new("Objects");
    let sender = federation.join("sender");
    let listener = federation.join("listener");
    let bystander = federation.join("bystander");

    let parameters: ParameterValues = [(SEVERITY, b"high".to_vec())].into_iter().collect();
    assert_rti_error!(
        sender
            .federate
            .send_interaction(COLLISION, parameters.clone(), Vec::new(), None),
        RtiError::InteractionClassNotPublished { .. }
    );

    sender.federate.publish_interaction_class(COLLISION).unwrap();
    listener.federate.subscribe_interaction_class(COLLISION).unwrap();
    sender
        .federate
        .send_interaction(COLLISION, parameters.clone(), b"bang".to_vec(), None)
        .unwrap();
    federation.settle();

    let received = listener.recorder.all().into_iter().find_map(|callback| match callback {
        Callback::ReceiveInteraction {
            class,
            parameters,
            tag,
            ..
        } => Some((class, parameters, tag)),
        _ => None,
    });
    assert_eq!(received, Some((COLLISION, parameters, b"bang".to_vec())));
    assert!(bystander.recorder.all().is_empty());
    assert!(sender.recorder.all().is_empty());
}

#[test]
fn late_subscriber_discovers_existing_objects() {
    init_logger();
    let mut federation = TestFederation::new("Objects");
    let owner = federation.join("owner");
    let latecomer = federation.join("latecomer");
    owner
        .federate
        .publish_object_class_attributes(VEHICLE, &vehicle_attributes())
        .unwrap();
    let object = owner
        .federate
        .register_object_instance_with_name(VEHICLE, "convoy-lead")
        .unwrap();
    federation.settle();
    assert!(latecomer.recorder.all().is_empty());

    latecomer
        .federate
        .subscribe_object_class_attributes(VEHICLE, &attributes(&[POSITION]))
        .unwrap();
    federation.settle();

    assert_eq!(latecomer.recorder.discovered(), vec![object]);
    assert_eq!(
        latecomer
            .federate
            .get_object_instance_handle("convoy-lead")
            .unwrap(),
        Some(object)
    );
}

#[test]
fn reflections_carry_subscribed_attributes_only() {
    init_logger();
    let mut federation = TestFederation::new("Objects");
    let owner = federation.join("owner");
    let watcher = federation.join("watcher");
    owner
        .federate
        .publish_object_class_attributes(VEHICLE, &vehicle_attributes())
        .unwrap();
    watcher
        .federate
        .subscribe_object_class_attributes(VEHICLE, &attributes(&[POSITION]))
        .unwrap();
    let object = owner.federate.register_object_instance(VEHICLE).unwrap();

    owner
        .federate
        .update_attribute_values(object, values(&[(FUEL, "half")]), Vec::new(), None)
        .unwrap();
    owner
        .federate
        .update_attribute_values(
            object,
            values(&[(POSITION, "4,4"), (FUEL, "empty")]),
            Vec::new(),
            None,
        )
        .unwrap();
    federation.settle();

    let reflections = watcher.recorder.reflections();
    assert_eq!(reflections.len(), 1);
    assert_eq!(reflections[0].1, values(&[(POSITION, "4,4")]));
}

#[test]
fn update_request_reaches_the_owner() {
    init_logger();
    let mut federation = TestFederation::new("Objects");
    let owner = federation.join("owner");
    let watcher = federation.join("watcher");
    owner
        .federate
        .publish_object_class_attributes(VEHICLE, &vehicle_attributes())
        .unwrap();
    watcher
        .federate
        .subscribe_object_class_attributes(VEHICLE, &vehicle_attributes())
        .unwrap();
    let object = owner.federate.register_object_instance(VEHICLE).unwrap();
    federation.settle();

    watcher
        .federate
        .request_attribute_value_update(object, &attributes(&[POSITION]), b"refresh".to_vec())
        .unwrap();
    federation.settle();

    let requested = owner.recorder.all().into_iter().find_map(|callback| match callback {
        Callback::ProvideAttributeValueUpdate {
            object,
            attributes,
            tag,
        } => Some((object, attributes, tag)),
        _ => None,
    });
    assert_eq!(
        requested,
        Some((object, attributes(&[POSITION]), b"refresh".to_vec()))
    );
}

#[test]
fn local_delete_forgets_only_unowned_instances() {
    init_logger();
    let mut federation = TestFederation::new("Objects");
    let owner = federation.join("owner");
    let watcher = federation.join("watcher");
    owner
        .federate
        .publish_object_class_attributes(VEHICLE, &vehicle_attributes())
        .unwrap();
    watcher
        .federate
        .subscribe_object_class_attributes(VEHICLE, &vehicle_attributes())
        .unwrap();
    let object = owner
        .federate
        .register_object_instance_with_name(VEHICLE, "decoy")
        .unwrap();
    federation.settle();

    assert_rti_error!(
        owner.federate.local_delete_object_instance(object),
        RtiError::FederateOwnsAttributes { .. }
    );

    watcher.federate.local_delete_object_instance(object).unwrap();
    assert_eq!(watcher.federate.get_object_instance_handle("decoy").unwrap(), None);
    assert!(federation.rti.object_exists(object));

    owner
        .federate
        .update_attribute_values(object, values(&[(POSITION, "0,0")]), Vec::new(), None)
        .unwrap();
    federation.settle();
    assert!(watcher.recorder.reflections().is_empty());
}

#[test]
fn updates_need_ownership() {
    init_logger();
    let mut federation = TestFederation::new("Objects");
    let owner = federation.join("owner");
    owner
        .federate
        .publish_object_class_attributes(VEHICLE, &vehicle_attributes())
        .unwrap();
    let object = owner.federate.register_object_instance(VEHICLE).unwrap();
    owner
        .federate
        .unconditional_attribute_ownership_divestiture(object, &attributes(&[FUEL]))
        .unwrap();

    assert_rti_error!(
        owner
            .federate
            .update_attribute_values(object, values(&[(FUEL, "full")]), Vec::new(), None),
        RtiError::AttributeNotOwned { .. }
    );
}
