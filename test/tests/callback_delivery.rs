use std::{
    thread,
    time::{Duration, Instant},
};

use hla_federate::{AttributeValues, ObjectInstanceHandle};
use hla_test::{
    assert_callbacks, init_logger,
    test_object_model::{vehicle_attributes, POSITION, VEHICLE},
    OverlapProbe, TestFederate, TestFederation,
};

fn position(value: u32) -> AttributeValues {
    [(POSITION, value.to_be_bytes().to_vec())].into_iter().collect()
}

fn publish_and_subscribe(producer: &TestFederate, consumer: &TestFederate) {
    producer
        .federate
        .publish_object_class_attributes(VEHICLE, &vehicle_attributes())
        .unwrap();
    consumer
        .federate
        .subscribe_object_class_attributes(VEHICLE, &vehicle_attributes())
        .unwrap();
}

#[test]
fn concurrent_evokes_never_overlap_inside_the_ambassador() {
    init_logger();
    let mut federation = TestFederation::new("Delivery");
    let probe = OverlapProbe::new();
    let producer = federation.join("producer");
    let consumer = federation.join_with("consumer", |ambassador| {
        ambassador
            .with_probe(probe.clone())
            .with_delay(Duration::from_millis(2))
    });
    publish_and_subscribe(&producer, &consumer);

    let object = producer.federate.register_object_instance(VEHICLE).unwrap();
    federation.settle();
    for value in 0..20 {
        producer
            .federate
            .update_attribute_values(object, position(value), Vec::new(), None)
            .unwrap();
    }
    federation.pump();

    let deadline = Instant::now() + Duration::from_secs(5);
    let workers: Vec<_> = (0..4)
        .map(|_| {
            let consumer = consumer.clone();
            thread::spawn(move || {
                while consumer.recorder.count("reflectAttributeValues") < 20
                    && Instant::now() < deadline
                {
                    consumer
                        .federate
                        .evoke_callback(Duration::from_millis(10))
                        .unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(consumer.recorder.count("reflectAttributeValues"), 20);
    assert_eq!(probe.overlaps(), 0);
}

#[test]
fn failing_ambassador_does_not_stop_later_deliveries() {
    init_logger();
    let mut federation = TestFederation::new("Delivery");
    let producer = federation.join("producer");
    let consumer = federation.join_with("consumer", |ambassador| {
        ambassador
            .failing_on(ObjectInstanceHandle::new(1))
            .panicking_on(ObjectInstanceHandle::new(2))
    });
    publish_and_subscribe(&producer, &consumer);

    let objects: Vec<_> = (0..3)
        .map(|_| producer.federate.register_object_instance(VEHICLE).unwrap())
        .collect();
    assert_eq!(objects[0], ObjectInstanceHandle::new(1));
    federation.settle();

    for (value, object) in objects.iter().enumerate() {
        producer
            .federate
            .update_attribute_values(*object, position(value as u32), Vec::new(), None)
            .unwrap();
    }
    federation.settle();

    let reflected: Vec<_> = consumer
        .recorder
        .reflections()
        .into_iter()
        .map(|(object, _, _)| object)
        .collect();
    assert_eq!(reflected, vec![objects[2]]);
    assert_eq!(consumer.federate.callback_counts().unwrap().delivery, 0);
}

#[test]
fn disabled_callbacks_stay_queued_until_enabled() {
    init_logger();
    let mut federation = TestFederation::new("Delivery");
    let producer = federation.join("producer");
    let consumer = federation.join("consumer");
    publish_and_subscribe(&producer, &consumer);

    consumer.federate.disable_callbacks().unwrap();
    producer.federate.register_object_instance(VEHICLE).unwrap();
    federation.pump();

    assert!(!consumer.federate.evoke_callback(Duration::ZERO).unwrap());
    assert!(consumer.recorder.all().is_empty());
    assert_eq!(consumer.federate.callback_counts().unwrap().delivery, 1);

    consumer.federate.enable_callbacks().unwrap();
    consumer.drain();
    assert_callbacks!(consumer.recorder, ["discoverObjectInstance"]);
}

#[test]
fn evoke_multiple_drains_what_is_ready() {
    init_logger();
    let mut federation = TestFederation::new("Delivery");
    let producer = federation.join("producer");
    let consumer = federation.join("consumer");
    publish_and_subscribe(&producer, &consumer);

    let object = producer.federate.register_object_instance(VEHICLE).unwrap();
    for value in 0..3 {
        producer
            .federate
            .update_attribute_values(object, position(value), Vec::new(), None)
            .unwrap();
    }
    federation.pump();

    let more = consumer
        .federate
        .evoke_multiple_callbacks(Duration::ZERO, Duration::from_secs(1))
        .unwrap();
    assert!(!more);
    assert_callbacks!(
        consumer.recorder,
        [
            "discoverObjectInstance",
            "reflectAttributeValues",
            "reflectAttributeValues",
            "reflectAttributeValues"
        ]
    );
}

#[test]
fn evoke_with_nothing_queued_waits_and_returns() {
    init_logger();
    let mut federation = TestFederation::new("Delivery");
    let idle = federation.join("idle");

    let started = Instant::now();
    assert!(!idle
        .federate
        .evoke_callback(Duration::from_millis(20))
        .unwrap());
    assert!(started.elapsed() >= Duration::from_millis(20));
}
