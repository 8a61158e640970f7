//! Timestamp-order updates reach a constrained federate sorted by time,
//! whatever order they were sent in

use hla_federate::{AttributeValues, LogicalTime, LogicalTimeInterval, OrderType};
use hla_test::{
    init_logger,
    test_object_model::{vehicle_attributes, POSITION, VEHICLE},
    TestFederation,
};
use proptest::prelude::*;

fn time(value: f64) -> LogicalTime {
    LogicalTime::new(value).unwrap()
}

fn position(index: usize) -> AttributeValues {
    [(POSITION, index.to_be_bytes().to_vec())].into_iter().collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_timestamped_updates_arrive_sorted(
        stamps in prop::collection::vec(2u32..50, 1..20),
    ) {
        init_logger();
        let mut federation = TestFederation::new("Ordering");
        let sender = federation.join("sender");
        let receiver = federation.join("receiver");
        sender
            .federate
            .publish_object_class_attributes(VEHICLE, &vehicle_attributes())
            .unwrap();
        receiver
            .federate
            .subscribe_object_class_attributes(VEHICLE, &vehicle_attributes())
            .unwrap();
        let object = sender.federate.register_object_instance(VEHICLE).unwrap();
        sender
            .federate
            .enable_time_regulation(LogicalTimeInterval::new(1.0).unwrap())
            .unwrap();
        receiver.federate.enable_time_constrained().unwrap();
        federation.settle();

        for (index, stamp) in stamps.iter().enumerate() {
            sender
                .federate
                .update_attribute_values(
                    object,
                    position(index),
                    Vec::new(),
                    Some(time(f64::from(*stamp))),
                )
                .unwrap();
        }
        federation.settle();
        prop_assert!(receiver.recorder.reflections().is_empty());

        sender.federate.time_advance_request(time(100.0)).unwrap();
        receiver.federate.time_advance_request(time(100.0)).unwrap();
        federation.settle();

        let delivered: Vec<LogicalTime> = receiver
            .recorder
            .reflections()
            .into_iter()
            .map(|(_, _, info)| {
                assert_eq!(info.received_order, OrderType::Timestamp);
                info.time.unwrap()
            })
            .collect();
        prop_assert_eq!(delivered.len(), stamps.len());
        prop_assert!(delivered.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert_eq!(receiver.federate.query_logical_time().unwrap(), time(100.0));
    }
}
