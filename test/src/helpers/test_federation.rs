use std::{sync::Arc, time::Duration};

use hla_federate::{
    shared::{DefaultRegion, SnapshotStore},
    Federate, FederateConfig, FederateHandle, InMemorySnapshotStore,
};

use crate::{
    local_rti::TestRti,
    test_ambassador::{Recorder, TestAmbassador},
    test_object_model::TestObjectModel,
};

/// One joined member of a [`TestFederation`]
#[derive(Clone)]
pub struct TestFederate {
    pub name: String,
    pub federate: Arc<Federate>,
    pub recorder: Recorder,
}

impl TestFederate {
    pub fn handle(&self) -> FederateHandle {
        self.federate.handle()
    }

    /// Delivers every callback that is ready right now
    pub fn drain(&self) {
        while self
            .federate
            .evoke_callback(Duration::ZERO)
            .expect("evoke callback")
        {}
    }
}

/// A [`TestRti`] with federates joined to it. Members share one in-memory
/// snapshot store unless they bring their own.
pub struct TestFederation {
    pub rti: Arc<TestRti>,
    pub store: Arc<InMemorySnapshotStore>,
    name: String,
    members: Vec<TestFederate>,
}

impl TestFederation {
    pub fn new(name: &str) -> Self {
        Self {
            rti: TestRti::new(name),
            store: Arc::new(InMemorySnapshotStore::new()),
            name: name.to_string(),
            members: Vec::new(),
        }
    }

    /// Configuration every member starts from
    pub fn config(&self, federate_name: &str) -> FederateConfig {
        FederateConfig {
            federation_name: self.name.clone(),
            federate_name: federate_name.to_string(),
            federate_type: "TestFederate".to_string(),
            response_timeout: Duration::from_secs(1),
            ..FederateConfig::default()
        }
    }

    pub fn join(&mut self, name: &str) -> TestFederate {
        self.join_with(name, |ambassador| ambassador)
    }

    /// Joins with an ambassador adjusted by `configure`
    pub fn join_with(
        &mut self,
        name: &str,
        configure: impl FnOnce(TestAmbassador) -> TestAmbassador,
    ) -> TestFederate {
        let config = self.config(name);
        let store: Arc<dyn SnapshotStore> = self.store.clone();
        self.join_custom(config, store, configure)
    }

    pub fn join_custom(
        &mut self,
        config: FederateConfig,
        store: Arc<dyn SnapshotStore>,
        configure: impl FnOnce(TestAmbassador) -> TestAmbassador,
    ) -> TestFederate {
        let recorder = Recorder::new();
        let ambassador = configure(TestAmbassador::new(recorder.clone()));
        let name = config.federate_name.clone();

        let federate = Federate::join(
            config,
            self.rti.link(),
            Arc::new(TestObjectModel),
            Arc::new(DefaultRegion),
            store,
            Box::new(ambassador),
        )
        .expect("join federation");
        let federate = Arc::new(federate);
        self.rti.attach(&federate);

        let member = TestFederate {
            name,
            federate,
            recorder,
        };
        self.members.push(member.clone());
        member
    }

    pub fn members(&self) -> &[TestFederate] {
        &self.members
    }

    /// Pushes every queued notification into the federates
    pub fn pump(&self) -> usize {
        self.rti.pump()
    }

    /// Pumps notifications, then lets every member drain its ready
    /// callbacks
    pub fn settle(&self) {
        self.rti.pump();
        for member in &self.members {
            member.drain();
        }
    }
}
