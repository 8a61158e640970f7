use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use log::{debug, info, warn};

use hla_shared::{
    AttributeHandle, AttributeSet, AttributeValues, DeclarationSnapshot, FederateHandle,
    InteractionClassHandle, LogicalTime, MessageRetractionHandle, ObjectClassHandle,
    ObjectInstanceHandle, ObjectModel, ObjectSnapshot, ParameterValues, RegionHandle, RegionService, ResignAction, RtiError, PRIVILEGE_TO_DELETE,
};

use super::{
    declarations::Declarations,
    object_instance::{AttributeOwnership, ObjectInstance, OwnershipUndo},
};

type SharedInstance = Arc<Mutex<ObjectInstance>>;

#[derive(Default)]
struct InstanceTable {
    by_handle: HashMap<ObjectInstanceHandle, SharedInstance>,
    names: HashMap<String, ObjectInstanceHandle>,
    reserved_names: HashSet<String>,
    /// Own timestamped deletions still waiting for their time to be granted
    scheduled_deletions: HashMap<MessageRetractionHandle, (ObjectInstanceHandle, LogicalTime)>,
}

impl InstanceTable {
    fn insert(&mut self, instance: ObjectInstance) {
        let handle = instance.handle();
        self.names.insert(instance.name().to_string(), handle);
        self.by_handle.insert(handle, Arc::new(Mutex::new(instance)));
    }

    fn remove(&mut self, object: ObjectInstanceHandle) -> Option<SharedInstance> {
        let removed = self.by_handle.remove(&object)?;
        self.names.retain(|_, handle| *handle != object);
        Some(removed)
    }
}

fn lock_instance(instance: &SharedInstance) -> Result<MutexGuard<'_, ObjectInstance>, RtiError> {
    instance.lock().map_err(|_| RtiError::LockPoisoned {
        subsystem: "object instance",
    })
}

/// Object instances known to the federate, the attributes it owns on them,
/// and its declared interest.
///
/// The two tables sit behind manager-wide reader/writer locks; every
/// instance additionally has its own lock, so ownership transitions on one
/// instance never contend with another. Transitions that need the
/// coordinator mark the instance first, call `send` with no lock held, and
/// roll the mark back if `send` fails.
pub struct ObjectManager {
    federate: FederateHandle,
    object_model: Arc<dyn ObjectModel>,
    region_service: Arc<dyn RegionService>,
    declarations: RwLock<Declarations>,
    instances: RwLock<InstanceTable>,
}

impl ObjectManager {
    pub fn new(
        federate: FederateHandle,
        object_model: Arc<dyn ObjectModel>,
        region_service: Arc<dyn RegionService>,
    ) -> Self {
        Self {
            federate,
            object_model,
            region_service,
            declarations: RwLock::new(Declarations::new()),
            instances: RwLock::new(InstanceTable::default()),
        }
    }

    fn declarations(&self) -> Result<RwLockReadGuard<'_, Declarations>, RtiError> {
        self.declarations.read().map_err(|_| RtiError::LockPoisoned {
            subsystem: "declarations",
        })
    }

    fn declarations_mut(&self) -> Result<RwLockWriteGuard<'_, Declarations>, RtiError> {
        self.declarations.write().map_err(|_| RtiError::LockPoisoned {
            subsystem: "declarations",
        })
    }

    fn table(&self) -> Result<RwLockReadGuard<'_, InstanceTable>, RtiError> {
        self.instances.read().map_err(|_| RtiError::LockPoisoned {
            subsystem: "object instances",
        })
    }

    fn table_mut(&self) -> Result<RwLockWriteGuard<'_, InstanceTable>, RtiError> {
        self.instances.write().map_err(|_| RtiError::LockPoisoned {
            subsystem: "object instances",
        })
    }

    fn instance(&self, object: ObjectInstanceHandle) -> Result<SharedInstance, RtiError> {
        self.table()?
            .by_handle
            .get(&object)
            .cloned()
            .ok_or(RtiError::ObjectInstanceNotKnown { object })
    }

    fn find_instance(&self, object: ObjectInstanceHandle) -> Result<Option<SharedInstance>, RtiError> {
        Ok(self.table()?.by_handle.get(&object).cloned())
    }

    /// Instances of `class`, cloned out so the table lock is not held while
    /// each instance is locked
    fn instances_of(&self, class: Option<ObjectClassHandle>) -> Result<Vec<SharedInstance>, RtiError> {
        let table = self.table()?;
        let mut selected = Vec::new();
        for instance in table.by_handle.values() {
            let matches = match class {
                Some(class) => lock_instance(instance)?.class() == class,
                None => true,
            };
            if matches {
                selected.push(instance.clone());
            }
        }
        Ok(selected)
    }

    // Validation against the object model

    fn check_object_class(&self, class: ObjectClassHandle) -> Result<(), RtiError> {
        if !self.object_model.is_object_class_defined(class) {
            return Err(RtiError::ObjectClassNotDefined { class });
        }
        Ok(())
    }

    fn check_attributes<'a>(
        &self,
        class: ObjectClassHandle,
        attributes: impl IntoIterator<Item = &'a AttributeHandle>,
    ) -> Result<(), RtiError> {
        for attribute in attributes {
            if *attribute != PRIVILEGE_TO_DELETE
                && !self.object_model.is_attribute_defined(class, *attribute)
            {
                return Err(RtiError::AttributeNotDefined {
                    class,
                    attribute: *attribute,
                });
            }
        }
        Ok(())
    }

    fn check_interaction_class(&self, class: InteractionClassHandle) -> Result<(), RtiError> {
        if !self.object_model.is_interaction_class_defined(class) {
            return Err(RtiError::InteractionClassNotDefined { class });
        }
        Ok(())
    }

    fn in_scope(&self, subscribed: &[RegionHandle], sent: &[RegionHandle]) -> bool {
        subscribed.is_empty() || sent.is_empty() || self.region_service.overlaps(subscribed, sent)
    }

    // Declarations

    pub fn publish_object_class_attributes<S>(
        &self,
        class: ObjectClassHandle,
        attributes: &AttributeSet,
        send: S,
    ) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.check_object_class(class)?;
        self.check_attributes(class, attributes)?;
        send()?;
        self.declarations_mut()?
            .publish_object_class(class, attributes);
        Ok(())
    }

    /// Unpublishes `attributes` of `class`, or every published attribute if
    /// `None`. Ownership of the unpublished attributes is given up on every
    /// known instance of the class.
    pub fn unpublish_object_class_attributes<S>(
        &self,
        class: ObjectClassHandle,
        attributes: Option<&AttributeSet>,
        send: S,
    ) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.check_object_class(class)?;
        if let Some(attributes) = attributes {
            self.check_attributes(class, attributes)?;
        }

        let instances = self.instances_of(Some(class))?;
        for instance in &instances {
            let instance = lock_instance(instance)?;
            if instance.has_pending_acquisition(attributes) {
                return Err(RtiError::OwnershipAcquisitionPending {
                    class,
                    object: instance.handle(),
                });
            }
        }

        send()?;

        let unpublished = {
            let mut declarations = self.declarations_mut()?;
            let attributes = match attributes {
                Some(attributes) => attributes.clone(),
                None => declarations
                    .published_attributes(class)
                    .cloned()
                    .unwrap_or_default(),
            };
            declarations.unpublish_object_class(class, &attributes)
        };

        for instance in &instances {
            lock_instance(instance)?.released(&unpublished);
        }
        debug!(
            "unpublished {} attributes of {} across {} instances",
            unpublished.len(),
            class,
            instances.len()
        );
        Ok(())
    }

    pub fn subscribe_object_class_attributes<S>(
        &self,
        class: ObjectClassHandle,
        attributes: &AttributeSet,
        regions: &[RegionHandle],
        send: S,
    ) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.check_object_class(class)?;
        self.check_attributes(class, attributes)?;
        send()?;
        self.declarations_mut()?
            .subscribe_object_class(class, attributes, regions);
        Ok(())
    }

    pub fn unsubscribe_object_class<S>(&self, class: ObjectClassHandle, send: S) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.check_object_class(class)?;
        send()?;
        self.declarations_mut()?.unsubscribe_object_class(class);
        Ok(())
    }

    pub fn publish_interaction_class<S>(&self, class: InteractionClassHandle, send: S) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.check_interaction_class(class)?;
        send()?;
        self.declarations_mut()?.publish_interaction_class(class);
        Ok(())
    }

    pub fn unpublish_interaction_class<S>(&self, class: InteractionClassHandle, send: S) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.check_interaction_class(class)?;
        send()?;
        self.declarations_mut()?.unpublish_interaction_class(class);
        Ok(())
    }

    pub fn subscribe_interaction_class<S>(
        &self,
        class: InteractionClassHandle,
        regions: &[RegionHandle],
        send: S,
    ) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.check_interaction_class(class)?;
        send()?;
        self.declarations_mut()?
            .subscribe_interaction_class(class, regions);
        Ok(())
    }

    pub fn unsubscribe_interaction_class<S>(&self, class: InteractionClassHandle, send: S) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.check_interaction_class(class)?;
        send()?;
        self.declarations_mut()?.unsubscribe_interaction_class(class);
        Ok(())
    }

    // Local object management

    /// Registers a new instance of `class`. `send` performs the coordinator
    /// round-trip and returns the allocated handle and final name.
    pub fn register_object_instance<S>(
        &self,
        class: ObjectClassHandle,
        name: Option<&str>,
        send: S,
    ) -> Result<ObjectInstanceHandle, RtiError>
    where
        S: FnOnce() -> Result<(ObjectInstanceHandle, String), RtiError>,
    {
        self.check_object_class(class)?;
        let mut owned = self
            .declarations()?
            .published_attributes(class)
            .cloned()
            .ok_or(RtiError::ObjectClassNotPublished { class })?;
        owned.insert(PRIVILEGE_TO_DELETE);

        if let Some(name) = name {
            let mut table = self.table_mut()?;
            if table.names.contains_key(name) || table.reserved_names.contains(name) {
                return Err(RtiError::ObjectInstanceNameInUse {
                    name: name.to_string(),
                });
            }
            table.reserved_names.insert(name.to_string());
        }

        let outcome = send();

        let mut table = self.table_mut()?;
        if let Some(name) = name {
            table.reserved_names.remove(name);
        }
        let (object, assigned_name) = outcome?;
        table.insert(ObjectInstance::registered(
            object,
            class,
            assigned_name,
            self.federate,
            &owned,
        ));
        debug!("registered {} of {}", object, class);
        Ok(object)
    }

    /// Validates an update: the instance is known and every attribute is
    /// defined and owned
    pub fn check_update(&self, object: ObjectInstanceHandle, values: &AttributeValues) -> Result<(), RtiError> {
        let instance = self.instance(object)?;
        let instance = lock_instance(&instance)?;
        self.check_attributes(instance.class(), values.keys())?;
        let attributes: AttributeSet = values.keys().copied().collect();
        instance.check_owned(&attributes)
    }

    pub fn check_interaction(
        &self,
        class: InteractionClassHandle,
        parameters: &ParameterValues,
    ) -> Result<(), RtiError> {
        self.check_interaction_class(class)?;
        if !self.declarations()?.is_interaction_class_published(class) {
            return Err(RtiError::InteractionClassNotPublished { class });
        }
        for parameter in parameters.keys() {
            if !self.object_model.is_parameter_defined(class, *parameter) {
                return Err(RtiError::InteractionParameterNotDefined {
                    class,
                    parameter: *parameter,
                });
            }
        }
        Ok(())
    }

    pub fn check_delete(&self, object: ObjectInstanceHandle) -> Result<(), RtiError> {
        let instance = self.instance(object)?;
        if !lock_instance(&instance)?.is_owned(PRIVILEGE_TO_DELETE) {
            return Err(RtiError::DeletePrivilegeNotHeld { object });
        }
        Ok(())
    }

    /// Forgets `object` after its deletion went out
    pub fn deleted(&self, object: ObjectInstanceHandle) -> Result<(), RtiError> {
        self.table_mut()?.remove(object);
        debug!("deleted {}", object);
        Ok(())
    }

    /// Keeps `object` until `time` is granted; the deletion can still be
    /// retracted through `retraction` before then
    pub fn deletion_scheduled(
        &self,
        object: ObjectInstanceHandle,
        retraction: MessageRetractionHandle,
        time: LogicalTime,
    ) -> Result<(), RtiError> {
        self.table_mut()?
            .scheduled_deletions
            .insert(retraction, (object, time));
        debug!("deletion of {} scheduled at {}", object, time);
        Ok(())
    }

    /// Drops a scheduled deletion after its message was retracted
    pub fn deletion_withdrawn(&self, retraction: MessageRetractionHandle) -> Result<(), RtiError> {
        if let Some((object, _)) = self.table_mut()?.scheduled_deletions.remove(&retraction) {
            debug!("deletion of {} withdrawn", object);
        }
        Ok(())
    }

    /// Forgets every instance whose scheduled deletion time is ≤ `time`
    pub fn apply_deletions_up_to(&self, time: LogicalTime) -> Result<usize, RtiError> {
        let mut table = self.table_mut()?;
        let due: Vec<(MessageRetractionHandle, ObjectInstanceHandle)> = table
            .scheduled_deletions
            .iter()
            .filter(|(_, (_, at))| *at <= time)
            .map(|(retraction, (object, _))| (*retraction, *object))
            .collect();
        for (retraction, object) in &due {
            table.scheduled_deletions.remove(retraction);
            if table.remove(*object).is_some() {
                debug!("deleted {} at {}", object, time);
            }
        }
        Ok(due.len())
    }

    /// Forgets a discovered instance without telling the coordinator
    pub fn local_delete_object_instance(&self, object: ObjectInstanceHandle) -> Result<(), RtiError> {
        let instance = self.instance(object)?;
        if let Some(attribute) = lock_instance(&instance)?.first_owned() {
            return Err(RtiError::FederateOwnsAttributes { object, attribute });
        }
        self.table_mut()?.remove(object);
        Ok(())
    }

    pub fn check_known_attributes(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
    ) -> Result<(), RtiError> {
        let instance = self.instance(object)?;
        let class = lock_instance(&instance)?.class();
        self.check_attributes(class, attributes)
    }

    pub fn is_attribute_owned_by_federate(
        &self,
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    ) -> Result<bool, RtiError> {
        let instance = self.instance(object)?;
        let instance = lock_instance(&instance)?;
        self.check_attributes(instance.class(), [attribute].iter())?;
        Ok(instance.is_owned(attribute))
    }

    pub fn ownership(
        &self,
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    ) -> Result<Option<AttributeOwnership>, RtiError> {
        let instance = self.instance(object)?;
        let ownership = lock_instance(&instance)?.ownership(attribute);
        Ok(ownership)
    }

    pub fn known_object_class(&self, object: ObjectInstanceHandle) -> Result<ObjectClassHandle, RtiError> {
        let instance = self.instance(object)?;
        let class = lock_instance(&instance)?.class();
        Ok(class)
    }

    pub fn object_instance_handle(&self, name: &str) -> Result<Option<ObjectInstanceHandle>, RtiError> {
        Ok(self.table()?.names.get(name).copied())
    }

    // Ownership

    fn transition<A, S, T>(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        apply: A,
        send: S,
    ) -> Result<T, RtiError>
    where
        A: FnOnce(&mut ObjectInstance, &AttributeSet) -> Result<OwnershipUndo, RtiError>,
        S: FnOnce() -> Result<T, RtiError>,
    {
        let instance = self.instance(object)?;
        let undo = {
            let mut guard = lock_instance(&instance)?;
            self.check_attributes(guard.class(), attributes)?;
            apply(&mut *guard, attributes)?
        };

        match send() {
            Ok(value) => Ok(value),
            Err(error) => {
                lock_instance(&instance)?.undo(undo);
                Err(error)
            }
        }
    }

    fn checked<C, S, T>(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        check: C,
        send: S,
    ) -> Result<T, RtiError>
    where
        C: FnOnce(&ObjectInstance, &AttributeSet) -> Result<(), RtiError>,
        S: FnOnce() -> Result<T, RtiError>,
    {
        let instance = self.instance(object)?;
        {
            let guard = lock_instance(&instance)?;
            self.check_attributes(guard.class(), attributes)?;
            check(&*guard, attributes)?;
        }
        send()
    }

    pub fn unconditional_divestiture<S>(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        send: S,
    ) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.transition(object, attributes, ObjectInstance::divest_unconditionally, send)
    }

    pub fn negotiated_divestiture<S>(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        send: S,
    ) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.transition(object, attributes, ObjectInstance::begin_negotiated_divestiture, send)
    }

    pub fn confirm_divestiture<S>(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        send: S,
    ) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.transition(object, attributes, ObjectInstance::confirm_divestiture, send)
    }

    pub fn cancel_negotiated_divestiture<S>(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        send: S,
    ) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.transition(object, attributes, ObjectInstance::cancel_negotiated_divestiture, send)
    }

    /// `send` answers with the attributes another federate took; those are
    /// dropped from the table and returned
    pub fn divestiture_if_wanted<S>(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        send: S,
    ) -> Result<AttributeSet, RtiError>
    where
        S: FnOnce() -> Result<AttributeSet, RtiError>,
    {
        let taken = self.checked(object, attributes, ObjectInstance::check_divest_if_wanted, send)?;
        let divested: AttributeSet = taken.intersection(attributes).copied().collect();
        if let Some(instance) = self.find_instance(object)? {
            lock_instance(&instance)?.released(&divested);
        }
        Ok(divested)
    }

    pub fn acquisition<S>(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        send: S,
    ) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.check_acquirable(object, attributes)?;
        self.transition(object, attributes, ObjectInstance::begin_acquisition, send)
    }

    pub fn acquisition_if_available<S>(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        send: S,
    ) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.check_acquirable(object, attributes)?;
        self.transition(object, attributes, ObjectInstance::begin_acquisition_if_available, send)
    }

    /// Only published attributes can be acquired
    fn check_acquirable(&self, object: ObjectInstanceHandle, attributes: &AttributeSet) -> Result<(), RtiError> {
        let class = self.known_object_class(object)?;
        self.check_attributes(class, attributes)?;
        let declarations = self.declarations()?;
        let published = declarations.published_attributes(class);
        for attribute in attributes {
            let is_published = *attribute == PRIVILEGE_TO_DELETE
                || published.map_or(false, |set| set.contains(attribute));
            if !is_published {
                return Err(RtiError::AttributeNotPublished {
                    class,
                    attribute: *attribute,
                });
            }
        }
        Ok(())
    }

    /// The pending marks stay until the coordinator confirms the
    /// cancellation or grants ownership
    pub fn cancel_acquisition<S>(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        send: S,
    ) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.checked(object, attributes, ObjectInstance::check_cancel_acquisition, send)
    }

    pub fn release_denied<S>(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        send: S,
    ) -> Result<(), RtiError>
    where
        S: FnOnce() -> Result<(), RtiError>,
    {
        self.checked(object, attributes, ObjectInstance::check_owned, send)
    }

    // Inbound

    /// Records a remote instance. Returns `false` when the discovery is
    /// stale and must not reach the application.
    pub fn discover(
        &self,
        object: ObjectInstanceHandle,
        class: ObjectClassHandle,
        name: &str,
        producer: FederateHandle,
    ) -> Result<bool, RtiError> {
        if !self.declarations()?.is_object_class_subscribed(class) {
            warn!("discovery of {} for unsubscribed {}, dropping", object, class);
            return Ok(false);
        }

        let mut table = self.table_mut()?;
        if table.by_handle.contains_key(&object) {
            warn!("{} discovered twice, dropping", object);
            return Ok(false);
        }
        table.insert(ObjectInstance::new(object, class, name.to_string(), producer));
        Ok(true)
    }

    /// Filters a reflection down to subscribed attributes. `None` means
    /// nothing is left to deliver.
    pub fn reflect(
        &self,
        object: ObjectInstanceHandle,
        attributes: AttributeValues,
        regions: &[RegionHandle],
    ) -> Result<Option<AttributeValues>, RtiError> {
        let Some(instance) = self.find_instance(object)? else {
            warn!("reflection for unknown {}, dropping", object);
            return Ok(None);
        };
        let class = lock_instance(&instance)?.class();

        let declarations = self.declarations()?;
        let Some(subscription) = declarations.subscription(class) else {
            warn!("reflection for {} of unsubscribed {}, dropping", object, class);
            return Ok(None);
        };
        if !self.in_scope(&subscription.regions, regions) {
            debug!("reflection for {} outside subscribed regions, dropping", object);
            return Ok(None);
        }

        let filtered: AttributeValues = attributes
            .into_iter()
            .filter(|(attribute, _)| subscription.attributes.contains(attribute))
            .collect();
        if filtered.is_empty() {
            return Ok(None);
        }
        Ok(Some(filtered))
    }

    pub fn receive_interaction(
        &self,
        class: InteractionClassHandle,
        regions: &[RegionHandle],
    ) -> Result<bool, RtiError> {
        let declarations = self.declarations()?;
        let Some(subscribed) = declarations.interaction_regions(class) else {
            warn!("interaction of unsubscribed {}, dropping", class);
            return Ok(false);
        };
        if !self.in_scope(subscribed, regions) {
            debug!("interaction of {} outside subscribed regions, dropping", class);
            return Ok(false);
        }
        Ok(true)
    }

    /// Whether a removal notice names a known instance
    pub fn check_removal(&self, object: ObjectInstanceHandle) -> Result<bool, RtiError> {
        if !self.table()?.by_handle.contains_key(&object) {
            warn!("removal of unknown {}, dropping", object);
            return Ok(false);
        }
        Ok(true)
    }

    /// Forgets instances whose removal reached the delivery queue
    pub fn removed(&self, objects: &[ObjectInstanceHandle]) -> Result<(), RtiError> {
        if objects.is_empty() {
            return Ok(());
        }
        let mut table = self.table_mut()?;
        for object in objects {
            if table.remove(*object).is_some() {
                debug!("removed {}", object);
            }
        }
        Ok(())
    }

    /// Attributes of a provide-update request this federate actually owns
    pub fn provide_update(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
    ) -> Result<Option<AttributeSet>, RtiError> {
        let Some(instance) = self.find_instance(object)? else {
            warn!("update request for unknown {}, dropping", object);
            return Ok(None);
        };
        let instance = lock_instance(&instance)?;
        let owned: AttributeSet = attributes
            .iter()
            .copied()
            .filter(|attribute| instance.is_owned(*attribute))
            .collect();
        Ok(if owned.is_empty() { None } else { Some(owned) })
    }

    pub fn is_known(&self, object: ObjectInstanceHandle) -> Result<bool, RtiError> {
        let known = self.table()?.by_handle.contains_key(&object);
        if !known {
            warn!("ownership notice for unknown {}, dropping", object);
        }
        Ok(known)
    }

    pub fn acquisition_notification(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
    ) -> Result<bool, RtiError> {
        let Some(instance) = self.find_instance(object)? else {
            warn!("acquisition notification for unknown {}, dropping", object);
            return Ok(false);
        };
        lock_instance(&instance)?.acquired(attributes);
        Ok(true)
    }

    /// Unavailable attributes and confirmed cancellations both end an
    /// acquisition
    pub fn acquisition_ended(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
    ) -> Result<bool, RtiError> {
        let Some(instance) = self.find_instance(object)? else {
            warn!("acquisition outcome for unknown {}, dropping", object);
            return Ok(false);
        };
        lock_instance(&instance)?.clear_pending_acquisition(attributes);
        Ok(true)
    }

    // Resign

    pub fn resign(&self, action: ResignAction) -> Result<(), RtiError> {
        let instances = self.instances_of(None)?;
        let mut deleted = Vec::new();
        for instance in &instances {
            let mut instance = lock_instance(instance)?;
            if action.cancels_acquisitions() {
                instance.clear_all_pending_acquisitions();
            }
            if action.deletes_objects() && instance.is_owned(PRIVILEGE_TO_DELETE) {
                deleted.push(instance.handle());
                continue;
            }
            if action.divests_attributes() {
                instance.divest_all();
            }
        }

        let mut table = self.table_mut()?;
        for object in &deleted {
            table.remove(*object);
        }
        info!("resign action {:?} deleted {} instances", action, deleted.len());
        Ok(())
    }

    // Snapshot

    pub fn snapshot(&self) -> Result<(DeclarationSnapshot, Vec<ObjectSnapshot>), RtiError> {
        let declarations = self.declarations()?.snapshot();
        let mut objects = Vec::new();
        for instance in self.instances_of(None)? {
            let instance = lock_instance(&instance)?;
            objects.push(ObjectSnapshot {
                object: instance.handle(),
                class: instance.class(),
                name: instance.name().to_string(),
                producer: instance.producer(),
                owned: instance.owned_attributes(),
            });
        }
        objects.sort_by_key(|object| object.object);
        Ok((declarations, objects))
    }

    pub fn restore(
        &self,
        declarations: &DeclarationSnapshot,
        objects: &[ObjectSnapshot],
    ) -> Result<(), RtiError> {
        *self.declarations_mut()? = Declarations::restore(declarations);

        let mut table = InstanceTable::default();
        for object in objects {
            table.insert(ObjectInstance::registered(
                object.object,
                object.class,
                object.name.clone(),
                object.producer,
                &object.owned,
            ));
        }
        *self.table_mut()? = table;
        Ok(())
    }
}
