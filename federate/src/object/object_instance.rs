use std::collections::HashMap;

use hla_shared::{
    AttributeHandle, AttributeSet, FederateHandle, ObjectClassHandle, ObjectInstanceHandle,
    RtiError,
};

/// Local ownership state of one attribute. An attribute with no entry is
/// neither owned nor being acquired by this federate, so the states are
/// mutually exclusive by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeOwnership {
    Owned,
    /// Owned, with a negotiated divestiture outstanding
    Divesting,
    Acquiring,
    AcquiringIfAvailable,
}

impl AttributeOwnership {
    pub fn is_owned(&self) -> bool {
        matches!(self, AttributeOwnership::Owned | AttributeOwnership::Divesting)
    }

    pub fn is_acquiring(&self) -> bool {
        matches!(
            self,
            AttributeOwnership::Acquiring | AttributeOwnership::AcquiringIfAvailable
        )
    }
}

/// Prior states of the attributes a transition touched
pub type OwnershipUndo = Vec<(AttributeHandle, Option<AttributeOwnership>)>;

pub struct ObjectInstance {
    handle: ObjectInstanceHandle,
    class: ObjectClassHandle,
    name: String,
    producer: FederateHandle,
    attributes: HashMap<AttributeHandle, AttributeOwnership>,
}

impl ObjectInstance {
    pub fn new(
        handle: ObjectInstanceHandle,
        class: ObjectClassHandle,
        name: String,
        producer: FederateHandle,
    ) -> Self {
        Self {
            handle,
            class,
            name,
            producer,
            attributes: HashMap::new(),
        }
    }

    /// A freshly registered instance owning `owned`
    pub fn registered(
        handle: ObjectInstanceHandle,
        class: ObjectClassHandle,
        name: String,
        producer: FederateHandle,
        owned: &AttributeSet,
    ) -> Self {
        let mut instance = Self::new(handle, class, name, producer);
        for attribute in owned {
            instance
                .attributes
                .insert(*attribute, AttributeOwnership::Owned);
        }
        instance
    }

    pub fn handle(&self) -> ObjectInstanceHandle {
        self.handle
    }

    pub fn class(&self) -> ObjectClassHandle {
        self.class
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn producer(&self) -> FederateHandle {
        self.producer
    }

    pub fn ownership(&self, attribute: AttributeHandle) -> Option<AttributeOwnership> {
        self.attributes.get(&attribute).copied()
    }

    pub fn is_owned(&self, attribute: AttributeHandle) -> bool {
        self.ownership(attribute)
            .map_or(false, |ownership| ownership.is_owned())
    }

    pub fn owned_attributes(&self) -> AttributeSet {
        self.attributes
            .iter()
            .filter(|(_, ownership)| ownership.is_owned())
            .map(|(attribute, _)| *attribute)
            .collect()
    }

    pub fn first_owned(&self) -> Option<AttributeHandle> {
        self.attributes
            .iter()
            .find(|(_, ownership)| ownership.is_owned())
            .map(|(attribute, _)| *attribute)
    }

    /// Whether any of `attributes` (all of them if `None`) is being acquired
    pub fn has_pending_acquisition(&self, attributes: Option<&AttributeSet>) -> bool {
        self.attributes.iter().any(|(attribute, ownership)| {
            ownership.is_acquiring() && attributes.map_or(true, |set| set.contains(attribute))
        })
    }

    fn apply(&mut self, attributes: &AttributeSet, next: Option<AttributeOwnership>) -> OwnershipUndo {
        let mut undo = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            let previous = match next {
                Some(state) => self.attributes.insert(*attribute, state),
                None => self.attributes.remove(attribute),
            };
            undo.push((*attribute, previous));
        }
        undo
    }

    pub fn undo(&mut self, undo: OwnershipUndo) {
        for (attribute, previous) in undo {
            match previous {
                Some(state) => {
                    self.attributes.insert(attribute, state);
                }
                None => {
                    self.attributes.remove(&attribute);
                }
            }
        }
    }

    fn not_owned(&self, attribute: AttributeHandle) -> RtiError {
        RtiError::AttributeNotOwned {
            object: self.handle,
            attribute,
        }
    }

    // Checks

    pub fn check_owned(&self, attributes: &AttributeSet) -> Result<(), RtiError> {
        match attributes.iter().find(|attribute| !self.is_owned(**attribute)) {
            Some(attribute) => Err(self.not_owned(*attribute)),
            None => Ok(()),
        }
    }

    /// Owned and not already being divested
    fn check_divestable(&self, attributes: &AttributeSet) -> Result<(), RtiError> {
        for attribute in attributes {
            match self.ownership(*attribute) {
                Some(AttributeOwnership::Owned) => {}
                Some(AttributeOwnership::Divesting) => {
                    return Err(RtiError::AttributeAlreadyBeingDivested {
                        object: self.handle,
                        attribute: *attribute,
                    })
                }
                _ => return Err(self.not_owned(*attribute)),
            }
        }
        Ok(())
    }

    fn check_divesting(&self, attributes: &AttributeSet) -> Result<(), RtiError> {
        for attribute in attributes {
            match self.ownership(*attribute) {
                Some(AttributeOwnership::Divesting) => {}
                Some(AttributeOwnership::Owned) => {
                    return Err(RtiError::AttributeDivestitureWasNotRequested {
                        object: self.handle,
                        attribute: *attribute,
                    })
                }
                _ => return Err(self.not_owned(*attribute)),
            }
        }
        Ok(())
    }

    fn check_not_owned(&self, attributes: &AttributeSet) -> Result<(), RtiError> {
        match attributes.iter().find(|attribute| self.is_owned(**attribute)) {
            Some(attribute) => Err(RtiError::FederateOwnsAttributes {
                object: self.handle,
                attribute: *attribute,
            }),
            None => Ok(()),
        }
    }

    pub fn check_cancel_acquisition(&self, attributes: &AttributeSet) -> Result<(), RtiError> {
        for attribute in attributes {
            match self.ownership(*attribute) {
                Some(state) if state.is_acquiring() => {}
                Some(_) => {
                    return Err(RtiError::AttributeAlreadyOwned {
                        object: self.handle,
                        attribute: *attribute,
                    })
                }
                None => {
                    return Err(RtiError::AttributeAcquisitionWasNotRequested {
                        object: self.handle,
                        attribute: *attribute,
                    })
                }
            }
        }
        Ok(())
    }

    // Transitions. Each validates the whole set before touching anything.

    pub fn divest_unconditionally(&mut self, attributes: &AttributeSet) -> Result<OwnershipUndo, RtiError> {
        self.check_owned(attributes)?;
        Ok(self.apply(attributes, None))
    }

    pub fn begin_negotiated_divestiture(
        &mut self,
        attributes: &AttributeSet,
    ) -> Result<OwnershipUndo, RtiError> {
        self.check_divestable(attributes)?;
        Ok(self.apply(attributes, Some(AttributeOwnership::Divesting)))
    }

    pub fn confirm_divestiture(&mut self, attributes: &AttributeSet) -> Result<OwnershipUndo, RtiError> {
        self.check_divesting(attributes)?;
        Ok(self.apply(attributes, None))
    }

    pub fn cancel_negotiated_divestiture(
        &mut self,
        attributes: &AttributeSet,
    ) -> Result<OwnershipUndo, RtiError> {
        self.check_divesting(attributes)?;
        Ok(self.apply(attributes, Some(AttributeOwnership::Owned)))
    }

    pub fn check_divest_if_wanted(&self, attributes: &AttributeSet) -> Result<(), RtiError> {
        self.check_divestable(attributes)
    }

    pub fn begin_acquisition(&mut self, attributes: &AttributeSet) -> Result<OwnershipUndo, RtiError> {
        self.check_not_owned(attributes)?;
        Ok(self.apply(attributes, Some(AttributeOwnership::Acquiring)))
    }

    pub fn begin_acquisition_if_available(
        &mut self,
        attributes: &AttributeSet,
    ) -> Result<OwnershipUndo, RtiError> {
        self.check_not_owned(attributes)?;
        if let Some(attribute) = attributes
            .iter()
            .find(|attribute| self.ownership(**attribute).is_some())
        {
            return Err(RtiError::AttributeAlreadyBeingAcquired {
                object: self.handle,
                attribute: *attribute,
            });
        }
        Ok(self.apply(attributes, Some(AttributeOwnership::AcquiringIfAvailable)))
    }

    /// Ownership granted by the coordinator; pending marks become ownership
    /// in one step
    pub fn acquired(&mut self, attributes: &AttributeSet) {
        self.apply(attributes, Some(AttributeOwnership::Owned));
    }

    /// Ownership taken away by the coordinator
    pub fn released(&mut self, attributes: &AttributeSet) {
        for attribute in attributes {
            if self.is_owned(*attribute) {
                self.attributes.remove(attribute);
            }
        }
    }

    pub fn clear_pending_acquisition(&mut self, attributes: &AttributeSet) {
        for attribute in attributes {
            if self
                .ownership(*attribute)
                .map_or(false, |state| state.is_acquiring())
            {
                self.attributes.remove(attribute);
            }
        }
    }

    pub fn clear_all_pending_acquisitions(&mut self) {
        self.attributes.retain(|_, state| !state.is_acquiring());
    }

    pub fn divest_all(&mut self) {
        self.attributes.retain(|_, state| !state.is_owned());
    }
}
