use hla_shared::{
    AttributeHandle, AttributeSet, ObjectInstanceHandle, Request, Response, RtiError, Tag,
};

use super::Federate;

impl Federate {
    // Divestiture

    /// Gives up `attributes` at once; no confirmation round-trip follows
    pub fn unconditional_attribute_ownership_divestiture(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
    ) -> Result<(), RtiError> {
        let _active = self
            .state
            .check_active("unconditionalAttributeOwnershipDivestiture")?;
        self.objects
            .unconditional_divestiture(object, attributes, || {
                self.connection
                    .acknowledge(Request::UnconditionalAttributeOwnershipDivestiture {
                        object,
                        attributes: attributes.clone(),
                    })
            })
    }

    pub fn negotiated_attribute_ownership_divestiture(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        tag: Tag,
    ) -> Result<(), RtiError> {
        let _active = self
            .state
            .check_active("negotiatedAttributeOwnershipDivestiture")?;
        self.objects
            .negotiated_divestiture(object, attributes, || {
                self.connection
                    .acknowledge(Request::NegotiatedAttributeOwnershipDivestiture {
                        object,
                        attributes: attributes.clone(),
                        tag,
                    })
            })
    }

    /// Second phase of a negotiated divestiture, after the coordinator
    /// asked for confirmation
    pub fn confirm_divestiture(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        tag: Tag,
    ) -> Result<(), RtiError> {
        let _active = self.state.check_active("confirmDivestiture")?;
        self.objects.confirm_divestiture(object, attributes, || {
            self.connection.acknowledge(Request::ConfirmDivestiture {
                object,
                attributes: attributes.clone(),
                tag,
            })
        })
    }

    pub fn cancel_negotiated_attribute_ownership_divestiture(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
    ) -> Result<(), RtiError> {
        let _active = self
            .state
            .check_active("cancelNegotiatedAttributeOwnershipDivestiture")?;
        self.objects
            .cancel_negotiated_divestiture(object, attributes, || {
                self.connection.acknowledge(
                    Request::CancelNegotiatedAttributeOwnershipDivestiture {
                        object,
                        attributes: attributes.clone(),
                    },
                )
            })
    }

    /// Offers `attributes` to any federate currently trying to acquire
    /// them. Returns the ones that were taken.
    pub fn attribute_ownership_divestiture_if_wanted(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
    ) -> Result<AttributeSet, RtiError> {
        let _active = self
            .state
            .check_active("attributeOwnershipDivestitureIfWanted")?;
        self.objects.divestiture_if_wanted(object, attributes, || {
            let request = Request::AttributeOwnershipDivestitureIfWanted {
                object,
                attributes: attributes.clone(),
            };
            match self.connection.request(request)? {
                Response::Attributes(taken) => Ok(taken),
                _ => Err(RtiError::UnexpectedResponse {
                    operation: "attributeOwnershipDivestitureIfWanted",
                }),
            }
        })
    }

    pub fn attribute_ownership_release_denied(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
    ) -> Result<(), RtiError> {
        let _active = self
            .state
            .check_active("attributeOwnershipReleaseDenied")?;
        self.objects.release_denied(object, attributes, || {
            self.connection
                .acknowledge(Request::AttributeOwnershipReleaseDenied {
                    object,
                    attributes: attributes.clone(),
                })
        })
    }

    // Acquisition

    pub fn attribute_ownership_acquisition(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        tag: Tag,
    ) -> Result<(), RtiError> {
        let _active = self.state.check_active("attributeOwnershipAcquisition")?;
        self.objects.acquisition(object, attributes, || {
            self.connection
                .acknowledge(Request::AttributeOwnershipAcquisition {
                    object,
                    attributes: attributes.clone(),
                    tag,
                })
        })
    }

    pub fn attribute_ownership_acquisition_if_available(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
    ) -> Result<(), RtiError> {
        let _active = self
            .state
            .check_active("attributeOwnershipAcquisitionIfAvailable")?;
        self.objects
            .acquisition_if_available(object, attributes, || {
                self.connection
                    .acknowledge(Request::AttributeOwnershipAcquisitionIfAvailable {
                        object,
                        attributes: attributes.clone(),
                    })
            })
    }

    /// The request stays pending until the coordinator confirms the
    /// cancellation or grants ownership first
    pub fn cancel_attribute_ownership_acquisition(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
    ) -> Result<(), RtiError> {
        let _active = self
            .state
            .check_active("cancelAttributeOwnershipAcquisition")?;
        self.objects.cancel_acquisition(object, attributes, || {
            self.connection
                .acknowledge(Request::CancelAttributeOwnershipAcquisition {
                    object,
                    attributes: attributes.clone(),
                })
        })
    }

    // Queries

    /// Answered through an `InformAttributeOwnership` callback
    pub fn query_attribute_ownership(
        &self,
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    ) -> Result<(), RtiError> {
        let _active = self.state.check_active("queryAttributeOwnership")?;
        self.objects
            .check_known_attributes(object, &AttributeSet::from([attribute]))?;
        self.connection
            .acknowledge(Request::QueryAttributeOwnership { object, attribute })
    }

    pub fn is_attribute_owned_by_federate(
        &self,
        object: ObjectInstanceHandle,
        attribute: AttributeHandle,
    ) -> Result<bool, RtiError> {
        self.state.check_joined()?;
        self.objects
            .is_attribute_owned_by_federate(object, attribute)
    }
}
