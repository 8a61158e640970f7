use log::debug;

use hla_shared::{
    AttributeSet, AttributeValues, InteractionClassHandle, LogicalTime, MessageRetractionHandle,
    ObjectClassHandle, ObjectInstanceHandle, OrderType, ParameterValues, RegionHandle, Request,
    Response, RtiError, Tag,
};

use super::Federate;

impl Federate {
    // Declarations

    pub fn publish_object_class_attributes(
        &self,
        class: ObjectClassHandle,
        attributes: &AttributeSet,
    ) -> Result<(), RtiError> {
        let _active = self.state.check_active("publishObjectClassAttributes")?;
        self.objects
            .publish_object_class_attributes(class, attributes, || {
                self.connection
                    .acknowledge(Request::PublishObjectClassAttributes {
                        class,
                        attributes: attributes.clone(),
                    })
            })
    }

    /// Unpublishes every attribute of `class`
    pub fn unpublish_object_class(&self, class: ObjectClassHandle) -> Result<(), RtiError> {
        let _active = self.state.check_active("unpublishObjectClass")?;
        self.unpublish(class, None)
    }

    pub fn unpublish_object_class_attributes(
        &self,
        class: ObjectClassHandle,
        attributes: &AttributeSet,
    ) -> Result<(), RtiError> {
        let _active = self.state.check_active("unpublishObjectClassAttributes")?;
        self.unpublish(class, Some(attributes))
    }

    fn unpublish(
        &self,
        class: ObjectClassHandle,
        attributes: Option<&AttributeSet>,
    ) -> Result<(), RtiError> {
        self.objects
            .unpublish_object_class_attributes(class, attributes, || {
                self.connection
                    .acknowledge(Request::UnpublishObjectClassAttributes {
                        class,
                        // an empty set stands for the whole class
                        attributes: attributes.cloned().unwrap_or_default(),
                    })
            })
    }

    pub fn subscribe_object_class_attributes(
        &self,
        class: ObjectClassHandle,
        attributes: &AttributeSet,
    ) -> Result<(), RtiError> {
        self.subscribe_object_class_attributes_with_regions(class, attributes, &[])
    }

    /// Reflections whose sender regions do not overlap `regions` are
    /// dropped on arrival
    pub fn subscribe_object_class_attributes_with_regions(
        &self,
        class: ObjectClassHandle,
        attributes: &AttributeSet,
        regions: &[RegionHandle],
    ) -> Result<(), RtiError> {
        let _active = self.state.check_active("subscribeObjectClassAttributes")?;
        self.objects
            .subscribe_object_class_attributes(class, attributes, regions, || {
                self.connection
                    .acknowledge(Request::SubscribeObjectClassAttributes {
                        class,
                        attributes: attributes.clone(),
                        regions: regions.to_vec(),
                    })
            })
    }

    pub fn unsubscribe_object_class(&self, class: ObjectClassHandle) -> Result<(), RtiError> {
        let _active = self.state.check_active("unsubscribeObjectClass")?;
        self.objects.unsubscribe_object_class(class, || {
            self.connection
                .acknowledge(Request::UnsubscribeObjectClass { class })
        })
    }

    pub fn publish_interaction_class(&self, class: InteractionClassHandle) -> Result<(), RtiError> {
        let _active = self.state.check_active("publishInteractionClass")?;
        self.objects.publish_interaction_class(class, || {
            self.connection
                .acknowledge(Request::PublishInteractionClass { class })
        })
    }

    pub fn unpublish_interaction_class(&self, class: InteractionClassHandle) -> Result<(), RtiError> {
        let _active = self.state.check_active("unpublishInteractionClass")?;
        self.objects.unpublish_interaction_class(class, || {
            self.connection
                .acknowledge(Request::UnpublishInteractionClass { class })
        })
    }

    pub fn subscribe_interaction_class(&self, class: InteractionClassHandle) -> Result<(), RtiError> {
        self.subscribe_interaction_class_with_regions(class, &[])
    }

    pub fn subscribe_interaction_class_with_regions(
        &self,
        class: InteractionClassHandle,
        regions: &[RegionHandle],
    ) -> Result<(), RtiError> {
        let _active = self.state.check_active("subscribeInteractionClass")?;
        self.objects
            .subscribe_interaction_class(class, regions, || {
                self.connection
                    .acknowledge(Request::SubscribeInteractionClass {
                        class,
                        regions: regions.to_vec(),
                    })
            })
    }

    pub fn unsubscribe_interaction_class(
        &self,
        class: InteractionClassHandle,
    ) -> Result<(), RtiError> {
        let _active = self.state.check_active("unsubscribeInteractionClass")?;
        self.objects.unsubscribe_interaction_class(class, || {
            self.connection
                .acknowledge(Request::UnsubscribeInteractionClass { class })
        })
    }

    // Registration

    pub fn register_object_instance(
        &self,
        class: ObjectClassHandle,
    ) -> Result<ObjectInstanceHandle, RtiError> {
        let _active = self.state.check_active("registerObjectInstance")?;
        self.register(class, None)
    }

    pub fn register_object_instance_with_name(
        &self,
        class: ObjectClassHandle,
        name: &str,
    ) -> Result<ObjectInstanceHandle, RtiError> {
        let _active = self.state.check_active("registerObjectInstance")?;
        self.register(class, Some(name))
    }

    fn register(
        &self,
        class: ObjectClassHandle,
        name: Option<&str>,
    ) -> Result<ObjectInstanceHandle, RtiError> {
        self.objects.register_object_instance(class, name, || {
            let request = Request::RegisterObjectInstance {
                class,
                name: name.map(str::to_string),
            };
            match self.connection.request(request)? {
                Response::ObjectRegistered { object, name } => Ok((object, name)),
                _ => Err(RtiError::UnexpectedResponse {
                    operation: "registerObjectInstance",
                }),
            }
        })
    }

    pub fn get_object_instance_handle(
        &self,
        name: &str,
    ) -> Result<Option<ObjectInstanceHandle>, RtiError> {
        self.state.check_joined()?;
        self.objects.object_instance_handle(name)
    }

    // Updates, interactions and deletions

    /// Sends new values for owned attributes. With a time argument and
    /// regulation enabled the update goes out in timestamp order and a
    /// retraction handle is returned.
    pub fn update_attribute_values(
        &self,
        object: ObjectInstanceHandle,
        attributes: AttributeValues,
        tag: Tag,
        time: Option<LogicalTime>,
    ) -> Result<Option<MessageRetractionHandle>, RtiError> {
        let _active = self.state.check_active("updateAttributeValues")?;
        self.objects.check_update(object, &attributes)?;
        self.send_ordered(time, |sent_order, retraction| {
            Request::UpdateAttributeValues {
                object,
                attributes,
                tag,
                sent_order,
                time,
                retraction,
            }
        })
    }

    pub fn send_interaction(
        &self,
        class: InteractionClassHandle,
        parameters: ParameterValues,
        tag: Tag,
        time: Option<LogicalTime>,
    ) -> Result<Option<MessageRetractionHandle>, RtiError> {
        let _active = self.state.check_active("sendInteraction")?;
        self.objects.check_interaction(class, &parameters)?;
        self.send_ordered(time, |sent_order, retraction| Request::SendInteraction {
            class,
            parameters,
            tag,
            sent_order,
            time,
            retraction,
        })
    }

    /// Deletes a registered instance this federate holds the delete
    /// privilege for. A receive-order deletion forgets the instance once
    /// the coordinator accepted it; a timestamp-order one keeps it until
    /// the deletion time is granted, so a retraction can still undo it.
    pub fn delete_object_instance(
        &self,
        object: ObjectInstanceHandle,
        tag: Tag,
        time: Option<LogicalTime>,
    ) -> Result<Option<MessageRetractionHandle>, RtiError> {
        let _active = self.state.check_active("deleteObjectInstance")?;
        self.objects.check_delete(object)?;
        let retraction = self.send_ordered(time, |sent_order, retraction| {
            Request::DeleteObjectInstance {
                object,
                tag,
                sent_order,
                time,
                retraction,
            }
        })?;
        match (retraction, time) {
            (Some(handle), Some(time)) => self.objects.deletion_scheduled(object, handle, time)?,
            _ => self.objects.deleted(object)?,
        }
        Ok(retraction)
    }

    /// Classifies the send, issues a retraction handle for timestamp-order
    /// sends and withdraws it again if the coordinator never took the
    /// message
    fn send_ordered<B>(
        &self,
        time: Option<LogicalTime>,
        build: B,
    ) -> Result<Option<MessageRetractionHandle>, RtiError>
    where
        B: FnOnce(OrderType, Option<MessageRetractionHandle>) -> Request,
    {
        let sent_order = self.time.classify_send(time)?;
        let retraction = match (sent_order, time) {
            (OrderType::Timestamp, Some(time)) => Some(self.retraction.add(time)?),
            _ => None,
        };

        if let Err(error) = self.connection.acknowledge(build(sent_order, retraction)) {
            if let Some(handle) = retraction {
                self.retraction.discard(handle)?;
            }
            return Err(error);
        }
        debug!("sent {:?} {:?}", sent_order, retraction);
        Ok(retraction)
    }

    pub fn local_delete_object_instance(&self, object: ObjectInstanceHandle) -> Result<(), RtiError> {
        let _active = self.state.check_active("localDeleteObjectInstance")?;
        self.objects.local_delete_object_instance(object)
    }

    pub fn request_attribute_value_update(
        &self,
        object: ObjectInstanceHandle,
        attributes: &AttributeSet,
        tag: Tag,
    ) -> Result<(), RtiError> {
        let _active = self.state.check_active("requestAttributeValueUpdate")?;
        self.objects.check_known_attributes(object, attributes)?;
        self.connection
            .acknowledge(Request::RequestAttributeValueUpdate {
                object,
                attributes: attributes.clone(),
                tag,
            })
    }

    // Retraction

    /// Withdraws a timestamp-order send whose time has not been granted yet
    pub fn retract(&self, retraction: MessageRetractionHandle) -> Result<(), RtiError> {
        let _active = self.state.check_active("retract")?;
        let granted = self.time.query_logical_time()?;
        self.retraction.retract(retraction, granted, |retraction| {
            self.connection.acknowledge(Request::Retract { retraction })
        })?;
        self.objects.deletion_withdrawn(retraction)
    }
}
