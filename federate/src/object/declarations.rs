use std::collections::{HashMap, HashSet};

use hla_shared::{
    AttributeSet, DeclarationSnapshot, InteractionClassHandle, ObjectClassHandle, RegionHandle,
};

/// Attributes of one subscribed object class and the regions the
/// subscription is limited to. No regions means the whole routing space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Subscription {
    pub attributes: AttributeSet,
    pub regions: Vec<RegionHandle>,
}

fn merge_regions(target: &mut Vec<RegionHandle>, regions: &[RegionHandle]) {
    for region in regions {
        if !target.contains(region) {
            target.push(*region);
        }
    }
}

/// Publication and subscription interest of the federate
#[derive(Default)]
pub struct Declarations {
    published_objects: HashMap<ObjectClassHandle, AttributeSet>,
    subscribed_objects: HashMap<ObjectClassHandle, Subscription>,
    published_interactions: HashSet<InteractionClassHandle>,
    subscribed_interactions: HashMap<InteractionClassHandle, Vec<RegionHandle>>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    // Object classes

    pub fn published_attributes(&self, class: ObjectClassHandle) -> Option<&AttributeSet> {
        self.published_objects
            .get(&class)
            .filter(|attributes| !attributes.is_empty())
    }

    pub fn publish_object_class(&mut self, class: ObjectClassHandle, attributes: &AttributeSet) {
        self.published_objects
            .entry(class)
            .or_default()
            .extend(attributes.iter().copied());
    }

    /// Removes `attributes` from the publication and returns the ones that
    /// actually were published
    pub fn unpublish_object_class(
        &mut self,
        class: ObjectClassHandle,
        attributes: &AttributeSet,
    ) -> AttributeSet {
        let Some(published) = self.published_objects.get_mut(&class) else {
            return AttributeSet::new();
        };
        let removed: AttributeSet = published.intersection(attributes).copied().collect();
        published.retain(|attribute| !attributes.contains(attribute));
        if published.is_empty() {
            self.published_objects.remove(&class);
        }
        removed
    }

    pub fn subscription(&self, class: ObjectClassHandle) -> Option<&Subscription> {
        self.subscribed_objects.get(&class)
    }

    pub fn is_object_class_subscribed(&self, class: ObjectClassHandle) -> bool {
        self.subscribed_objects.contains_key(&class)
    }

    pub fn subscribe_object_class(
        &mut self,
        class: ObjectClassHandle,
        attributes: &AttributeSet,
        regions: &[RegionHandle],
    ) {
        let subscription = self.subscribed_objects.entry(class).or_default();
        subscription.attributes.extend(attributes.iter().copied());
        merge_regions(&mut subscription.regions, regions);
    }

    pub fn unsubscribe_object_class(&mut self, class: ObjectClassHandle) -> bool {
        self.subscribed_objects.remove(&class).is_some()
    }

    // Interaction classes

    pub fn is_interaction_class_published(&self, class: InteractionClassHandle) -> bool {
        self.published_interactions.contains(&class)
    }

    pub fn publish_interaction_class(&mut self, class: InteractionClassHandle) {
        self.published_interactions.insert(class);
    }

    pub fn unpublish_interaction_class(&mut self, class: InteractionClassHandle) -> bool {
        self.published_interactions.remove(&class)
    }

    pub fn interaction_regions(&self, class: InteractionClassHandle) -> Option<&Vec<RegionHandle>> {
        self.subscribed_interactions.get(&class)
    }

    pub fn subscribe_interaction_class(
        &mut self,
        class: InteractionClassHandle,
        regions: &[RegionHandle],
    ) {
        merge_regions(self.subscribed_interactions.entry(class).or_default(), regions);
    }

    pub fn unsubscribe_interaction_class(&mut self, class: InteractionClassHandle) -> bool {
        self.subscribed_interactions.remove(&class).is_some()
    }

    pub fn snapshot(&self) -> DeclarationSnapshot {
        DeclarationSnapshot {
            published_objects: self.published_objects.clone(),
            subscribed_objects: self
                .subscribed_objects
                .iter()
                .map(|(class, subscription)| {
                    (
                        *class,
                        (subscription.attributes.clone(), subscription.regions.clone()),
                    )
                })
                .collect(),
            published_interactions: self.published_interactions.clone(),
            subscribed_interactions: self.subscribed_interactions.clone(),
        }
    }

    pub fn restore(snapshot: &DeclarationSnapshot) -> Self {
        Self {
            published_objects: snapshot.published_objects.clone(),
            subscribed_objects: snapshot
                .subscribed_objects
                .iter()
                .map(|(class, (attributes, regions))| {
                    (
                        *class,
                        Subscription {
                            attributes: attributes.clone(),
                            regions: regions.clone(),
                        },
                    )
                })
                .collect(),
            published_interactions: snapshot.published_interactions.clone(),
            subscribed_interactions: snapshot.subscribed_interactions.clone(),
        }
    }
}
