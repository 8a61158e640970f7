use crate::RegionHandle;

/// Data distribution management collaborator. Region geometry stays behind
/// this trait; the runtime only asks whether two region sets intersect.
pub trait RegionService: Send + Sync {
    fn overlaps(&self, subscribed: &[RegionHandle], sent: &[RegionHandle]) -> bool;
}

/// Region service for federations without DDM: everything is in scope
#[derive(Default, Clone, Copy)]
pub struct DefaultRegion;

impl RegionService for DefaultRegion {
    fn overlaps(&self, _subscribed: &[RegionHandle], _sent: &[RegionHandle]) -> bool {
        true
    }
}
