use super::EndpointRecord;

/// Decides whether a documented and an implemented record describe the same endpoint.
pub trait EquivalencePolicy {
    fn name(&self) -> &'static str;
    fn same_endpoint(&self, left: &EndpointRecord, right: &EndpointRecord) -> bool;
}

/// Matches on method, path and family. Version and product line are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodPathFamily;

impl EquivalencePolicy for MethodPathFamily {
    fn name(&self) -> &'static str {
        "method+path+family"
    }

    fn same_endpoint(&self, left: &EndpointRecord, right: &EndpointRecord) -> bool {
        left.http_method == right.http_method
            && left.path == right.path
            && left.api_family == right.api_family
    }
}

/// Same as [`MethodPathFamily`] but a version bump counts as a different endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodPathFamilyVersion;

impl EquivalencePolicy for MethodPathFamilyVersion {
    fn name(&self) -> &'static str {
        "method+path+family+version"
    }

    fn same_endpoint(&self, left: &EndpointRecord, right: &EndpointRecord) -> bool {
        MethodPathFamily.same_endpoint(left, right) && left.version == right.version
    }
}
