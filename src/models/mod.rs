pub mod endpoint;
pub mod policy;

use std::collections::BTreeMap;

use indexmap::IndexMap;

pub use endpoint::{ApiFamily, ApiVersion, EndpointRecord, HttpMethod, ProductLine};
pub use policy::{EquivalencePolicy, MethodPathFamily, MethodPathFamilyVersion};

/// Records of one product line keyed by their endpoint string, in first-seen order.
pub type EndpointSet = IndexMap<String, EndpointRecord>;

pub type EndpointsByLine = BTreeMap<ProductLine, EndpointSet>;
