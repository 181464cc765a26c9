pub mod endpoint_lists;

pub use endpoint_lists::{
    DEPRECATED_ENDPOINTS, EndpointLists, EndpointScanner, parse_endpoint_list, read_endpoint_lists,
    regenerate_endpoint_lists,
};
