pub mod calls;
pub mod diff;
pub mod parser;
pub mod pipeline;
pub mod rules;
pub mod stubs;

pub use calls::{CallExtractor, ClientCall, reverse_parse};
pub use diff::{EndpointDiff, LineDiff, diff_endpoints};
pub use parser::{normalize_path, parse_endpoint};
pub use pipeline::{CodegenPipeline, GenerateOptions, RunSummary, format_summary, print_summary};
pub use rules::DispatchRules;
pub use stubs::StubFlavor;
