use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::codegen::diff::EndpointDiff;
use crate::models::EndpointRecord;

/// Which client the stubs are written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StubFlavor {
    #[default]
    Sync,
    Async,
}

impl fmt::Display for StubFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StubFlavor::Sync => f.write_str("sync"),
            StubFlavor::Async => f.write_str("async"),
        }
    }
}

impl FromStr for StubFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sync" => Ok(StubFlavor::Sync),
            "async" => Ok(StubFlavor::Async),
            other => Err(format!("unknown stub flavor: {other}")),
        }
    }
}

pub fn render_stub(record: &EndpointRecord, flavor: StubFlavor) -> String {
    match flavor {
        StubFlavor::Sync => format!(
            "    def {name}(self, **params):\n        \"\"\"\n        {endpoint}\n        \"\"\"\n        return {call}\n",
            name = record.method_name,
            endpoint = record.endpoint,
            call = record.call,
        ),
        // The async client reuses the docstrings of the sync one.
        StubFlavor::Async => format!(
            "    async def {name}(self, **params):\n        return await {call}\n\n    {name}.__doc__ = Client.{name}.__doc__\n",
            name = record.method_name,
            call = record.call,
        ),
    }
}

/// Full output artifact: a header per product line followed by its stubs.
pub fn render_missing_methods(diff: &EndpointDiff, flavor: StubFlavor) -> String {
    let mut out = String::new();
    for (line, line_diff) in &diff.lines {
        out.push_str(&format!("# {} ====================\n\n", line));
        for record in &line_diff.missing_in_implementation {
            out.push_str(&render_stub(record, flavor));
            out.push('\n');
        }
    }
    out
}

fn reference_marker(record: &EndpointRecord) -> String {
    format!("**{}", record.endpoint)
}

pub fn render_reference_entry(record: &EndpointRecord) -> String {
    format!(
        "\t- **{}**\n    ```python\n    client.{}(**params)\n    ```\n\n",
        record.endpoint, record.method_name
    )
}

/// Reference entries for records not already listed in `existing`.
pub fn new_reference_entries<'a>(
    existing: &str,
    records: impl IntoIterator<Item = &'a EndpointRecord>,
) -> (String, usize) {
    let mut appended = String::new();
    let mut added = 0;
    for record in records {
        let marker = reference_marker(record);
        if existing.contains(&marker) || appended.contains(&marker) {
            continue;
        }
        appended.push_str(&render_reference_entry(record));
        added += 1;
    }
    (appended, added)
}
