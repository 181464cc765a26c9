use std::{collections::BTreeMap, env, path::PathBuf};

use dotenvy::dotenv;

use crate::{
    codegen::stubs::StubFlavor,
    error::{CodegenError, Result},
    models::ProductLine,
};

#[derive(Clone, Debug)]
pub struct CodegenConfig {
    pub client_file: PathBuf,
    pub output_file: PathBuf,
    /// `<line>_endpoints_list.txt` per product line.
    pub endpoint_lists: BTreeMap<ProductLine, PathBuf>,
    /// `<line>_docs.txt` per product line, read in regenerate mode.
    pub doc_files: BTreeMap<ProductLine, PathBuf>,
    pub flavor: StubFlavor,
}

impl CodegenConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let client_file = lookup("CODEGEN_CLIENT_FILE").unwrap_or_else(|| "./binance/client.py".to_string());
        let output_file =
            lookup("CODEGEN_OUTPUT_FILE").unwrap_or_else(|| "./utils/missing_endponts.txt".to_string());
        let utils_dir = lookup("CODEGEN_UTILS_DIR").unwrap_or_else(|| "./utils".to_string());

        let flavor = lookup("CODEGEN_FLAVOR")
            .unwrap_or_else(|| "sync".to_string())
            .parse::<StubFlavor>()
            .map_err(|err| CodegenError::Config(format!("invalid CODEGEN_FLAVOR: {err}")))?;

        if utils_dir.trim().is_empty() {
            return Err(CodegenError::Config("CODEGEN_UTILS_DIR cannot be empty".into()));
        }

        let mut config = Self {
            client_file: PathBuf::from(client_file),
            output_file: PathBuf::from(output_file),
            endpoint_lists: BTreeMap::new(),
            doc_files: BTreeMap::new(),
            flavor,
        };
        config.set_utils_dir(PathBuf::from(utils_dir));
        Ok(config)
    }

    /// Points every per-product-line file at `dir`.
    pub fn set_utils_dir(&mut self, dir: PathBuf) {
        self.endpoint_lists = ProductLine::ALL
            .into_iter()
            .map(|line| (line, dir.join(format!("{line}_endpoints_list.txt"))))
            .collect();
        self.doc_files = ProductLine::ALL
            .into_iter()
            .map(|line| (line, dir.join(format!("{line}_docs.txt"))))
            .collect();
    }
}
