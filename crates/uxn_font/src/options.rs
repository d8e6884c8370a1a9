use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::{FontPackError, Layout, ModChainSolver, OffsetUnit, Result};

/// Settings of one packing run, can be read from a TOML file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PackOptions {
    pub layout: Layout,
    /// Step between the `a` candidates of the mod chain search.
    pub coarseness: usize,
    /// Restrict the table width to powers of two.
    pub pow2_modulus: bool,
    pub parallel: bool,
    /// Label prefix of the generated data.
    pub label_prefix: String,
    pub offset_unit: OffsetUnit,
    pub output: PathBuf,
}

impl Default for PackOptions {
    fn default() -> Self {
        let solver = ModChainSolver::default();
        Self {
            layout: Layout::default(),
            coarseness: solver.coarseness,
            pow2_modulus: solver.pow2_modulus,
            parallel: solver.parallel,
            label_prefix: "font".to_string(),
            offset_unit: OffsetUnit::default(),
            output: PathBuf::from("font.tal"),
        }
    }
}

impl PackOptions {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| FontPackError::read_file(path, err.to_string()))?;
        Self::from_toml(&text).map_err(|err| match err {
            FontPackError::InvalidOptions { message, .. } => FontPackError::InvalidOptions {
                path: path.to_path_buf(),
                message,
            },
            err => err,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| FontPackError::InvalidOptions {
            path: PathBuf::new(),
            message: err.to_string(),
        })
    }

    pub fn solver(&self) -> ModChainSolver {
        ModChainSolver {
            pow2_modulus: self.pow2_modulus,
            coarseness: self.coarseness,
            parallel: self.parallel,
        }
    }
}
