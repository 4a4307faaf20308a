//! Compiled contract artifacts (Hardhat JSON format).
//!
//! Deployment looks contracts up by name the way Hardhat does: a JSON
//! artifact somewhere under the project's `artifacts/` tree holding the ABI,
//! creation bytecode and link references for external libraries.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ethers::abi::Abi;
use ethers::types::Bytes;
use serde::Deserialize;

use crate::constants;
use crate::errors::DevNodeError;
use crate::types::Libraries;

/// A single placeholder region inside unlinked bytecode, as byte offsets
/// into the decoded bytecode.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LinkReference {
    pub start: usize,
    pub length: usize,
}

/// Compiled contract artifact as emitted by Hardhat.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// Contract name e.g. "Token"
    pub contract_name: String,
    /// Source file the contract was compiled from e.g. "contracts/Token.sol"
    #[serde(default)]
    pub source_name: String,
    /// Contract ABI
    pub abi: Abi,
    /// Hex-encoded creation bytecode, with `__$...$__` placeholders where
    /// external libraries still need to be linked
    pub bytecode: String,
    /// Placeholder regions per source file and library name
    #[serde(default)]
    pub link_references: BTreeMap<String, BTreeMap<String, Vec<LinkReference>>>,
}

impl ContractArtifact {
    /// Whether the creation bytecode references external libraries that must
    /// be linked before deployment.
    pub fn has_link_references(&self) -> bool {
        self.link_references.values().any(|libs| !libs.is_empty())
    }

    /// Resolve all link references against the given library addresses and
    /// return deployable bytecode.
    ///
    /// Libraries are looked up by fully qualified `source:Name` first, then
    /// by bare name. Each placeholder region must be exactly 20 bytes, the
    /// width of an address.
    pub fn linked_bytecode(&self, libraries: &Libraries) -> Result<Bytes, DevNodeError> {
        let mut bytecode = self
            .bytecode
            .strip_prefix("0x")
            .unwrap_or(&self.bytecode)
            .to_string();

        for (source, libs) in &self.link_references {
            for (lib_name, regions) in libs {
                let address = libraries
                    .get(&format!("{}:{}", source, lib_name))
                    .or_else(|| libraries.get(lib_name))
                    .ok_or_else(|| DevNodeError::MissingLibrary(lib_name.clone()))?;
                let encoded = hex::encode(address.as_bytes());

                for region in regions {
                    if region.length != 20 {
                        return Err(DevNodeError::InvalidBytecode(format!(
                            "link reference for {} is {} bytes, expected 20",
                            lib_name, region.length
                        )));
                    }
                    // offsets are byte offsets, the hex string uses two chars per byte
                    let lo = region.start * 2;
                    let hi = (region.start + region.length) * 2;
                    if hi > bytecode.len() {
                        return Err(DevNodeError::InvalidBytecode(format!(
                            "link reference for {} is out of bounds",
                            lib_name
                        )));
                    }
                    bytecode.replace_range(lo..hi, &encoded);
                }
            }
        }

        let raw = hex::decode(&bytecode).map_err(|e| DevNodeError::InvalidBytecode(e.to_string()))?;
        Ok(raw.into())
    }
}

/// Store of compiled contract artifacts rooted at an artifacts directory.
pub struct ArtifactStore {
    /// Root of the artifacts tree
    root: PathBuf,
}

impl ArtifactStore {
    /// Create artifact store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> ArtifactStore {
        ArtifactStore { root: root.into() }
    }

    /// Artifact store for the default Hardhat `artifacts/` directory.
    pub fn hardhat_default() -> ArtifactStore {
        Self::new(constants::DEFAULT_ARTIFACTS_DIR)
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the artifact for a contract by name.
    ///
    /// Searches the artifacts tree recursively for `{name}.json`, skipping
    /// Hardhat's `*.dbg.json` companion files.
    pub fn load(&self, name: &str) -> Result<ContractArtifact, DevNodeError> {
        let file_name = format!("{}.json", name);
        let path = find_artifact_file(&self.root, &file_name)
            .ok_or_else(|| DevNodeError::ArtifactNotFound(name.to_string()))?;
        let raw = fs::read_to_string(&path).map_err(|e| DevNodeError::ArtifactRead(e.to_string()))?;
        serde_json::from_str(&raw)
            .map_err(|e| DevNodeError::ArtifactParse(format!("{}: {}", path.display(), e)))
    }
}

/// Recursively search a directory for a file with the given name.
///
/// Unreadable directories are skipped rather than surfaced; a missing
/// artifact is reported by the caller.
fn find_artifact_file(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if let Some(found) = find_artifact_file(&path, file_name) {
                return Some(found);
            }
        } else if path.file_name().and_then(|n| n.to_str()) == Some(file_name) {
            return Some(path);
        }
    }
    None
}
