use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::summary::MaskSummary;

/// What produced an output table.
pub struct Payload {
    pub params: Value,
    pub mask: Option<MaskSummary>,
    pub inputs: Vec<String>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            mask: None,
            inputs: Vec::new(),
        }
    }

    pub fn with_mask(mut self, mask: MaskSummary) -> Self {
        self.inputs.push(mask.filename.clone());
        self.mask = Some(mask);
        self
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.inputs.push(input.into());
        self
    }
}

/// Write `<artifact>.provenance.json` with the code revision, library
/// version, callsite, mask summary, inputs, params, and outputs.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let sidecar = sidecar_path(artifact);
    if let Some(parent) = sidecar.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "skymask_version": skymask::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "mask": payload.mask,
        "inputs": payload.inputs,
        "params": payload.params,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    tracing::debug!(path = %sidecar.display(), "wrote provenance sidecar");
    Ok(sidecar)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// `GIT_COMMIT` (build time, then run time), else `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    let from_build = option_env!("GIT_COMMIT").map(str::to_string);
    let from_env = std::env::var("GIT_COMMIT").ok();
    from_build
        .into_iter()
        .chain(from_env)
        .find(|rev| !rev.is_empty())
        .or_else(|| {
            let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            output
                .status
                .success()
                .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
