//! Pass configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Copy loop shapes the matcher may recognize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdiomSet {
    /// `dst[i] = src[i]`
    pub indexed: bool,
    /// `*(dst + i) = *(src + i)`
    pub deref_offset: bool,
}

impl Default for IdiomSet {
    fn default() -> Self {
        Self {
            indexed: true,
            deref_offset: true,
        }
    }
}

/// Memcpy lifting options
///
/// ```rust
/// use memcpy_lift::PassOptions;
///
/// let options = PassOptions::from_json(r#"{"copy_symbol": "__aeabi_memcpy"}"#).unwrap();
/// assert_eq!(options.copy_symbol, "__aeabi_memcpy");
/// assert_eq!(options.activity_name, "extension.memcpy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassOptions {
    /// Name of the bulk-copy primitive the rewritten call targets
    pub copy_symbol: String,
    /// Name the pass registers under in the analysis workflow
    pub activity_name: String,
    /// Workflow step the pass is inserted in front of
    pub insert_before: String,
    /// Enabled idioms
    pub idioms: IdiomSet,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            copy_symbol: "memcpy".to_string(),
            activity_name: "extension.memcpy".to_string(),
            insert_before: "core.function.commitAnalysisData".to_string(),
            idioms: IdiomSet::default(),
        }
    }
}

impl PassOptions {
    /// Parse options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let options: PassOptions = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid pass options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Reject options the pass cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.copy_symbol.trim().is_empty() {
            return Err(Error::config("copy_symbol must not be empty"));
        }
        if self.activity_name.trim().is_empty() {
            return Err(Error::config("activity_name must not be empty"));
        }
        if self.insert_before.trim().is_empty() {
            return Err(Error::config("insert_before must not be empty"));
        }
        Ok(())
    }
}
