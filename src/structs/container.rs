use std::collections::BTreeMap;

use super::traits::Verify;
use super::{PortDef, Result, ResultExt};

/// A container in an app
///
/// Sidecars share the network namespace of the container they are attached to,
/// so their ports are published through the same service.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Container {
    /// Docker image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Ports to open
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<PortDef>,

    /// Sidecars by name
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub sidecars: BTreeMap<String, Container>,
}

impl Verify for Container {
    fn verify(&self) -> Result<()> {
        for p in &self.ports {
            p.verify()?;
        }
        for (name, sc) in &self.sidecars {
            if !sc.sidecars.is_empty() {
                bail!("Sidecar {} cannot have sidecars of its own", name);
            }
            sc.verify().chain_err(|| format!("sidecar {} does not validate", name))?;
        }
        Ok(())
    }
}
