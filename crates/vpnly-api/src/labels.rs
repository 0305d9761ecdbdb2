// Resource label endpoint

use tracing::debug;

use crate::client::ControlPlaneClient;
use crate::error::Error;
use crate::models::LabelResourceRequest;

/// Label key the control plane uses for human-readable names.
pub const NAME_LABEL: &str = "Name";

impl ControlPlaneClient {
    /// Attach (or overwrite) the `Name` label on any resource.
    ///
    /// `POST /v1/labels`
    pub async fn label_resource(&self, resource_id: &str, name: &str) -> Result<(), Error> {
        let url = self.api_url(&["labels"])?;
        debug!(resource_id, "labelling resource");
        self.post_unit(
            url,
            &LabelResourceRequest {
                resource_id,
                key: NAME_LABEL,
                value: name,
            },
        )
        .await
    }
}
