// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates pullman.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ImageRef;

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, image: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let image = image.map(ImageRef::parse);
    let yaml = generate_template_yaml(image.as_ref());
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(image: Option<&ImageRef>) -> String {
    let image_line = match image {
        Some(image) => format!("image: {image}"),
        None => "image: ghcr.io/example/my-image:v1".to_string(),
    };
    format!(
        r#"# Container engine binary. Auto-detected (podman, then docker) when omitted.
# engine: podman

{image_line}

pull:
  # When to re-fetch the image: always, missing, never, or tag.
  # `tag` pulls when the image is missing locally or its tag is `latest`.
  policy: tag

  # Extra arguments appended to the pull command, each in shell syntax.
  # arguments:
  #   - "--tls-verify false"
"#
    )
}
