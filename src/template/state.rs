use std::path::Path;

use handlebars::Handlebars;

use crate::error::{self, Context};
use crate::config;

const TEMPLATE_EXT: &str = "hbs";

/// relative path of the file without its extension and always using "/",
/// e.g. "pages/login"
fn template_name(root: &Path, file: &Path) -> error::Result<String> {
    let relative = file.strip_prefix(root)
        .context(format!("template outside of template directory: \"{}\"", file.display()))?
        .with_extension("");

    let mut parts = Vec::new();

    for comp in relative.components() {
        let part = comp.as_os_str()
            .to_str()
            .context(format!("template path is not valid UTF-8: \"{}\"", file.display()))?;

        parts.push(part);
    }

    Ok(parts.join("/"))
}

/// registers every template under dir, returning how many were found
fn register_dir(registry: &mut Handlebars<'_>, root: &Path, dir: &Path) -> error::Result<usize> {
    let entries = std::fs::read_dir(dir)
        .context(format!("failed reading template directory: \"{}\"", dir.display()))?;
    let mut count = 0;

    for entry in entries {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let entry_path = entry.path();

        if file_type.is_dir() {
            count += register_dir(registry, root, &entry_path)?;
        } else if file_type.is_file() && entry_path.extension().map_or(false, |ext| ext == TEMPLATE_EXT) {
            let name = template_name(root, &entry_path)?;

            tracing::debug!(name = %name, path = %entry_path.display(), "template");

            registry.register_template_file(&name, &entry_path)?;

            count += 1;
        }
    }

    Ok(count)
}

#[derive(Debug)]
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn from_config(config: &config::Config) -> error::Result<Self> {
        Self::load(
            &config.settings.templates.directory,
            config.settings.templates.dev_mode
        )
    }

    pub fn load(directory: &Path, dev_mode: bool) -> error::Result<Self> {
        tracing::debug!("creating Templates state");

        let mut registry = Handlebars::new();
        registry.set_dev_mode(dev_mode);
        registry.set_strict_mode(false);

        let count = register_dir(&mut registry, directory, directory)?;

        tracing::debug!("loaded {count} templates");

        Ok(Templates {
            registry,
        })
    }

    pub fn has_template<N>(&self, name: N) -> bool
    where
        N: AsRef<str>
    {
        self.registry.has_template(name.as_ref())
    }

    pub fn render<N, T>(&self, name: N, data: &T) -> Result<String, handlebars::RenderError>
    where
        N: AsRef<str>,
        T: serde::Serialize,
    {
        self.registry.render(name.as_ref(), data)
    }
}
