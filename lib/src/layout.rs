use std::path::PathBuf;

use tracing::debug;

use crate::config::Config;
use crate::content::ContentRecord;

/// The layout wrapping one rendered body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Template name relative to the views directory.
    pub name: String,
    /// The layout's backing file.
    pub path: PathBuf,
}

impl Layout {
    /// The layout `content` asks for in its front matter if that layout
    /// exists, the default layout otherwise.
    pub fn resolve(config: &Config, content: &ContentRecord) -> Layout {
        if let Some(name) = content.layout() {
            if let Some(layout) = Layout::named(config, name).filter(|l| l.path.is_file()) {
                return layout;
            }

            debug!(layout = name, "layout override not found, using default");
        }

        Layout::default_for(config)
    }

    /// `<default>_<name>.<ext>`; `None` for names that are not a plain file
    /// name component.
    pub fn named(config: &Config, name: &str) -> Option<Layout> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }

        let name = format!("{}_{}.{}", config.default_layout, name, config.template_extension);
        Some(Layout { path: config.views.join(&name), name })
    }

    pub fn default_for(config: &Config) -> Layout {
        let name = format!("{}.{}", config.default_layout, config.template_extension);
        Layout { path: config.views.join(&name), name }
    }
}
