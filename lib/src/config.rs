use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Chainable, Result};
use crate::value::{Format, Toml};

/// Name of the configuration file looked up by front ends.
pub const CONFIG_FILE: &str = "snug.toml";

/// Where sources live, where output goes, and which requests are served.
///
/// Relative source directories resolve against `htdocs`; a relative `htdocs`
/// read from a file resolves against the file's directory. Extensions are
/// compared case-insensitively.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Output root. Cache artifacts mirror public URLs below it.
    pub htdocs: PathBuf,
    /// Stylesheet sources.
    pub assets: PathBuf,
    /// Post descriptors (`<id>.json`) and post sources.
    pub posts: PathBuf,
    /// Page templates, layouts and the post template.
    pub views: PathBuf,
    /// Installation label, sent as `X-Powered-By`.
    pub name: String,
    pub asset_extensions: Vec<String>,
    pub page_extensions: Vec<String>,
    /// Stem of the default layout; overrides live at `<stem>_<name>`.
    pub default_layout: String,
    /// Stem of the template posts render through.
    pub post_template: String,
    pub template_extension: String,
    pub stylesheet_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            htdocs: PathBuf::from("."),
            assets: PathBuf::from("_assets"),
            posts: PathBuf::from("_posts"),
            views: PathBuf::from("_views"),
            name: "snug".into(),
            asset_extensions: vec!["css".into()],
            page_extensions: vec!["html".into()],
            default_layout: "_layout".into(),
            post_template: "_post".into(),
            template_extension: "jinja".into(),
            stylesheet_extension: "scss".into(),
        }
    }
}

impl Config {
    /// The default configuration rooted at `htdocs`.
    pub fn new<P: AsRef<Path>>(htdocs: P) -> Self {
        let mut config = Config { htdocs: htdocs.as_ref().to_path_buf(), ..Config::default() };
        config.resolve_dirs();
        config
    }

    /// Reads a TOML configuration file. Every key is optional.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config: Config = Toml::read(path).chain_with(|| error! {
            "failed to read configuration",
            "file path" => path.display(),
        })?;

        if config.htdocs.is_relative() {
            let base = path.parent().unwrap_or(Path::new("."));
            config.htdocs = base.join(&config.htdocs);
        }

        config.resolve_dirs();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (key, set) in [
            ("asset_extensions", &self.asset_extensions),
            ("page_extensions", &self.page_extensions),
        ] {
            if set.is_empty() || set.iter().any(|ext| ext.is_empty()) {
                return err!("extension set is empty or has an empty entry", "key" => key);
            }
        }

        let overlap = self.asset_extensions.iter()
            .find(|ext| self.is_page_extension(ext));

        if let Some(ext) = overlap {
            return err! {
                "extension configured as both asset and page",
                "extension" => ext,
            };
        }

        for (key, ext) in [
            ("template_extension", &self.template_extension),
            ("stylesheet_extension", &self.stylesheet_extension),
        ] {
            if ext.is_empty() || ext.contains(['.', '/', '\\']) {
                return err!("invalid extension", key => ext);
            }
        }

        Ok(())
    }

    pub fn is_asset_extension(&self, ext: &str) -> bool {
        self.asset_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    pub fn is_page_extension(&self, ext: &str) -> bool {
        self.page_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    fn resolve_dirs(&mut self) {
        for dir in [&mut self.assets, &mut self.posts, &mut self.views] {
            if dir.is_relative() {
                *dir = self.htdocs.join(&*dir);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn defaults_resolve_under_htdocs() {
        let config = Config::new("/srv/www");
        assert_eq!(config.assets, Path::new("/srv/www/_assets"));
        assert_eq!(config.posts, Path::new("/srv/www/_posts"));
        assert_eq!(config.views, Path::new("/srv/www/_views"));
        assert!(config.is_asset_extension("CSS"));
        assert!(config.is_page_extension("html"));
        assert!(!config.is_page_extension("css"));
        config.validate().unwrap();
    }

    #[test]
    fn reads_partial_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(CONFIG_FILE);
        fs::write(&file, "htdocs = \"public\"\nviews = \"/opt/views\"\nname = \"blog\"\n").unwrap();

        let config = Config::read(&file).unwrap();
        assert_eq!(config.htdocs, dir.path().join("public"));
        assert_eq!(config.posts, dir.path().join("public").join("_posts"));
        assert_eq!(config.views, Path::new("/opt/views"));
        assert_eq!(config.name, "blog");
        assert_eq!(config.template_extension, "jinja");
    }

    #[test]
    fn rejects_overlapping_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(CONFIG_FILE);
        fs::write(&file, "asset_extensions = [\"css\", \"HTML\"]\n").unwrap();
        assert!(Config::read(&file).is_err());
    }

    #[test]
    fn rejects_empty_extension_sets() {
        for settings in ["asset_extensions = []\n", "page_extensions = []\n", "page_extensions = [\"\"]\n"] {
            let dir = tempfile::tempdir().unwrap();
            let file = dir.path().join(CONFIG_FILE);
            fs::write(&file, settings).unwrap();
            assert!(Config::read(&file).is_err(), "{settings:?}");
        }

        assert!(Config::new("/srv").validate().is_ok());
    }

    #[test]
    fn rejects_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(CONFIG_FILE);
        fs::write(&file, "name = [").unwrap();
        assert!(Config::read(&file).is_err());
    }
}
