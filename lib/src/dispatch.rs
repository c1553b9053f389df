use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::cache;
use crate::config::Config;
use crate::content::{load_page_template, load_post};
use crate::dict;
use crate::error::{Chainable, Result};
use crate::layout::Layout;
use crate::meta::MetaStore;
use crate::outcome::{Artifact, MediaType, Outcome};
use crate::templating::{Engine, EngineInit};
use crate::url::{self, canonical_url, encode_path, Kind, PostPath, RequestPath};
use crate::value::Dict;

/// Resolves requested paths to rendered, cached output.
#[derive(Debug)]
pub struct Snug {
    config: Arc<Config>,
    engine: Arc<dyn Engine>,
    meta: MetaStore,
}

impl Snug {
    /// Validates `config` and initializes the template engine `E` over the
    /// views directory.
    pub fn new<E: EngineInit>(config: Config) -> Result<Self> {
        config.validate()?;

        let globals = dict! {
            "name" => config.name.as_str(),
            "version" => env!("CARGO_PKG_VERSION"),
        };

        let engine = E::init(&config.views, globals)
            .chain(error!("failed to initialize template engine"))?;

        Ok(Snug::with_engine(config, Arc::new(engine)))
    }

    pub fn with_engine(config: Config, engine: Arc<dyn Engine>) -> Self {
        Snug {
            meta: MetaStore::new(&config.posts),
            config: Arc::new(config),
            engine,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves `path` to exactly one outcome. Failures are logged and
    /// reported by status only.
    #[instrument(skip(self))]
    pub fn handle(&self, path: &str) -> Outcome {
        match self.resolve(path) {
            Ok(outcome) => {
                info!(status = outcome.status_code(), "resolved");
                outcome
            }
            Err(e) => {
                let status = e.status();
                warn!(status = status.code(), "request failed:\n{e}");
                Outcome::error(status)
            }
        }
    }

    /// Resolves a raw, possibly percent-encoded request path.
    pub fn resolve(&self, path: &str) -> Result<Outcome> {
        let decoded = url::decode(path)?;
        let path = RequestPath::parse(&decoded)?;
        match path.kind(&self.config) {
            Some(Kind::Asset) => self.handle_asset(path),
            Some(Kind::Page) if self.is_static_page(path) => self.handle_static_page(path),
            Some(Kind::Page) => self.handle_post(path),
            None => err!(BadRequest: "unsupported request extension", "path" => path),
        }
    }

    fn handle_asset(&self, path: RequestPath<'_>) -> Result<Outcome> {
        let ext = &self.config.stylesheet_extension;
        let source = self.config.assets.join(path.relative_with_extension(ext));
        if !source.is_file() {
            return err! {
                NotFound: "stylesheet source not found",
                "path" => path,
                "expected source" => source.display(),
            };
        }

        debug!(source = %source.display(), "compiling stylesheet");
        let css = compile_stylesheet(&source)?;
        self.cache(Artifact::new(self.output_path(path), css, MediaType::Css))
    }

    fn is_static_page(&self, path: RequestPath<'_>) -> bool {
        !path.is_reserved() && self.page_template(path).is_file()
    }

    fn page_template(&self, path: RequestPath<'_>) -> PathBuf {
        let ext = &self.config.template_extension;
        self.config.views.join(path.relative_with_extension(ext))
    }

    fn handle_static_page(&self, path: RequestPath<'_>) -> Result<Outcome> {
        let template = self.page_template(path);
        debug!(template = %template.display(), "rendering static page");

        let html = self.render_in_layout(&template, Dict::new())
            .chain_with(|| error!("failed to render page", "path" => path))?;

        self.cache(Artifact::new(self.output_path(path), html, MediaType::Html))
    }

    fn handle_post(&self, path: RequestPath<'_>) -> Result<Outcome> {
        let post = PostPath::parse(path)?;
        let meta = self.meta.get(post.id)
            .ok_or_else(|| error!(NotFound: "unknown post", "id" => post.id))?;

        let fragment = meta.fragment(post.lang)
            .ok_or_else(|| error! {
                NotFound: "post is not available in the requested language",
                "id" => post.id,
                "language" => post.lang,
            })?;

        let canonical = canonical_url(post.lang, fragment);
        if canonical != path.as_str() {
            debug!(%canonical, "redirecting to canonical post URL");
            return Ok(Outcome::redirect(encode_path(&canonical)));
        }

        let source = self.config.posts.join(fragment);
        if !source.is_file() {
            return err! {
                NotFound: "post source not found",
                "id" => post.id,
                "expected source" => source.display(),
            };
        }

        let record = load_post(&source)?;
        let template = self.config.views.join(format!(
            "{}.{}", self.config.post_template, self.config.template_extension
        ));

        let html = self.render_in_layout(&template, record.fields)
            .chain_with(|| error!("failed to render post", "path" => path))?;

        self.cache(Artifact::new(self.output_path(path), html, MediaType::Html))
    }

    /// Renders the template at `template` with `data`, then wraps the result
    /// in the layout its front matter selects. A front matter `title`
    /// replaces the one in `data`.
    fn render_in_layout(&self, template: &Path, mut data: Dict) -> Result<String> {
        let page = load_page_template(template)?;
        if let Some(title) = page.title().filter(|t| !t.is_empty()) {
            data.insert("title".into(), title.into());
        }

        let layout = Layout::resolve(&self.config, &page);
        let name = template.strip_prefix(&self.config.views).ok().and_then(Path::to_str);
        let body = self.engine.render_str(name, &page.body, &data)?;

        data.insert("body".into(), body.into());
        self.engine.render(&layout.name, &data).chain_with(|| error! {
            "failed to render layout",
            "layout" => layout.path.display(),
        })
    }

    fn output_path(&self, path: RequestPath<'_>) -> PathBuf {
        self.config.htdocs.join(path.relative())
    }

    fn cache(&self, artifact: Artifact) -> Result<Outcome> {
        cache::write_artifact(&artifact)?;
        Ok(Outcome::Rendered(artifact))
    }
}

#[cfg(feature = "sass")]
fn compile_stylesheet(source: &Path) -> Result<String> {
    use crate::value::{Grass, Mapper};

    Grass::default().map(source)
}

#[cfg(not(feature = "sass"))]
fn compile_stylesheet(source: &Path) -> Result<String> {
    err!("stylesheet compilation is not enabled", "source" => source.display())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tempfile::TempDir;

    use super::*;
    use crate::error::Status;
    use crate::templating::minijinja::MiniJinjaEngine;

    const POST: &str = "<!--( {\"date\": \"2014-03-14\"} )-->\n\
        # Lorem Ipsum\n\n\
        Dolor *sit* amet.\n";

    fn site() -> (TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(dir.path());

        let files: &[(&PathBuf, &str, &str)] = &[
            (&config.views, "_layout.jinja", "<html><title>{{ title }}</title>{{ body }}</html>"),
            (&config.views, "_layout_bare.jinja", "{{ body }}"),
            (&config.views, "about.jinja", "+++\ntitle = \"About\"\n+++\n<h1>{{ title }}</h1>"),
            (&config.views, "bare.jinja", "+++\nlayout = \"bare\"\n+++\n<p>bare</p>"),
            (&config.views, "plain.jinja", "<p>{{ G.name }}</p>"),
            (&config.views, "docs/index.jinja", "<p>docs</p>"),
            (&config.views, "_secret.jinja", "<p>secret</p>"),
            (&config.views, "_post.jinja", "<article><h1>{{ title }}</h1>{{ content }}<time>{{ date }}</time></article>"),
            (&config.posts, "31415.json", r#"{"en": "31415-EN-lorem-ipsum.md", "de": "31415-DE-lorem-ipsum.md"}"#),
            (&config.posts, "31415-EN-lorem-ipsum.md", POST),
            (&config.posts, "314.json", r#"{"en": "314-EN-pi-daysxx"}"#),
            (&config.posts, "314-EN-pi-daysxx", POST),
            (&config.posts, "7.json", r#"{"fr": "7-FR-été.md"}"#),
            (&config.posts, "7-FR-été.md", POST),
            (&config.posts, "27.json", r#"{"en": "27-EN-broken.md"}"#),
            (&config.posts, "27-EN-broken.md", "<!--( {not json} )-->\n# Broken\n"),
            (&config.posts, "28.json", "{ \"en\": "),
            (&config.assets, "style.scss", "$c: #333;\nbody { color: $c; }\n"),
        ];

        for (dir, name, contents) in files {
            let path = dir.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        (dir, config)
    }

    fn snug(config: &Config) -> Snug {
        Snug::new::<MiniJinjaEngine>(config.clone()).unwrap()
    }

    fn rendered(outcome: Outcome) -> Artifact {
        match outcome {
            Outcome::Rendered(artifact) => artifact,
            other => panic!("expected rendered output, got {other:?}"),
        }
    }

    fn status(outcome: Outcome) -> Status {
        match outcome {
            Outcome::Error { status, .. } => status,
            other => panic!("expected an error, got {other:?}"),
        }
    }

    #[test]
    fn static_pages_render_in_layout_and_cache() {
        let (_dir, config) = site();
        let artifact = rendered(snug(&config).handle("/about.html"));

        assert_eq!(&*artifact.body, "<html><title>About</title><h1>About</h1></html>");
        assert_eq!(artifact.media_type, MediaType::Html);
        assert_eq!(artifact.path, config.htdocs.join("about.html"));
        assert_eq!(fs::read_to_string(&artifact.path).unwrap(), &*artifact.body);
    }

    #[test]
    fn static_pages_see_globals_and_nest() {
        let (_dir, config) = site();
        let snug = snug(&config);

        let plain = rendered(snug.handle("/plain.html"));
        assert_eq!(&*plain.body, "<html><title></title><p>snug</p></html>");

        let docs = rendered(snug.handle("/docs/index.html"));
        assert_eq!(docs.path, config.htdocs.join("docs").join("index.html"));
        assert!(docs.path.is_file());
    }

    #[test]
    fn layout_overrides_apply() {
        let (_dir, config) = site();
        let artifact = rendered(snug(&config).handle("/bare.html"));
        assert_eq!(&*artifact.body, "<p>bare</p>");
    }

    #[test]
    fn canonical_posts_render_through_the_post_template() {
        let (_dir, config) = site();
        let artifact = rendered(snug(&config).handle("/en/31415-lorem-ipsum.html"));

        assert_eq!(
            &*artifact.body,
            "<html><title>Lorem Ipsum</title><article><h1>Lorem Ipsum</h1>\
             <p>Dolor <em>sit</em> amet.</p>\n<time>2014-03-14</time></article></html>"
        );

        let cached = config.htdocs.join("en").join("31415-lorem-ipsum.html");
        assert_eq!(artifact.path, cached);
        assert_eq!(fs::read_to_string(cached).unwrap(), &*artifact.body);
    }

    #[test]
    fn any_stored_suffix_yields_the_same_canonical_url() {
        let (_dir, config) = site();
        let artifact = rendered(snug(&config).handle("/en/314-pi-days.html"));
        assert_eq!(artifact.path, config.htdocs.join("en").join("314-pi-days.html"));
    }

    #[test]
    fn non_canonical_posts_redirect_without_rendering() {
        let (_dir, config) = site();
        let outcome = snug(&config).handle("/en/31415-wrong-slug.html");

        assert_eq!(outcome, Outcome::redirect("/en/31415-lorem-ipsum.html"));
        assert_eq!(outcome.status_code(), 301);
        assert!(!config.htdocs.join("en").exists());
    }

    #[test]
    fn non_ascii_slugs_redirect_to_encoded_locations() {
        let (_dir, config) = site();
        let snug = snug(&config);

        let encoded = "/fr/7-%C3%A9t%C3%A9.html";
        assert_eq!(snug.handle("/fr/7-autre.html"), Outcome::redirect(encoded));

        let artifact = rendered(snug.handle(encoded));
        assert_eq!(artifact.path, config.htdocs.join("fr").join("7-été.html"));
        assert_eq!(rendered(snug.handle("/fr/7-été.html")), artifact);
    }

    #[test]
    fn redirects_short_circuit_before_the_engine() {
        #[derive(Debug, Default)]
        struct Counting(AtomicUsize);

        impl Engine for Counting {
            fn render(&self, _: &str, _: &Dict) -> Result<String> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(String::new())
            }

            fn render_str(&self, _: Option<&str>, _: &str, _: &Dict) -> Result<String> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(String::new())
            }
        }

        let (_dir, config) = site();
        let engine = Arc::new(Counting::default());
        let snug = Snug::with_engine(config, engine.clone());

        assert!(matches!(snug.handle("/en/31415-other.html"), Outcome::Redirect { .. }));
        assert_eq!(engine.0.load(Ordering::SeqCst), 0);

        rendered(snug.handle("/en/31415-lorem-ipsum.html"));
        assert_eq!(engine.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unknown_posts_and_languages_are_not_found() {
        let (_dir, config) = site();
        let snug = snug(&config);

        for path in [
            "/en/99-missing.html",
            "/fr/31415-lorem-ipsum.html",
            "/de/31415-lorem-ipsum.html",
            "/en/28-corrupt.html",
            "/nothing.html",
            "/_secret.html",
            "/a/b/c.html",
            "/docs/missing.html",
            "/blog/index.html",
            "/en/31415.html",
        ] {
            assert_eq!(status(snug.handle(path)), Status::NotFound, "{path}");
        }
    }

    #[test]
    fn malformed_requests_are_bad_requests() {
        let (_dir, config) = site();
        let snug = snug(&config);

        for path in ["/en/lorem-ipsum.html", "/about.php", "/README", "about.html", "/../etc/passwd.html"] {
            assert_eq!(status(snug.handle(path)), Status::BadRequest, "{path}");
        }
    }

    #[test]
    fn malformed_post_sources_fail_loudly() {
        let (_dir, config) = site();
        let outcome = snug(&config).handle("/en/27-broken.html");
        assert_eq!(outcome.status_code(), 500);
        assert!(!config.htdocs.join("en").join("27-broken.html").exists());
    }

    #[test]
    fn assets_compile_and_cache_at_the_requested_path() {
        let (_dir, config) = site();
        let snug = snug(&config);

        let artifact = rendered(snug.handle("/style.css"));
        assert_eq!(artifact.media_type, MediaType::Css);
        assert!(artifact.body.contains("color: #333"));
        assert_eq!(fs::read_to_string(config.htdocs.join("style.css")).unwrap(), &*artifact.body);

        let upper = rendered(snug.handle("/style.CSS"));
        assert_eq!(upper.path, config.htdocs.join("style.CSS"));
        assert_eq!(upper.body, artifact.body);

        assert_eq!(status(snug.handle("/missing.css")), Status::NotFound);
    }

    #[test]
    fn repeated_requests_produce_identical_artifacts() {
        let (_dir, config) = site();
        let snug = snug(&config);

        for path in ["/about.html", "/en/31415-lorem-ipsum.html", "/style.css"] {
            let first = rendered(snug.handle(path));
            let bytes = fs::read(&first.path).unwrap();
            let second = rendered(snug.handle(path));
            assert_eq!(first, second);
            assert_eq!(bytes, fs::read(&second.path).unwrap());
        }
    }

    static_assertions::assert_impl_all!(Snug: Send, Sync);
}
