use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use snug::config::CONFIG_FILE;
use snug::templating::minijinja::MiniJinjaEngine;
use snug::{Config, Snug};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod response;

/// Environment variable holding the log filter, e.g. `SNUG_LOG=debug`.
pub const LOG_ENV: &str = "SNUG_LOG";

/// Environment variables consulted, in order, when no path argument is given.
pub const PATH_ENV: [&str; 2] = ["SCRIPT_URL", "PATH_INFO"];

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Renders, caches and returns one requested path as a CGI response.
        cmd snug {
            /// Configuration file. Defaults to `snug.toml` in the site root.
            optional -c, --config config: PathBuf
            /// Site root when no configuration file is given.
            optional -r, --root root: PathBuf
            /// The requested path, e.g. `/en/31415-lorem-ipsum.html`.
            optional path: String
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let flags = flags::Snug::from_env_or_exit();
    let snug = match load(&flags) {
        Ok(snug) => snug,
        Err(e) => {
            error!("failed to start:\n{e}");
            return ExitCode::FAILURE;
        }
    };

    let Some(path) = requested_path(flags.path) else {
        error!("no request path: pass one as an argument or set {}", PATH_ENV.join(" or "));
        return ExitCode::FAILURE;
    };

    let outcome = snug.handle(&path);
    if let Err(e) = response::write(io::stdout().lock(), &outcome, &snug.config().name) {
        error!("failed to write response: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn load(flags: &flags::Snug) -> snug::Result<Snug> {
    let config = match (&flags.config, &flags.root) {
        (Some(file), _) => Config::read(file)?,
        (None, root) => {
            let root = match root {
                Some(root) => root.clone(),
                None => env::current_dir()?,
            };

            let file = root.join(CONFIG_FILE);
            if file.is_file() {
                Config::read(file)?
            } else {
                debug!(root = %root.display(), "no configuration file, using defaults");
                Config::new(root)
            }
        }
    };

    Snug::new::<MiniJinjaEngine>(config)
}

fn requested_path(arg: Option<String>) -> Option<String> {
    arg.or_else(|| PATH_ENV.iter().find_map(|var| env::var(var).ok()))
        .filter(|path| !path.is_empty())
}
