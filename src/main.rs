mod app;
mod cart;
mod catalog;
mod help;
mod sidebar;
mod storefront;
mod theme;
use crate::app::App;
use crate::catalog::Catalog;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};
use tracing_subscriber::EnvFilter;

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        catalog: Option<PathBuf>,
        log: Option<PathBuf>,
        today: Option<Date>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut catalog = None;
        let mut log = None;
        let mut today = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("catalog") => {
                    catalog = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('l') | Arg::Long("log") => {
                    log = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("today") => {
                    let value = parser.value()?.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => today = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            catalog,
            log,
            today,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                catalog,
                log,
                today,
            } => {
                // Without --today, the date keeps following the clock
                let live_date = today.is_none();
                let today = match today {
                    Some(d) => d,
                    None => OffsetDateTime::now_local()
                        .context("failed to determine local date")?
                        .date(),
                };
                if let Some(path) = log {
                    init_logging(&path)?;
                }
                let catalog = load_catalog(catalog.as_deref())?;
                tracing::info!(services = catalog.len(), %today, "Starting up");
                let bookings = with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    let mut app = App::new(catalog, today);
                    if live_date {
                        app = app.with_live_date();
                    }
                    app.run(terminal)
                        .context("error running the interface")
                })?;
                for b in &bookings {
                    println!("{b}");
                }
                tracing::info!(bookings = bookings.len(), "Exiting");
                Ok(())
            }
            Command::Help => {
                println!("Usage: bookcart [OPTIONS]");
                println!();
                println!("Terminal storefront with a cart sidebar for booking salon appointments");
                println!();
                println!("Options:");
                println!("  -c, --catalog <FILE>  Read the services on offer from a JSON file");
                println!("  -l, --log <FILE>      Append log messages to the given file");
                println!("      --today <DATE>    Treat DATE (YYYY-MM-DD) as the current date");
                println!("  -h, --help            Display this help message and exit");
                println!("  -V, --version         Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog {}", path.display())),
        None => Ok(Catalog::default()),
    }
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialize logging")
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_args(args.iter().copied()))
    }

    #[test]
    fn test_no_args() {
        assert_eq!(
            parse(&[]).unwrap(),
            Command::Run {
                catalog: None,
                log: None,
                today: None,
            }
        );
    }

    #[test]
    fn test_all_options() {
        assert_eq!(
            parse(&[
                "--catalog",
                "servicios.json",
                "-l",
                "bookcart.log",
                "--today=2026-10-19"
            ])
            .unwrap(),
            Command::Run {
                catalog: Some(PathBuf::from("servicios.json")),
                log: Some(PathBuf::from("bookcart.log")),
                today: Some(date!(2026 - 10 - 19)),
            }
        );
    }

    #[test]
    fn test_help_wins() {
        assert_eq!(parse(&["--today", "2026-10-19", "-h"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_bad_date() {
        assert!(parse(&["--today", "2026-13-01"]).is_err());
        assert!(parse(&["--today"]).is_err());
    }

    #[test]
    fn test_catalog_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("servicios.json");
        std::fs::write(&path, "[]").unwrap();
        let e = load_catalog(Some(path.as_path())).unwrap_err();
        let msg = format!("{e:#}");
        assert!(msg.contains(&path.display().to_string()), "{msg}");
        assert!(msg.contains("does not contain any services"), "{msg}");
    }

    #[test]
    fn test_default_catalog_without_path() {
        assert_eq!(load_catalog(None).unwrap(), Catalog::default());
    }

    #[test]
    fn test_positional_rejected() {
        assert!(parse(&["2026-10-19"]).is_err());
    }
}
