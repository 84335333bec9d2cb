//!
//! # pic21 Command-Line Interface
//!
//! Lists and builds the cells of the [pic21] catalog,
//! writing each built cell's hierarchy as JSON, YAML, or TOML.
//!

use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;

use log::info;

// Use our own crate, by name, not `crate::` or `super::`.
use pic21::{Catalog, Paths};
use pic21raw::{EngineConfig, Library, SerdeFile, SerializationFormat};

// => The doc-comment on `ProgramOptions` here is displayed by the `clap`-generated help docs =>

/// # pic21 Photonic Cell Catalog
#[derive(Parser)]
#[command(version, about)]
pub struct ProgramOptions {
    #[command(subcommand)]
    pub command: Command,
    /// Verbose Output Mode
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List cell names
    List {
        /// Only list cells with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Build a cell, and write its hierarchy to file
    Build {
        /// Cell name
        cell: String,
        /// Cell parameters, as a JSON map
        #[arg(short, long)]
        params: Option<String>,
        /// Engine configuration file. Format is inferred from its extension.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output file. Defaults to `{cell}.{fmt}` in the current directory.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Output format. One of ("json", "yaml", "toml")
        #[arg(short, long, default_value = "json")]
        fmt: String,
    },
    /// Write the default engine configuration
    Config {
        /// Output file. Defaults to `pic21.{fmt}` in the current directory.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Output format. One of ("json", "yaml", "toml")
        #[arg(short, long, default_value = "yaml")]
        fmt: String,
    },
}

/// The main entry point.
/// All logic is offloaded to `_main` for sake of testing.
fn main() -> Result<(), Box<dyn Error>> {
    let options = ProgramOptions::parse();
    let level = if options.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    _main(&options)
}

/// All the real logic, with `ProgramOptions` argument for sake of testing
fn _main(options: &ProgramOptions) -> Result<(), Box<dyn Error>> {
    let paths = Paths::new()?;
    match &options.command {
        Command::List { tag } => {
            let catalog = Catalog::new()?;
            let names = match tag {
                Some(tag) => catalog.tagged(tag),
                None => catalog.names(),
            };
            for name in names {
                println!("{}", name);
            }
        }
        Command::Build {
            cell,
            params,
            config,
            out,
            fmt,
        } => {
            let config = match config {
                Some(path) => EngineConfig::open(path, SerializationFormat::from_path(path)?)?,
                None => pic21::config(),
            };
            let params = match params {
                Some(s) => serde_json::from_str(s)?,
                None => serde_json::Value::Null,
            };
            let fmt: SerializationFormat = fmt.parse()?;
            let ctx = pic21::ctx_with(config)?;
            let comp = Catalog::new()?.build(&ctx, cell, params)?;
            let lib = Library::from_top(cell.clone(), &comp)?;
            let out = match out {
                Some(p) => p.clone(),
                None => paths.cwd.join(format!("{}.{}", cell, fmt.ext())),
            };
            lib.save(fmt, &out)?;
            info!("Wrote `{}` ({} cells) to {:?}", comp.name, lib.cells.len(), out);
        }
        Command::Config { out, fmt } => {
            let fmt: SerializationFormat = fmt.parse()?;
            let out = match out {
                Some(p) => p.clone(),
                None => paths.cwd.join(format!("pic21.{}", fmt.ext())),
            };
            pic21::config().save(fmt, &out)?;
            info!("Wrote engine configuration to {:?}", out);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_to_file() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("spiral.yaml");
        let options = ProgramOptions {
            command: Command::Build {
                cell: "spiral_delay".into(),
                params: Some(r#"{"length": 300}"#.into()),
                config: None,
                out: Some(out.clone()),
                fmt: "yaml".into(),
            },
            verbose: false,
        };
        _main(&options)?;

        let lib: Library = SerializationFormat::Yaml.open(&out)?;
        assert_eq!(lib.top, "spiral_delay_length300");
        let top = lib.cell(&lib.top).ok_or("missing top cell")?;
        assert_eq!(top.tags, vec!["spirals".to_string()]);
        Ok(())
    }

    #[test]
    fn build_toml() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("mzi.toml");
        let options = ProgramOptions {
            command: Command::Build {
                cell: "mzi_heater_python".into(),
                params: None,
                config: None,
                out: Some(out.clone()),
                fmt: "toml".into(),
            },
            verbose: false,
        };
        _main(&options)?;

        let lib: Library = SerializationFormat::Toml.open(&out)?;
        assert_eq!(lib.top, "mzi_heater_python");
        let ctx = pic21::ctx()?;
        let comp = Catalog::new()?.build(&ctx, "mzi_heater_python", serde_json::Value::Null)?;
        assert_eq!(lib, Library::from_top("mzi_heater_python", &comp)?);
        Ok(())
    }

    #[test]
    fn config_roundtrip() -> Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let out = dir.path().join("pic21.toml");
        let options = ProgramOptions {
            command: Command::Config {
                out: Some(out.clone()),
                fmt: "toml".into(),
            },
            verbose: false,
        };
        _main(&options)?;
        let config = EngineConfig::open(&out, SerializationFormat::Toml)?;
        assert_eq!(config, pic21::config());
        Ok(())
    }

    #[test]
    fn unknown_cell() {
        let options = ProgramOptions {
            command: Command::Build {
                cell: "nope".into(),
                params: None,
                config: None,
                out: None,
                fmt: "json".into(),
            },
            verbose: false,
        };
        assert!(_main(&options).is_err());
    }
}
