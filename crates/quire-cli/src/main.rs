use anyhow::Result;
use quire_config::Config;
use quire_engine::{CommandCollection, Model, SOFT_BREAK, Schema, SoftBreakCommand};
use std::{env, path::PathBuf, process};

struct Args {
    config_path: Option<PathBuf>,
    documents: Vec<String>,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let mut config_path = None;
    let mut documents = Vec::new();
    let mut rest = args.iter().skip(1);

    while let Some(arg) = rest.next() {
        if arg == "--config" {
            let path = PathBuf::from(rest.next()?);
            config_path = Some(Config::expand_path(&path).unwrap_or(path));
        } else {
            documents.push(arg.clone());
        }
    }

    if documents.is_empty() {
        return None;
    }
    Some(Args {
        config_path,
        documents,
    })
}

fn load_schema(config_path: Option<&PathBuf>) -> Result<Schema> {
    let config = match config_path {
        Some(path) => match Config::load_from_path(path)? {
            Some(config) => config,
            None => anyhow::bail!("Config file '{}' does not exist", path.display()),
        },
        None => Config::load()?.unwrap_or_else(|| {
            log::info!(
                "No config file at {}, using the default schema",
                Config::config_path().display()
            );
            Config::default()
        }),
    };
    Ok(config.schema())
}

/// Apply a soft break to one document and return the resulting notation
fn soft_break(commands: &mut CommandCollection, input: &str, schema: &Schema) -> Result<String> {
    let mut model = Model::from_notation(input, schema.clone())?;
    match commands.execute(SOFT_BREAK, &mut model)? {
        Some(patch) => log::info!(
            "{input}: {} operation(s), version {}",
            patch.operations.len(),
            patch.version
        ),
        None => log::info!("{input}: soft break is disabled"),
    }
    Ok(model.to_notation())
}

fn main() -> Result<()> {
    // Info by default, RUST_LOG takes precedence
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("quire-cli");

    let Some(parsed) = parse_args(&args) else {
        eprintln!("Usage: {program} [--config <path>] <document>...");
        eprintln!("Example: {program} '<paragraph>fo[]o</paragraph>'");
        process::exit(1);
    };

    let schema = match load_schema(parsed.config_path.as_ref()) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("Error: Failed to load config: {e}");
            process::exit(1);
        }
    };

    let mut commands = CommandCollection::new();
    commands.add(SoftBreakCommand::new());

    for document in &parsed.documents {
        match soft_break(&mut commands, document, &schema) {
            Ok(output) => println!("{output}"),
            Err(e) => {
                eprintln!("Error: '{document}': {e}");
                process::exit(1);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        std::iter::once("quire-cli")
            .chain(values.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args_with_config() {
        let parsed = parse_args(&args(&["--config", "/tmp/quire.toml", "<paragraph>[]</paragraph>"])).unwrap();

        assert_eq!(parsed.config_path, Some(PathBuf::from("/tmp/quire.toml")));
        assert_eq!(parsed.documents, vec!["<paragraph>[]</paragraph>".to_string()]);
    }

    #[test]
    fn test_parse_args_requires_a_document() {
        assert!(parse_args(&args(&[])).is_none());
        assert!(parse_args(&args(&["--config"])).is_none());
        assert!(parse_args(&args(&["--config", "/tmp/quire.toml"])).is_none());
    }

    #[test]
    fn test_soft_break_prints_notation() {
        let mut commands = CommandCollection::new();
        commands.add(SoftBreakCommand::new());

        let output = soft_break(&mut commands, "<paragraph>fo[]o</paragraph>", &Schema::default()).unwrap();

        assert_eq!(output, "<paragraph>fo<softBreak></softBreak>[]o</paragraph>");
    }

    #[test]
    fn test_soft_break_reports_notation_errors() {
        let mut commands = CommandCollection::new();
        commands.add(SoftBreakCommand::new());

        assert!(soft_break(&mut commands, "<paragraph>fo[]o", &Schema::default()).is_err());
    }
}
