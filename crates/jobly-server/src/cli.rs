use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Serve(ServeArgs),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// Explicit config file; falls back to `JOBLY_CONFIG`, then defaults.
    pub config: Option<PathBuf>,
    /// Overrides the configured database URL.
    pub database: Option<String>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1).map(|s| s.as_str());

    let mut config: Option<PathBuf> = None;
    let mut database: Option<String> = None;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--config=") => {
                config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            "--database" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--database requires a value");
                };
                database = Some(v.to_string());
            }
            _ if token.starts_with("--database=") => {
                database = Some(token.trim_start_matches("--database=").to_string());
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Serve(ServeArgs { config, database }))
}

pub fn print_help() {
    println!(
        "\
jobly-server - HTTP API for job postings

USAGE:
  jobly-server [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: $JOBLY_CONFIG, else built-in defaults)
  --database <URL>      Override the database URL
  -h, --help            Print help

ENVIRONMENT:
  DATABASE_URL, SECRET_KEY, PORT, JOBLY_BIND override the config file.
  RUST_LOG controls log filtering."
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("jobly-server")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn no_arguments_serves_with_defaults() {
        assert_eq!(
            parse_args(&args(&[])).unwrap(),
            Command::Serve(ServeArgs::default())
        );
    }

    #[test]
    fn parses_config_and_database_in_both_forms() {
        let cmd =
            parse_args(&args(&["--config", "jobly.toml", "--database=postgres:///x"])).unwrap();
        assert_eq!(
            cmd,
            Command::Serve(ServeArgs {
                config: Some(PathBuf::from("jobly.toml")),
                database: Some("postgres:///x".into()),
            })
        );

        let cmd = parse_args(&args(&["--config=a.toml"])).unwrap();
        assert_eq!(
            cmd,
            Command::Serve(ServeArgs {
                config: Some(PathBuf::from("a.toml")),
                database: None,
            })
        );
    }

    #[test]
    fn help_wins() {
        assert_eq!(parse_args(&args(&["--config", "x", "-h"])).unwrap(), Command::Help);
    }

    #[test]
    fn rejects_unknown_and_incomplete_arguments() {
        assert!(parse_args(&args(&["--port", "1"])).is_err());
        assert!(parse_args(&args(&["--config"])).is_err());
    }
}
