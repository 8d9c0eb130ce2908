use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Render,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Render(RenderArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Form,
}

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub config: PathBuf,
    /// `--config` was passed; a missing file is then an error.
    pub config_explicit: bool,
    pub request: PathBuf,
    pub output: OutputFormat,
    pub compact: bool,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "render" => parse_render(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_render<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from("n1ql.toml");
    let mut config_explicit = false;
    let mut request: Option<PathBuf> = None;
    let mut output = OutputFormat::Json;
    let mut compact = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Render)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
                config_explicit = true;
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
                config_explicit = true;
            }
            "--form" => output = OutputFormat::Form,
            "--compact" => compact = true,
            _ if token.starts_with('-') => anyhow::bail!("unknown flag: {token}"),
            _ => {
                if request.is_some() {
                    anyhow::bail!("unexpected argument: {token}");
                }
                request = Some(PathBuf::from(token));
            }
        }
    }

    let Some(request) = request else {
        anyhow::bail!("render requires a request file (see `n1ql render --help`)");
    };

    Ok(Command::Render(RenderArgs {
        config,
        config_explicit,
        request,
        output,
        compact,
    }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
n1ql - render N1QL query requests into their wire payload

USAGE:
  n1ql <COMMAND> [OPTIONS]

COMMANDS:
  render        Build a request from a TOML file and print its payload

Run `n1ql <command> --help` for more."
            );
        }
        HelpTopic::Render => {
            println!(
                "\
n1ql render - print the payload for a request file

USAGE:
  n1ql render <REQUEST.toml> [OPTIONS]

OPTIONS:
  --config <PATH>   Defaults file (default: n1ql.toml, skipped if absent)
  --form            Print the legacy form-urlencoded string instead of JSON
  --compact         Print JSON on a single line
  -h, --help        Show this help

Set RUST_LOG=n1ql.request=debug to see request-building events."
            );
        }
    }
}
