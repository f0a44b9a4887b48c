mod debug_report;

use mekorot::address::hebrew::is_hebrew;
use mekorot::{Lang, Library, LinkedRef, Linker, Options, RawRef, ResolutionThoroughness};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

const DEBUG_ENV: &str = "MEKOROT_DEBUG";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let level = if config.debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt().with_max_level(level).with_writer(io::stderr).init();

    if let Err(err) = run(&config) {
        eprintln!("{err}");
        std::process::exit(err.exit_code);
    }
}

struct CliError {
    message: String,
    exit_code: i32,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

fn usage(message: impl std::fmt::Display) -> CliError {
    CliError { message: format!("error: {message}"), exit_code: 2 }
}

fn internal(message: impl std::fmt::Display) -> CliError {
    CliError { message: format!("error: {message}"), exit_code: 1 }
}

fn run(config: &CliConfig) -> Result<(), CliError> {
    let library = match &config.library {
        Some(path) => Arc::new(Library::load(path).map_err(internal)?),
        None => Library::sample(),
    };
    let lang = config.lang.unwrap_or(if is_hebrew(&config.input) { Lang::He } else { Lang::En });
    let raw_ref = RawRef::from_notation(lang, config.input.trim()).map_err(usage)?;
    let context_ref = config.context.as_deref().map(|c| library.parse_ref(c)).transpose().map_err(usage)?;

    let options = Options { thoroughness: config.thoroughness, ..Options::default() };
    let linker = Linker::new(library, options);
    let run = linker
        .resolve_verbose(lang, context_ref.as_ref(), &raw_ref, &linker.new_ibid_history())
        .map_err(usage)?;

    if config.json {
        let linked: Vec<LinkedRef> = run.resolutions.iter().filter_map(LinkedRef::from_resolution).collect();
        let out = serde_json::to_string_pretty(&linked).map_err(internal)?;
        println!("{out}");
    } else {
        debug_report::print_run(&raw_ref, context_ref.as_ref(), &run, config.color);
    }
    Ok(())
}

struct CliConfig {
    input: String,
    lang: Option<Lang>,
    context: Option<String>,
    library: Option<PathBuf>,
    thoroughness: ResolutionThoroughness,
    color: bool,
    debug: bool,
    json: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut lang = None;
    let mut context = None;
    let mut library = None;
    let mut thoroughness = ResolutionThoroughness::Normal;
    let mut color = io::stdout().is_terminal();
    let mut debug = std::env::var_os(DEBUG_ENV).is_some_and(|v| v != "0");
    let mut json = false;
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| -> Result<String, String> {
            inline.clone().or_else(|| args.next()).ok_or_else(|| format!("error: {name} expects a value"))
        };

        match flag.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("mekorot {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--debug" => debug = true,
            "--json" => json = true,
            "--high" => thoroughness = ResolutionThoroughness::High,
            "--lang" | "-l" => {
                let v = value("--lang")?;
                lang = Some(v.parse::<Lang>().map_err(|e| format!("error: {e}"))?);
            }
            "--context" | "-c" => context = Some(value("--context")?),
            "--library" => library = Some(PathBuf::from(value("--library")?)),
            "--thoroughness" => {
                thoroughness = match value("--thoroughness")?.as_str() {
                    "normal" => ResolutionThoroughness::Normal,
                    "high" => ResolutionThoroughness::High,
                    other => return Err(format!("error: invalid --thoroughness '{other}' (expected normal or high)")),
                };
            }
            "--input" | "-i" => {
                let v = value("--input")?;
                set_input(v, &mut input)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    set_input(rest, &mut input)?;
                }
                break;
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                set_input(rest, &mut input)?;
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, lang, context, library, thoroughness, color, debug, json })
}

fn set_input(value: String, input: &mut Option<String>) -> Result<(), String> {
    if input.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *input = Some(value);
    Ok(())
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "mekorot {version}

Resolve a citation mention against a text library.

The mention is written in notation: each part opens with a sigil.
  @ named   # numbered   * dibur hamatchil   ^ range symbol
  & ibid    < relative   ~ non-contiguous separator
Text after '|' follows the mention (a DH continuation).

Usage:
  mekorot [OPTIONS] [--] <mention...>
  mekorot [OPTIONS] --input <mention>

Examples:
  mekorot '@רש\"י @פרק יום טוב @בביצה'
  mekorot --context 'Rashi on Berakhot 2a:1:1' \"@ותוס' #דכ\\\"ז ע\\\"ב\"
  mekorot --lang en '@Exodus #9:#6~,#5'

Options:
  -i, --input <mention>      Mention to resolve. If omitted, reads remaining args
                             or stdin when no args are provided.
  -l, --lang <he|en>         Language of the mention. Default: detected.
  -c, --context <ref>        Context ref the mention appears in (English normal form).
  --library <path>           Library JSON file. Default: the embedded sample library.
  --thoroughness <level>     normal or high. Default: normal.
  --high                     Same as --thoroughness high.
  --json                     Print resolutions as JSON.
  --debug                    Log engine traces to stderr (also {debug_env}=1).
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Internal error (library failed to load).
  2  Invalid arguments, notation or context ref.
",
        version = env!("CARGO_PKG_VERSION"),
        debug_env = DEBUG_ENV,
    )
}
