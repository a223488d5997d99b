use anyhow::{Context, Result};
use bat::PrettyPrinter;
use clap::Parser;
use cliclack::{input, spinner};
use console::style;
use strum::IntoEnumIterator;
use tracing_subscriber::EnvFilter;

use switchboard::mode::{Mode, ModeConfig, Toggles, DEFAULT_TEMPERATURE};
use switchboard::providers::catalog::GroqModel;
use switchboard::providers::configs::Settings;
use switchboard::session::{Reply, Session};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model label or id, e.g. "Llama 3.1 70B" or "gemma2-9b-it"
    #[arg(short, long, default_value = "Llama 3 8B", value_parser = parse_model)]
    model: GroqModel,

    /// Sampling temperature between 0 and 1
    #[arg(short, long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f64,

    /// Start with the email reply agent enabled
    #[arg(long)]
    email_reply: bool,

    /// Start with web search enabled (needs SERPAPI_API_KEY)
    #[arg(long)]
    web_search: bool,

    /// Start with the planet mass tool enabled
    #[arg(long)]
    planet_mass: bool,

    /// Start with the calculate tool enabled
    #[arg(long)]
    calculate: bool,

    /// Answer every message from a fresh conversation
    #[arg(long)]
    stateless: bool,

    /// Keep at most this many user/assistant messages in the history
    #[arg(long, value_parser = clap::value_parser!(u32).range(2..))]
    history_window: Option<u32>,

    /// Print the active system prompt before each reply
    #[arg(long)]
    show_prompt: bool,
}

fn parse_model(value: &str) -> Result<GroqModel, String> {
    value.parse::<GroqModel>().map_err(|e| e.to_string())
}

/// Mutable front-end state; a fresh `ModeConfig` is derived from it for every message
struct Controls {
    toggles: Toggles,
    model: GroqModel,
    temperature: f64,
    show_prompt: bool,
}

enum Command {
    Continue,
    Exit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Ok(path) = dotenv::dotenv() {
        tracing::info!("Loaded environment from {:?}", path);
    }

    let settings = Settings::from_env().context("Failed to read configuration")?;
    let mut session = Session::from_settings(&settings)
        .context("Failed to initialize providers")?
        .stateless(cli.stateless)
        .with_history_window(cli.history_window.map(|n| n as usize));

    let mut controls = Controls {
        toggles: Toggles {
            email_reply: cli.email_reply,
            web_search: cli.web_search,
            planet_mass: cli.planet_mass,
            calculate: cli.calculate,
        },
        model: cli.model,
        temperature: cli.temperature,
        show_prompt: cli.show_prompt,
    };
    // validate the starting temperature once, before the loop
    ModeConfig::resolve(&controls.toggles, controls.model, controls.temperature)?;

    if !session.has_completion() {
        println!(
            "{}",
            style("GROQ_API_KEY not found in environment variables!").red()
        );
    }
    if !session.has_search() {
        println!(
            "{}",
            style("SERPAPI_API_KEY not found, web search is unavailable.").yellow()
        );
    }

    println!(
        "switchboard {}",
        style("- type \"/help\" for commands, \"/exit\" to end the session").dim()
    );
    print_status(&controls);
    println!();

    loop {
        let config = ModeConfig::resolve(&controls.toggles, controls.model, controls.temperature)?;
        let field = config.mode.input_field();
        let mut prompt = input(field.label).placeholder("");
        if config.mode == Mode::EmailReply {
            prompt = prompt.multiline();
        }
        let message_text: String = prompt.interact()?;

        if let Some(command) = message_text.trim().strip_prefix('/') {
            match run_command(command, &mut controls, &mut session) {
                Command::Exit => break,
                Command::Continue => continue,
            }
        }

        if controls.show_prompt {
            if let Some(system_prompt) = config.system_prompt() {
                println!("{}", style("System Prompt").bold());
                println!("{}\n", style(system_prompt).dim());
            }
        }

        let spin = spinner();
        spin.start("awaiting reply");
        let result = session.handle(&config, &message_text);
        spin.stop("");

        match result {
            Ok(Reply::Text(text)) => render(&text),
            Ok(reply) => println!("{}", reply),
            Err(err) => println!("{}", style(err.to_string()).red()),
        }
        println!("\n");
    }
    Ok(())
}

fn run_command(command: &str, controls: &mut Controls, session: &mut Session) -> Command {
    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "exit" | "quit" => return Command::Exit,
        "email" => controls.toggles.email_reply = !controls.toggles.email_reply,
        "search" => controls.toggles.web_search = !controls.toggles.web_search,
        "planet" => controls.toggles.planet_mass = !controls.toggles.planet_mass,
        "calc" => controls.toggles.calculate = !controls.toggles.calculate,
        "prompt" => controls.show_prompt = !controls.show_prompt,
        "reset" => {
            session.reset();
            println!("{}", style("Conversation cleared.").dim());
        }
        "models" => {
            for model in GroqModel::iter() {
                println!("  {}", model);
            }
            return Command::Continue;
        }
        "model" => match argument.parse::<GroqModel>() {
            Ok(model) => controls.model = model,
            Err(err) => println!("{}", style(err.to_string()).red()),
        },
        "temp" => match argument.parse::<f64>() {
            Ok(value) if (0.0..=1.0).contains(&value) => controls.temperature = value,
            _ => println!(
                "{}",
                style("Temperature must be a number between 0 and 1").red()
            ),
        },
        _ => {
            print_help();
            return Command::Continue;
        }
    }
    print_status(controls);
    Command::Continue
}

fn print_status(controls: &Controls) {
    let mode = Mode::select(&controls.toggles);
    let flag = |on: bool| if on { "on" } else { "off" };
    println!(
        "{} {} | model {} | temperature {:.2}",
        style("mode:").dim(),
        style(mode.label()).bold(),
        controls.model,
        controls.temperature
    );
    println!(
        "{}",
        style(format!(
            "email {} | search {} | planet {} | calc {}",
            flag(controls.toggles.email_reply),
            flag(controls.toggles.web_search),
            flag(controls.toggles.planet_mass),
            flag(controls.toggles.calculate),
        ))
        .dim()
    );
}

fn print_help() {
    println!("/email /search /planet /calc   toggle a mode (email > search > planet > calc)");
    println!("/model <label|id>              switch model, /models lists them");
    println!("/temp <0..1>                   set temperature");
    println!("/prompt                        show the system prompt with each reply");
    println!("/reset                         clear the conversation");
    println!("/exit                          end the session");
}

fn render(content: &str) {
    let printed = PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("markdown")
        .print();
    if printed.is_err() {
        println!("{}", content);
    }
}
