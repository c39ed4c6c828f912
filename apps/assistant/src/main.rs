use std::{io::Write, sync::Arc};

use anyhow::{bail, Context, Result};
use assistant_core::{
    completion::{DEFAULT_API_URL, DEFAULT_MODEL},
    Assistant, CommandEngine, DockerCli, OpenAiCompletion, Relay, RelayClient, Renderer,
};
use clap::Parser;
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod notifier;
mod view;

use notifier::TerminalNotifier;
use view::{parse_selection, ResponseView, Selection};

type InputLines = Lines<BufReader<Stdin>>;

/// Ask a Docker question and run the suggested commands one at a time.
#[derive(Parser, Debug)]
struct Args {
    /// Relay server to query instead of calling the model directly.
    #[arg(long, env = "ASSISTANT_SERVER_URL")]
    server_url: Option<String>,
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, default_value = "")]
    api_key: String,
    /// Program that command lines are run with.
    #[arg(long, default_value = "docker")]
    docker_bin: String,
    /// Only offer commands found inside markdown code blocks.
    #[arg(long)]
    markdown: bool,
    /// Ask this once and exit; without it, queries are read from stdin.
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let assistant = build_assistant(&args)?;
    let engine = CommandEngine::new(
        Arc::new(DockerCli::new(args.docker_bin.clone())),
        Arc::new(TerminalNotifier),
    );
    let renderer = args.markdown.then(Renderer::with_command_blocks);
    let mut input = BufReader::new(stdin()).lines();

    let one_shot = !args.query.is_empty();
    let mut pending = one_shot.then(|| args.query.join(" "));
    loop {
        let query = match pending.take() {
            Some(query) => query,
            None if one_shot => break,
            None => match prompt(&mut input, "ask> ").await? {
                Some(query) => query,
                None => break,
            },
        };
        if query.trim().is_empty() {
            continue;
        }

        let span = info_span!("interaction", id = %Uuid::new_v4());
        let keep_going = interact(
            assistant.as_ref(),
            &engine,
            renderer.as_ref(),
            &query,
            &mut input,
        )
        .instrument(span)
        .await?;
        if !keep_going {
            break;
        }
    }
    Ok(())
}

fn build_assistant(args: &Args) -> Result<Box<dyn Assistant>> {
    if let Some(server_url) = &args.server_url {
        let client = RelayClient::new(server_url)
            .with_context(|| format!("invalid --server-url '{server_url}'"))?;
        info!(url = %client.chat_url(), "using relay server");
        return Ok(Box::new(client));
    }

    if args.api_key.is_empty() {
        bail!("no API key: set OPENAI_API_KEY, pass --api-key, or point --server-url at a relay");
    }
    let completion = OpenAiCompletion::new(&args.api_url, args.api_key.clone(), args.model.clone())
        .with_context(|| format!("invalid --api-url '{}'", args.api_url))?;
    Ok(Box::new(Relay::new(Arc::new(completion))))
}

/// One query and its follow-up command picks. `Ok(false)` ends the session.
async fn interact(
    assistant: &dyn Assistant,
    engine: &CommandEngine,
    renderer: Option<&Renderer>,
    query: &str,
    input: &mut InputLines,
) -> Result<bool> {
    let response = match assistant.ask(query).await {
        Ok(response) => response,
        Err(error) => {
            warn!(%error, "query failed");
            eprintln!("Something went wrong: {error}");
            return Ok(true);
        }
    };

    let view = match renderer {
        Some(renderer) => ResponseView::from_tree(&renderer.render(response.as_str())),
        None => ResponseView::from_lines(engine.classify(response.as_str())),
    };
    println!("{}", view.render());

    let count = view.command_count();
    if count == 0 {
        return Ok(true);
    }
    let label = format!("run [1-{count}], Enter for a new query, q to quit> ");
    loop {
        let Some(choice) = prompt(input, &label).await? else {
            return Ok(false);
        };
        match parse_selection(&choice, count) {
            Selection::NextQuery => return Ok(true),
            Selection::Quit => return Ok(false),
            Selection::Run(number) => {
                if let Some(command) = view.command(number) {
                    engine.execute(command).await;
                }
            }
            Selection::Invalid(hint) => eprintln!("{hint}"),
        }
    }
}

async fn prompt(input: &mut InputLines, label: &str) -> Result<Option<String>> {
    let mut stdout = std::io::stdout();
    stdout.write_all(label.as_bytes())?;
    stdout.flush()?;
    Ok(input.next_line().await?)
}
