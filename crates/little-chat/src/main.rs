//! A terminal front end for `little-chat`.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use little_chat::core::SubmitError;
use little_chat::notes::{MeetingPrompt, compose_note_request};
use little_chat::openai::images::{ImageRequest, ImageSize};
use little_chat::openai::{ChatModel, OpenAIConfigBuilder};
use little_chat::{Session, SessionBuilder};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt};
use tokio::{fs, select, signal};

const BAR_CHAR: &str = "▎";

#[derive(Parser)]
#[command(version, about = "Chat with an OpenAI-compatible service")]
struct Cli {
    /// API key sent as the bearer token.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Base URL of the service.
    #[arg(long, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Chat model identifier.
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-3.5-turbo")]
    model: ChatModel,

    /// Instruction placed at the start of the conversation.
    #[arg(long)]
    system_prompt: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive conversation (the default).
    Chat,
    /// Ask the model about a meeting notes file.
    Notes {
        /// The notes file.
        file: PathBuf,
        /// Preset instruction put in front of the notes.
        #[arg(long, value_enum, default_value_t = MeetingPrompt::NoPrompt)]
        preset: MeetingPrompt,
        /// Custom instruction put after the preset.
        #[arg(long, default_value = "")]
        custom: String,
    },
    /// Generate images from a prompt and print their URLs.
    Image {
        /// What the images should show.
        prompt: String,
        /// Number of images.
        #[arg(
            short = 'n',
            long,
            default_value_t = 1,
            value_parser = clap::value_parser!(u8).range(1..=10),
        )]
        count: u8,
        /// Size of every image.
        #[arg(long, value_enum, default_value_t = SizeArg::Small)]
        size: SizeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SizeArg {
    /// 256x256
    Small,
    /// 512x512
    Medium,
    /// 1024x1024
    Large,
}

impl From<SizeArg> for ImageSize {
    fn from(size: SizeArg) -> Self {
        match size {
            SizeArg::Small => ImageSize::Small,
            SizeArg::Medium => ImageSize::Medium,
            SizeArg::Large => ImageSize::Large,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config_builder = OpenAIConfigBuilder::new();
    if let Some(base_url) = cli.base_url {
        config_builder = config_builder.with_base_url(base_url);
    }
    let mut session_builder =
        SessionBuilder::with_openai(config_builder.build(), cli.api_key)
            .with_model(cli.model);
    if let Some(prompt) = cli.system_prompt {
        session_builder = session_builder.with_system_prompt(prompt);
    }
    let session = session_builder.build();

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(&session).await,
        Command::Notes {
            file,
            preset,
            custom,
        } => run_notes(&session, file, preset, &custom).await,
        Command::Image {
            prompt,
            count,
            size,
        } => run_image(&session, prompt, count, size.into()).await,
    }
}

async fn run_chat(session: &Session) {
    println!(
        "{}",
        "Type a message. /reset starts over, Ctrl-C cancels a pending reply."
            .dimmed()
    );

    let mut stdin = io::BufReader::new(io::stdin());
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line(&mut stdin).await else {
            break;
        };
        let line = line.trim();
        match line {
            "" => continue,
            "/reset" => {
                session.reset();
                println!("{}", "Conversation cleared.".dimmed());
                continue;
            }
            "/quit" | "/exit" => break,
            _ => {}
        }

        let progress_bar = spinner("🤔 Thinking...");
        // Dropping the pending `send_message` future cancels the exchange.
        let result = select! {
            result = session.send_message(line) => result,
            _ = signal::ctrl_c() => Err(SubmitError::Cancelled),
        };
        progress_bar.finish_and_clear();

        match result {
            Ok(reply) => print_reply(&reply),
            Err(SubmitError::Cancelled) => {
                println!("{}", "Cancelled.".dimmed());
            }
            Err(err) => print_error(&err),
        }
    }
}

async fn run_notes(
    session: &Session,
    file: PathBuf,
    preset: MeetingPrompt,
    custom: &str,
) {
    let notes = match fs::read_to_string(&file).await {
        Ok(notes) => notes,
        Err(err) => {
            print_error(&format!("cannot read {}: {err}", file.display()));
            return;
        }
    };
    let request = compose_note_request(preset, custom, &notes);
    debug!("notes request: {} chars", request.len());

    let progress_bar = spinner("📝 Reading the notes...");
    let result = session.send_message(&request).await;
    progress_bar.finish_and_clear();

    match result {
        Ok(reply) => print_reply(&reply),
        Err(err) => print_error(&err),
    }
}

async fn run_image(
    session: &Session,
    prompt: String,
    count: u8,
    size: ImageSize,
) {
    let req = ImageRequest::new(prompt).with_count(count).with_size(size);

    let progress_bar = spinner("🎨 Drawing...");
    let result = session.generate_images(&req).await;
    progress_bar.finish_and_clear();

    let resp = match result {
        Ok(resp) => resp,
        Err(err) => {
            print_error(&err);
            return;
        }
    };
    for url in resp.urls() {
        println!("{}🖼  {}", BAR_CHAR.bright_cyan(), url.bright_white());
    }
    let inline = resp.data.iter().filter(|d| d.url.is_none()).count();
    if inline > 0 {
        println!("{}", format!("{inline} image(s) returned inline").dimmed());
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(progress_style);
    progress_bar.set_message(message);
    progress_bar.enable_steady_tick(Duration::from_millis(100));
    progress_bar
}

fn print_reply(reply: &str) {
    println!("{}🤖 {}", BAR_CHAR.bright_cyan(), reply.bright_white());
}

fn print_error(err: &dyn std::fmt::Display) {
    println!("{}Error: {}", BAR_CHAR.bright_red(), err.red());
}

async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> Option<String> {
    let mut line = String::new();

    match reader.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_line_keeps_buffered_input() {
        let mut reader = io::BufReader::new(&b"first\nsecond\n"[..]);
        assert_eq!(read_line(&mut reader).await.as_deref(), Some("first\n"));
        assert_eq!(read_line(&mut reader).await.as_deref(), Some("second\n"));
        assert_eq!(read_line(&mut reader).await, None);
    }
}
