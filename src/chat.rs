use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobs_qa::application::{render, render_turn, SessionState};
use jobs_qa::domain::ports::{GenerationSink, GenerationStep};
use jobs_qa::domain::ConversationTurn;
use jobs_qa::infrastructure::{qa_service, AppConfig, RemoteBootstrap};

const TITLE: &str = "Job Listings Q&A Using Llama3";
const PLACEHOLDER: &str = "Ask me any question related to jobs.";

/// Shows generation progress on a spinner while the user waits.
struct SpinnerSink {
    spinner: ProgressBar,
}

impl SpinnerSink {
    fn start() -> Self {
        Self {
            spinner: spinner(GenerationStep::Retrieving.to_string()),
        }
    }

    fn finish(self) {
        self.spinner.finish_and_clear();
    }
}

impl GenerationSink for SpinnerSink {
    fn on_step(&self, step: GenerationStep) {
        self.spinner.set_message(step.to_string());
    }
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_turn(turn: &ConversationTurn) {
    let text = render_turn(turn);
    if turn.is_error() {
        println!("{}\n", style(text).red());
    } else {
        println!("{text}\n");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat=info,jobs_qa=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Arc::new(AppConfig::load()?);
    let bootstrap = RemoteBootstrap::from_env(config.clone())?;
    let qa = qa_service(&config)?;

    println!("{}\n", style(TITLE).bold().cyan());

    let mut session = SessionState::new(config.prompts.qa.greeting.as_str());
    let loading = spinner("Loading Database..Please wait.....".to_string());
    let ready = session.ensure_vector_store(&bootstrap).await.map(|_| ());
    loading.finish_and_clear();
    ready?;
    println!("{}\n", style("Vector Database is ready...").green());

    println!("{}\n", render(session.transcript()));
    println!("{}", style(PLACEHOLDER).dim());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", style(">").bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let before = session.transcript().len();
        let sink = SpinnerSink::start();
        let result = session.ask(&qa, &line, &sink).await;
        sink.finish();

        if let Err(e) = &result {
            if !e.is_query_failure() {
                warn!(error = %e, "question not accepted");
            }
        }

        for turn in &session.transcript().turns()[before..] {
            print_turn(turn);
        }
    }

    Ok(())
}
