use std::env;
use std::sync::Arc;

use eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use vitakita_checkin::config::{self, CheckinConfig, StoreConfig};
use vitakita_checkin::render;
use vitakita_diagnostic::{DiagnosticError, DiagnosticSession, SessionPhase};
use vitakita_instruments::error::InstrumentError;
use vitakita_instruments::{QuestionBank, get_bank};
use vitakita_storage::local::LocalProfileStore;
use vitakita_storage::port::ProfileStore;
use vitakita_storage::s3::S3ProfileStore;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let user_id = env::args()
        .nth(1)
        .ok_or_else(|| eyre::eyre!("usage: vitakita-checkin <user-id>"))?;

    // Reading the config emits no logs, so the subscriber can wait for
    // `json_logs`.
    let loaded = if config::has_config() {
        Some(config::load_config()?)
    } else {
        None
    };
    let first_run = loaded.is_none();
    let migrated_from = loaded.as_ref().and_then(|l| l.migrated_from);
    let config = match loaded {
        Some(loaded) => loaded.config,
        None => CheckinConfig::default_local()?,
    };

    init_tracing(config.json_logs);

    if let Some(from) = migrated_from {
        tracing::info!(from, to = config::CURRENT_VERSION, "migrated config");
    }
    if first_run || migrated_from.is_some() {
        config::save_config(&config)?;
    }

    let store = build_store(&config.store).await;
    let bank: Arc<dyn QuestionBank> = get_bank(&config.bank_id)
        .map(Arc::from)
        .ok_or_else(|| InstrumentError::UnknownBank(config.bank_id.clone()))?;

    let mut session =
        DiagnosticSession::open(store, bank, user_id, config.session_config()).await?;
    let mut prompt = Prompt::new();
    run(&mut session, &mut prompt).await
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn build_store(store: &StoreConfig) -> Arc<dyn ProfileStore> {
    match store {
        StoreConfig::Local { dir } => {
            tracing::info!(dir = %dir.display(), "using local profile store");
            Arc::new(LocalProfileStore::new(dir.clone()))
        }
        StoreConfig::S3 { bucket, region } => {
            tracing::info!(bucket = %bucket, "using S3 profile store");
            let client = vitakita_storage::client::build_client(region.as_deref()).await;
            Arc::new(S3ProfileStore::new(client, bucket.clone()))
        }
    }
}

/// Line-oriented stdin. `None` on EOF.
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn ask(&mut self, text: &str) -> Result<Option<String>> {
        println!("{text}");
        Ok(self.lines.next_line().await?)
    }

    async fn confirm(&mut self, text: &str, default: bool) -> Result<bool> {
        loop {
            let Some(line) = self.ask(text).await? else {
                return Ok(false);
            };
            match render::parse_yes_no(&line, default) {
                Some(answer) => return Ok(answer),
                None => println!("Please answer y or n."),
            }
        }
    }
}

async fn run(session: &mut DiagnosticSession, prompt: &mut Prompt) -> Result<()> {
    loop {
        match session.phase() {
            SessionPhase::NeedsDiagnostic => {
                println!("{}", render::last_result_line(session.last_result()));
                println!("{}", render::INTRO);
                session.start()?;
            }
            SessionPhase::InProgress => {
                if !answer_questions(session, prompt).await? {
                    session.cancel()?;
                    return Ok(());
                }
                report_submission(session.submit().await)?;
            }
            SessionPhase::Completed => {
                match session.result() {
                    Some(result) => print!("{}", render::result_summary(result)),
                    None => println!("{}", render::last_result_line(session.last_result())),
                }
                if !prompt.confirm("Retake the questionnaire? [y/N]", false).await? {
                    return Ok(());
                }
                session.retake()?;
            }
            SessionPhase::Error => {
                println!(
                    "Your answers could not be saved: {}",
                    session.last_error().unwrap_or("unknown error")
                );
                if !prompt.confirm("Try saving again? [Y/n]", true).await? {
                    return Ok(());
                }
                report_submission(session.retry().await)?;
            }
            SessionPhase::Submitting => {
                // Only reachable if a write future was dropped mid-flight.
                session.abandon_submission()?;
            }
        }
    }
}

/// Ask every unanswered question. Returns false if the user quit.
async fn answer_questions(session: &mut DiagnosticSession, prompt: &mut Prompt) -> Result<bool> {
    let questions = session.questions().to_vec();
    let options = session.options().to_vec();
    let total = questions.len();

    for (index, question) in questions.iter().enumerate() {
        if session.answers().contains(&question.id) {
            continue;
        }
        loop {
            let block = render::question_block(index, total, question, &options);
            let Some(line) = prompt.ask(&block).await? else {
                return Ok(false);
            };
            if line.trim().eq_ignore_ascii_case("q") {
                return Ok(false);
            }
            let Some(option) = render::parse_choice(&line, &options) else {
                println!("Please pick one of the listed options.");
                continue;
            };
            session.select_answer(&question.id, &option.id)?;
            break;
        }
    }
    Ok(true)
}

/// Write failures leave the session in `Error` for the loop to offer a retry;
/// anything else is a bug in the driver.
fn report_submission(
    outcome: Result<vitakita_core::models::diagnostic::DiagnosticResult, DiagnosticError>,
) -> Result<()> {
    match outcome {
        Ok(_) => {
            println!("Assessment complete.");
            Ok(())
        }
        Err(e) if e.is_write_failure() => Ok(()),
        Err(e) => Err(e.into()),
    }
}
