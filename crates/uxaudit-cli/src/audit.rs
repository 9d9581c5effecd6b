//! `audit` command: key entry, the progress line and the model call.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use uxaudit_core::{
    AnalysisResult, AppConfig, AuditWorkspace, CoreError, Credential, CredentialStore,
    LoadedImage, SessionKeyForm,
};
use uxaudit_gemini::{
    build_request, GeminiClient, GeminiError, GenerateContentRequest, GenerationSettings,
    ImagePayload,
};

use crate::progress::StageBar;
use crate::render;
use crate::OutputFormat;

const KEY_PROMPT: &str = "Enter API key for this session: ";

#[derive(Debug)]
pub(crate) struct AuditArgs {
    pub image: PathBuf,
    pub format: OutputFormat,
    pub model: Option<String>,
    pub dry_run: bool,
    pub assume_yes: bool,
}

/// Runs one audit end to end.
///
/// Returns `ExitCode::FAILURE` after printing the failure banner when the
/// attempt fails; `Err` is reserved for local problems such as an unreadable
/// file.
///
/// # Errors
///
/// Returns an error if the image cannot be read, the key prompt cannot read
/// stdin, or the HTTP client cannot be built.
pub(crate) async fn run_audit(config: &AppConfig, args: AuditArgs) -> anyhow::Result<ExitCode> {
    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("failed to read image {}", args.image.display()))?;
    let name = args
        .image
        .file_name()
        .map_or_else(|| args.image.display().to_string(), |n| n.to_string_lossy().into_owned());

    let mut settings = GenerationSettings::from_config(config);
    if let Some(model) = args.model {
        settings.model = model;
    }

    if args.dry_run {
        return dry_run(&bytes, &settings);
    }

    let mut workspace = AuditWorkspace::new();
    let image = match LoadedImage::new(name, bytes) {
        Ok(image) => image,
        Err(e) => return Ok(fail(&GeminiError::from(e))),
    };
    workspace.load_image(image);

    let mut store = CredentialStore::new(config.gemini_api_key.as_deref());
    let (ticket, credential, image) = match workspace.begin_audit(&store) {
        Ok(started) => started,
        Err(CoreError::NeedsCredential) => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut out = io::stderr();
            let key = if stdin.is_terminal() {
                prompt_for_hidden_key(&mut out)?
            } else {
                prompt_for_key(&mut input, &mut out)?
            };
            store.save_session(key);
            if !args.assume_yes
                && !confirm(&mut input, &mut out, "Key stored for this session. Start the audit now?")?
            {
                eprintln!("audit not started");
                return Ok(ExitCode::SUCCESS);
            }
            workspace.begin_audit(&store)?
        }
        Err(e) => return Err(e.into()),
    };

    let client = GeminiClient::with_base_url(&config.gemini_base_url, config.request_timeout_secs)?;
    let interval = Duration::from_millis(config.stage_interval_ms);

    let bar = StageBar::stderr();
    bar.sync(workspace.progress());
    let outcome = match build_request(&image.bytes, credential, &settings) {
        Ok(request) => {
            let call = client.analyze(&request);
            drive_progress(&mut workspace, &bar, call, interval).await
        }
        Err(e) => Err(GeminiError::from(e)),
    };

    match outcome {
        Ok(result) => {
            workspace.complete(ticket, Ok(result));
            bar.sync(workspace.progress());
        }
        Err(err) => {
            workspace.complete(ticket, Err(err.to_string()));
            bar.sync(workspace.progress());
            return Ok(fail(&err));
        }
    }

    match workspace.result() {
        Some(result) => {
            render::print_result(&result, args.format, &image.name)?;
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

/// Advances the simulated stages on `interval` until `call` settles,
/// mirroring each change onto `bar`.
///
/// The ticker is dropped with this future, so no tick lands after settlement.
pub(crate) async fn drive_progress<F>(
    workspace: &mut AuditWorkspace,
    bar: &StageBar,
    call: F,
    interval: Duration,
) -> Result<AnalysisResult, GeminiError>
where
    F: std::future::Future<Output = Result<AnalysisResult, GeminiError>>,
{
    tokio::pin!(call);
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    loop {
        tokio::select! {
            outcome = &mut call => return outcome,
            _ = ticker.tick() => {
                if workspace.tick() {
                    bar.sync(workspace.progress());
                }
            }
        }
    }
}

fn dry_run(bytes: &[u8], settings: &GenerationSettings) -> anyhow::Result<ExitCode> {
    let image = match ImagePayload::from_bytes(bytes) {
        Ok(image) => image,
        Err(e) => return Ok(fail(&GeminiError::from(e))),
    };
    let body = GenerateContentRequest::for_image(&image, settings);
    println!("POST v1beta/models/{}:generateContent", settings.model);
    println!("{}", serde_json::to_string_pretty(&body.redacted())?);
    Ok(ExitCode::SUCCESS)
}

fn fail(err: &GeminiError) -> ExitCode {
    tracing::warn!(error = %err, "audit attempt failed");
    eprintln!("{}", err.user_message());
    ExitCode::FAILURE
}

/// Reads a session key from piped input, re-prompting on blank lines.
///
/// # Errors
///
/// Returns an error if stdin closes before a key is entered or the prompt
/// cannot be written.
pub(crate) fn prompt_for_key<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<Credential> {
    collect_key(out, |out| {
        write!(out, "{KEY_PROMPT}")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("no API key entered");
        }
        Ok(line)
    })
}

/// Reads a session key from the terminal without echoing it.
fn prompt_for_hidden_key<W: Write>(out: &mut W) -> anyhow::Result<Credential> {
    collect_key(out, |_| Ok(rpassword::prompt_password(KEY_PROMPT)?))
}

fn collect_key<W, F>(out: &mut W, mut read_key: F) -> anyhow::Result<Credential>
where
    W: Write,
    F: FnMut(&mut W) -> anyhow::Result<String>,
{
    writeln!(out, "No Gemini API key configured (GEMINI_API_KEY).")?;
    loop {
        let mut form = SessionKeyForm::new();
        form.set_input(read_key(out)?);
        if form.can_submit() {
            return Ok(form.submit()?);
        }
        writeln!(out, "API key must not be blank.")?;
    }
}

/// Asks a yes/no question; anything but `y`/`yes` is a no.
///
/// # Errors
///
/// Returns an error if the prompt cannot be written or stdin cannot be read.
pub(crate) fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
) -> io::Result<bool> {
    write!(out, "{question} [y/N] ")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
