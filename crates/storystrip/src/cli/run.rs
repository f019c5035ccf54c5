//! Interactive strip generation command handler.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use storystrip_core::{ImageFormat, PANELS_PER_STRIP, PanelImage, StripState};
use storystrip_error::{PipelineErrorKind, StripResult};
use storystrip_interface::{ImageGenerator, ScriptGenerator};
use storystrip_pipeline::{PanelOrchestrator, Phase};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{info, instrument, warn};

/// Options for a `run` session.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Narrative summary
    pub summary: String,
    /// Art-style modifier
    pub style: String,
    /// Directory for candidate panels and the final strip
    pub output: PathBuf,
    /// Accept every candidate without prompting
    pub auto_accept: bool,
    /// Retries per request after an upstream failure in auto-accept mode
    pub max_retries: u32,
    /// Encoding of generated panels
    pub format: ImageFormat,
}

/// What the reader wants to do with a candidate panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Accept,
    Regenerate,
    Quit,
}

impl Decision {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "a" | "accept" | "y" | "yes" => Some(Decision::Accept),
            "r" | "regenerate" => Some(Decision::Regenerate),
            "q" | "quit" => Some(Decision::Quit),
            _ => None,
        }
    }
}

/// Line-oriented questions on stdin.
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Prints `question` and returns the answer, or `None` at end of input.
    async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(question.as_bytes()).await?;
        stdout.flush().await?;
        Ok(self.lines.next_line().await?)
    }

    async fn decision(&mut self) -> Result<Decision> {
        loop {
            match self.ask("[a]ccept, [r]egenerate or [q]uit? ").await? {
                None => return Ok(Decision::Quit),
                Some(answer) => match Decision::parse(&answer) {
                    Some(decision) => return Ok(decision),
                    None => println!("Please answer a, r or q."),
                },
            }
        }
    }

    async fn confirm_retry(&mut self) -> Result<bool> {
        let answer = self.ask("Retry? [Y/n] ").await?;
        Ok(match answer {
            None => false,
            Some(answer) => !matches!(answer.trim().to_lowercase().as_str(), "n" | "no"),
        })
    }
}

/// Generates a strip panel by panel.
///
/// Each candidate is written to `<output>/panel-<n>.<ext>` for review; the
/// finished strip goes to `<output>/strip.png`. Returns the strip path, or
/// `None` if the reader quit before the strip was complete.
#[instrument(skip_all, fields(style = %options.style, output = %options.output.display()))]
pub async fn run_strip<S, I>(
    orchestrator: &PanelOrchestrator<S, I>,
    options: &RunOptions,
) -> Result<Option<PathBuf>>
where
    S: ScriptGenerator,
    I: ImageGenerator,
{
    std::fs::create_dir_all(&options.output)
        .with_context(|| format!("Failed to create {}", options.output.display()))?;
    let mut prompt = Prompt::new();

    println!("Writing panel 1...");
    let outcome = orchestrator.start(&options.summary, &options.style).await;
    let mut state = match recover(orchestrator, outcome, options, &mut prompt).await? {
        Some(state) => state,
        None => return quit(orchestrator).await,
    };

    while orchestrator.phase().await != Phase::Complete {
        let index = state.panels().len() - 1;
        let panel = &state.panels()[index];
        let Some(candidate) = panel.image().clone() else {
            anyhow::bail!("Panel {} has no candidate image", index + 1);
        };

        let path = write_candidate(&options.output, index, &candidate, options.format)?;
        println!();
        println!("Panel {}: {}", index + 1, panel.visual());
        if !panel.caption().is_empty() {
            println!("  Caption: \"{}\"", panel.caption());
        }
        println!("  Image: {}", path.display());

        let decision = if options.auto_accept {
            Decision::Accept
        } else {
            prompt.decision().await?
        };

        let outcome = match decision {
            Decision::Accept => {
                if index + 1 < PANELS_PER_STRIP {
                    println!("Writing panel {}...", index + 2);
                }
                orchestrator.accept_panel_image(index, candidate).await
            }
            Decision::Regenerate => {
                println!("Redrawing panel {}...", index + 1);
                orchestrator.regenerate_panel_image(index).await
            }
            Decision::Quit => return quit(orchestrator).await,
        };

        state = match recover(orchestrator, outcome, options, &mut prompt).await? {
            Some(state) => state,
            None => return quit(orchestrator).await,
        };
    }

    println!();
    println!("All panels accepted, assembling strip...");
    let state = orchestrator.assemble_strip().await?;
    let Some(strip) = state.final_image() else {
        anyhow::bail!("Strip was assembled but no image was stored");
    };
    let path = options.output.join("strip.png");
    std::fs::write(&path, strip.bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = strip.len(), "Strip written");
    println!("Strip written to {}", path.display());
    Ok(Some(path))
}

/// Retries retryable failures until the operation succeeds or the reader
/// (or the retry budget) gives up. `None` means give up.
async fn recover<S, I>(
    orchestrator: &PanelOrchestrator<S, I>,
    mut outcome: StripResult<StripState>,
    options: &RunOptions,
    prompt: &mut Prompt,
) -> Result<Option<StripState>>
where
    S: ScriptGenerator,
    I: ImageGenerator,
{
    let mut attempts = 0;
    loop {
        let error = match outcome {
            Ok(state) => return Ok(Some(state)),
            Err(error) => error,
        };

        let retryable = matches!(
            error.pipeline_kind(),
            Some(PipelineErrorKind::UpstreamFailure(_) | PipelineErrorKind::MalformedResponse(_))
        );
        if !retryable {
            return Err(error.into());
        }

        warn!(error = %error, attempts, "Request failed");
        eprintln!("{}", error);
        let again = if options.auto_accept {
            attempts < options.max_retries
        } else {
            prompt.confirm_retry().await?
        };
        if !again {
            return Ok(None);
        }

        attempts += 1;
        outcome = orchestrator.retry().await;
    }
}

async fn quit<S, I>(orchestrator: &PanelOrchestrator<S, I>) -> Result<Option<PathBuf>>
where
    S: ScriptGenerator,
    I: ImageGenerator,
{
    orchestrator.reset().await;
    println!("Strip discarded.");
    Ok(None)
}

fn write_candidate(
    dir: &Path,
    index: usize,
    image: &PanelImage,
    format: ImageFormat,
) -> Result<PathBuf> {
    let path = dir.join(format!("panel-{}.{}", index + 1, format.extension()));
    std::fs::write(&path, image.bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
