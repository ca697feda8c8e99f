//! pdfvox CLI - read PDF documents aloud from the terminal

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfvox::speech::{EspeakSynthesizer, NameHeuristicPicker, RodioEngine, VoiceSelection};
use pdfvox::{
    format_size, write_text_artifact, CancelToken, Conversion, PageRange, PdfSource,
    PlaybackState, ReaderApp, Severity, StatusSink, VoiceChoice,
};

#[derive(Parser)]
#[command(name = "pdfvox")]
#[command(version)]
#[command(about = "Read PDF documents aloud and export their text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a PDF and read it aloud
    Speak {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g. "1-10" or "3")
        #[arg(long)]
        pages: Option<String>,

        /// Reading voice
        #[arg(long, default_value = "female")]
        voice: VoiceChoice,

        /// Speech rate in words per minute (150 = baseline)
        #[arg(long, default_value_t = 150)]
        wpm: u32,
    },

    /// Extract text from a PDF to a plain-text file
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g. "1-10" or "3")
        #[arg(long)]
        pages: Option<String>,

        /// Output file (defaults to <name>_text.txt next to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the speech engine's voices
    Voices {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Speak {
            input,
            pages,
            voice,
            wpm,
        } => cmd_speak(&input, pages.as_deref(), voice, wpm),
        Commands::Text {
            input,
            pages,
            output,
        } => cmd_text(&input, pages.as_deref(), output.as_deref()),
        Commands::Info { input, json } => cmd_info(&input, json),
        Commands::Voices { json } => cmd_voices(json),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Bridges library status reports to the terminal: progress drives the
/// bar, statuses print around it.
struct TerminalSink {
    bar: ProgressBar,
}

impl TerminalSink {
    fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {percent:>3}% {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl StatusSink for TerminalSink {
    fn status(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => self.bar.println(message.dimmed().to_string()),
            Severity::Success => self.bar.println(message.green().to_string()),
            Severity::Error => self.bar.println(format!("{}", message.red())),
        }
    }

    fn progress(&self, percent: f32, message: &str) {
        self.bar.set_position(percent.round() as u64);
        self.bar.set_message(message.to_string());
    }
}

fn parse_pages(pages: Option<&str>) -> Result<Option<PageRange>, Box<dyn std::error::Error>> {
    match pages {
        Some(spec) => Ok(Some(PageRange::parse(spec)?)),
        None => Ok(None),
    }
}

fn cmd_speak(
    input: &Path,
    pages: Option<&str>,
    voice: VoiceChoice,
    wpm: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let range = parse_pages(pages)?;
    log::debug!(
        "speaking {} ({:?} voice, {} wpm)",
        input.display(),
        voice,
        wpm
    );

    let engine = RodioEngine::new(EspeakSynthesizer::new())?;
    let mut app = ReaderApp::new(engine);
    app.set_voice(voice);
    app.set_wpm(wpm);

    let sink = TerminalSink::new();
    app.load_file(input, &sink)?;
    if let Some(range) = range {
        app.set_range(range);
    }
    app.convert(&sink)?;
    sink.finish();

    let info = app
        .conversion()
        .document_info()
        .map(|i| i.page_count)
        .unwrap_or_default();
    println!(
        "{} {} ({} pages, {})",
        "Reading".green().bold(),
        input.display(),
        info,
        format_size(app.conversion().text().len() as u64)
    );

    app.play()?;

    // Poll until the utterance runs out; Ctrl-C stops the process and the
    // audio with it.
    let mut started = false;
    loop {
        match app.pump(&sink) {
            PlaybackState::Speaking | PlaybackState::Paused => started = true,
            PlaybackState::Idle if started => break,
            PlaybackState::Idle => {}
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    println!("{}", "Done.".green());
    Ok(())
}

fn cmd_text(
    input: &Path,
    pages: Option<&str>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let range = parse_pages(pages)?;

    let mut conversion = Conversion::new();
    let sink = TerminalSink::new();
    conversion.load_file(input, &sink)?;
    if let Some(range) = range {
        conversion.set_range(range);
    }
    conversion.convert(&sink, &CancelToken::new())?;
    sink.finish();

    let path = match output {
        Some(path) => {
            std::fs::write(path, conversion.text())?;
            path.to_path_buf()
        }
        None => {
            let dir = input.parent().unwrap_or_else(|| Path::new("."));
            write_text_artifact(dir, conversion.file_name(), conversion.text())?
        }
    };
    log::debug!("wrote {} bytes to {}", conversion.text().len(), path.display());

    println!(
        "{} {} ({})",
        "Saved".green().bold(),
        path.display(),
        format_size(conversion.text().len() as u64)
    );
    Ok(())
}

fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let source = pdfvox::load_file(input)?;
    let info = source.info();
    let size = std::fs::metadata(input)?.len();

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", "Document".green().bold());
    println!("  {} {}", "File:".dimmed(), input.display());
    if let Some(title) = &info.title {
        println!("  {} {}", "Title:".dimmed(), title);
    }
    println!("  {} PDF {}", "Format:".dimmed(), info.version);
    println!(
        "  {} {} pages {} {}",
        "Pages:".dimmed(),
        info.page_count,
        "•".dimmed(),
        format_size(size)
    );
    if info.encrypted {
        println!("  {} yes", "Encrypted:".dimmed());
    }
    Ok(())
}

fn cmd_voices(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let synth = EspeakSynthesizer::new();
    let catalog = pdfvox::speech::Synthesizer::voices(&synth)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    let selection = VoiceSelection::from_catalog(&catalog, &NameHeuristicPicker);
    let female = selection.voice_for(VoiceChoice::Female).map(|v| v.id.clone());
    let male = selection.voice_for(VoiceChoice::Male).map(|v| v.id.clone());

    println!("{}", "Voices".green().bold());
    for voice in &catalog {
        let mut marks = Vec::new();
        if Some(&voice.id) == female.as_ref() {
            marks.push("female pick");
        }
        if Some(&voice.id) == male.as_ref() {
            marks.push("male pick");
        }
        let suffix = if marks.is_empty() {
            String::new()
        } else {
            format!(" ({})", marks.join(", ")).cyan().to_string()
        };
        println!("  {:<12} {}{}", voice.id, voice.name, suffix);
    }
    Ok(())
}
