use ansa_lib::{
    io::text as text_io,
    pipeline::{ClassificationResult, Pipeline, PipelineConfig},
    RuleTable,
};
use ansa_synth::{synthesize, Mode, SynthConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "ansa",
    version,
    about = "ANSA: window-based stress/fatigue classification from physiological signals"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DemoMode {
    Normal,
    Stress,
    Fatigue,
}

impl From<DemoMode> for Mode {
    fn from(mode: DemoMode) -> Self {
        match mode {
            DemoMode::Normal => Mode::Normal,
            DemoMode::Stress => Mode::Stress,
            DemoMode::Fatigue => Mode::Fatigue,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a seeded synthetic window (ground-truth peaks by default)
    Demo {
        #[arg(long, value_enum)]
        mode: DemoMode,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 128.0)]
        fs: f64,
        #[arg(long, default_value_t = 32.0)]
        fs_eda: f64,
        #[arg(long, default_value_t = 60.0)]
        window_secs: f64,
        /// TOML rule table overriding the default thresholds
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Run the cardiac/pulse detectors instead of the ground truth
        #[arg(long)]
        use_detectors: bool,
    },
    /// Classify newline-delimited sample files through the full pipeline
    Process {
        #[arg(long)]
        cardiac: PathBuf,
        #[arg(long)]
        pulse: PathBuf,
        #[arg(long)]
        eda: PathBuf,
        #[arg(long, default_value_t = 128.0)]
        fs_cardiac: f64,
        #[arg(long, default_value_t = 128.0)]
        fs_pulse: f64,
        #[arg(long, default_value_t = 32.0)]
        fs_eda: f64,
        #[arg(long, default_value_t = 60.0)]
        window_secs: f64,
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Demo {
            mode,
            seed,
            fs,
            fs_eda,
            window_secs,
            rules,
            use_detectors,
        } => cmd_demo(
            mode,
            seed,
            fs,
            fs_eda,
            window_secs,
            rules.as_deref(),
            use_detectors,
        )?,
        Commands::Process {
            cardiac,
            pulse,
            eda,
            fs_cardiac,
            fs_pulse,
            fs_eda,
            window_secs,
            rules,
        } => cmd_process(
            &cardiac,
            &pulse,
            &eda,
            fs_cardiac,
            fs_pulse,
            fs_eda,
            window_secs,
            rules.as_deref(),
        )?,
    }
    Ok(())
}

fn cmd_demo(
    mode: DemoMode,
    seed: u64,
    fs: f64,
    fs_eda: f64,
    window_secs: f64,
    rules: Option<&Path>,
    use_detectors: bool,
) -> Result<()> {
    let synth_config = SynthConfig {
        fs,
        fs_eda,
        window_secs,
        seed,
    };
    let window = synthesize(mode.into(), &synth_config);
    let pipeline = build_pipeline(
        PipelineConfig {
            fs_cardiac: fs,
            fs_pulse: fs,
            fs_eda,
            window_secs,
        },
        rules,
    )?;

    let result = if use_detectors {
        pipeline.process_window(&window.cardiac, &window.pulse, &window.eda)?
    } else {
        pipeline.process_window_with_peaks(
            &window.cardiac,
            &window.pulse,
            &window.eda,
            &window.cardiac_peaks,
            &window.pulse_feet,
        )?
    };
    print_result(&result)
}

fn cmd_process(
    cardiac: &Path,
    pulse: &Path,
    eda: &Path,
    fs_cardiac: f64,
    fs_pulse: f64,
    fs_eda: f64,
    window_secs: f64,
    rules: Option<&Path>,
) -> Result<()> {
    let cardiac = text_io::read_f64_series(cardiac)?;
    let pulse = text_io::read_f64_series(pulse)?;
    let eda = text_io::read_f64_series(eda)?;
    let pipeline = build_pipeline(
        PipelineConfig {
            fs_cardiac,
            fs_pulse,
            fs_eda,
            window_secs,
        },
        rules,
    )?;
    let result = pipeline.process_window(&cardiac, &pulse, &eda)?;
    print_result(&result)
}

fn build_pipeline(config: PipelineConfig, rules: Option<&Path>) -> Result<Pipeline> {
    Ok(match rules {
        Some(path) => Pipeline::with_rules(config, load_rules(path)?),
        None => Pipeline::new(config),
    })
}

fn load_rules(path: &Path) -> Result<RuleTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rule table {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid rule table {}", path.display()))
}

fn print_result(result: &ClassificationResult) -> Result<()> {
    println!("{}", serde_json::to_string(result)?);
    Ok(())
}
