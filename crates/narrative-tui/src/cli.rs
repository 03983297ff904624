use narrative_analysis::{ClientConfig, DEFAULT_BASE_URL};
use narrative_core::{EnhanceOptions, EnhancementIntensity, WritingStyle};
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Document to open. A built-in sample is used when omitted.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Base URL of the analysis service
    #[arg(long, env = "NARRATIVE_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Initial writing style for enhancement
    #[arg(long, default_value = "neutral", value_parser = parse_style)]
    style: WritingStyle,

    /// Initial enhancement intensity (conservative, moderate, aggressive)
    #[arg(long, default_value = "moderate", value_parser = parse_intensity)]
    intensity: EnhancementIntensity,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Write logs to this file (the terminal is in alternate-screen mode)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print a side-by-side diff of FILE against REVISED and exit
    #[arg(long, value_name = "REVISED", requires = "file")]
    compare: Option<PathBuf>,

    /// Column width for --compare output
    #[arg(long, default_value_t = 40)]
    column_width: usize,
}

fn parse_style(value: &str) -> Result<WritingStyle, String> {
    value.parse().map_err(|err: narrative_core::ParseOptionError| err.to_string())
}

fn parse_intensity(value: &str) -> Result<EnhancementIntensity, String> {
    value.parse().map_err(|err: narrative_core::ParseOptionError| err.to_string())
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    file: Option<PathBuf>,
    api_url: String,
    options: EnhanceOptions,
    timeout: Duration,
    log_file: Option<PathBuf>,
    compare: Option<PathBuf>,
    column_width: usize,
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            file: args.file,
            api_url: args.api_url,
            options: EnhanceOptions {
                style: args.style,
                intensity: args.intensity,
            },
            timeout: Duration::from_secs(args.timeout_secs),
            log_file: args.log_file,
            compare: args.compare,
            column_width: args.column_width,
        }
    }
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        ClapArgs::parse().into()
    }

    #[allow(dead_code)]
    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::parse_from(itr).into()
    }

    pub fn file(&self) -> Option<&PathBuf> {
        self.file.as_ref()
    }

    pub fn enhance_options(&self) -> EnhanceOptions {
        self.options
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_url.clone()).with_timeout(self.timeout)
    }

    pub fn log_file(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    pub fn compare(&self) -> Option<&PathBuf> {
        self.compare.as_ref()
    }

    pub fn column_width(&self) -> usize {
        self.column_width
    }
}
