use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use tiktok_downloader::utils::file_utils::timestamped_filename;
use tiktok_downloader::utils::logging;
use tiktok_downloader::utils::network::build_client;
use tiktok_downloader::utils::validation::endpoint_url;
use tiktok_downloader::{
    AppConfig, ControlAppearance, ControllerSettings, ElementIds, FileSaver, HttpRetrievalClient,
    MemorySurface, NativeNavigator, Notification, PageContext, RenderingSurface,
    SubmissionController, SubmissionState, SubmitDisposition, UserAgentDetector,
};

/// Submit a TikTok link and save the video it points to
#[derive(Debug, Parser)]
#[command(name = "tiktok-downloader", version)]
#[command(about = "Download a TikTok video through the retrieval service", long_about = None)]
struct Cli {
    /// TikTok video URL. Read from stdin when omitted.
    url: Option<String>,

    /// User agent to present; mobile agents use the asynchronous path.
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Base URL of the retrieval service (overrides the config file).
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Directory downloaded videos are saved to.
    #[arg(long, value_name = "DIR")]
    downloads_dir: Option<PathBuf>,

    /// Configuration file to use instead of the default location.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Terminal-backed page: notifications are printed as they appear
struct ConsoleSurface {
    inner: MemorySurface,
}

impl ConsoleSurface {
    fn new(ids: &ElementIds, input: String) -> Self {
        let inner = MemorySurface::new(ids);
        inner.set_input(input);
        Self { inner }
    }
}

impl RenderingSurface for ConsoleSurface {
    fn has_element(&self, id: &str) -> bool {
        self.inner.has_element(id)
    }

    fn input_value(&self) -> String {
        self.inner.input_value()
    }

    fn clear_input(&self) {
        self.inner.clear_input()
    }

    fn input_focused(&self) -> bool {
        self.inner.input_focused()
    }

    fn blur_input(&self) {
        self.inner.blur_input()
    }

    fn set_input_invalid(&self, invalid: bool) {
        self.inner.set_input_invalid(invalid)
    }

    fn set_control(&self, appearance: ControlAppearance) {
        if appearance != self.inner.control() {
            eprintln!("[{}]", appearance.label());
        }
        self.inner.set_control(appearance)
    }

    fn insert_notification(&self, id: u64, notification: &Notification) {
        println!(
            "[{}] ({}) {}",
            notification.severity.alert_class(),
            notification.severity.icon(),
            notification.message
        );
        self.inner.insert_notification(id, notification)
    }

    fn remove_notification(&self, id: u64) {
        self.inner.remove_notification(id)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("tiktok-downloader error: {:#}", err);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let mut config = AppConfig::load_or_default(cli.config.as_deref());
    if let Some(endpoint) = cli.endpoint {
        config.endpoint.base_url = endpoint;
    }
    if let Some(dir) = cli.downloads_dir {
        config.save.downloads_dir = Some(dir.to_string_lossy().into_owned());
    }

    logging::init_tracing_with(config.log_level.as_deref());
    config.validate()?;
    info!(
        "🚀 {} v{} starting",
        tiktok_downloader::NAME,
        tiktok_downloader::VERSION
    );

    let raw_url = match cli.url {
        Some(url) => url,
        None => read_stdin_line()?,
    };
    let user_agent = cli
        .user_agent
        .unwrap_or_else(|| config.endpoint.user_agent.clone());

    let client = build_client(&user_agent)?;
    let endpoint = endpoint_url(&config.endpoint.base_url, &config.endpoint.path)?;
    let downloads_dir = config.downloads_dir()?;
    let settings = ControllerSettings::from(&config);

    let surface = Arc::new(ConsoleSurface::new(&settings.ids, raw_url));
    let context = PageContext {
        surface,
        capability: Arc::new(UserAgentDetector::with_markers(
            user_agent,
            config.capability.mobile_markers.clone(),
        )),
        retrieval: Arc::new(HttpRetrievalClient::new(
            client.clone(),
            endpoint.clone(),
            &config.endpoint.field_name,
        )),
        saver: Arc::new(FileSaver::new(downloads_dir.clone())?),
        settings,
    };

    let mut controller = SubmissionController::new(context)?;
    let code = match controller.submit().await? {
        SubmitDisposition::Navigate(submission) => {
            let navigator = NativeNavigator::new(client, endpoint, downloads_dir);
            let fallback = timestamped_filename(
                &config.save.filename_prefix,
                &config.save.extension,
                chrono::Utc::now(),
            );

            let outcome = navigator.navigate(&submission, &fallback).await;
            controller.reset();
            match outcome {
                Ok(path) => {
                    println!("Saved {}", path.display());
                    0
                }
                Err(err) => {
                    error!("Native download failed: {}", err);
                    eprintln!("Download failed: {}", err);
                    1
                }
            }
        }
        SubmitDisposition::Resolved(SubmissionState::Succeeded) => 0,
        SubmitDisposition::Resolved(_)
        | SubmitDisposition::Cancelled(_)
        | SubmitDisposition::Ignored => 1,
    };

    controller.drain().await;
    Ok(code)
}

fn read_stdin_line() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read URL from stdin")?;
    Ok(line.trim().to_string())
}
