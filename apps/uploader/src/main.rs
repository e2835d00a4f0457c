use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    config::{apply_overrides, load_settings, load_settings_from},
    DisplaySlot, FormEvent, LookupOutcome, UploadFormController,
};
use shared::domain::UploadType;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "uploader", about = "Upload mixture data or look up an existing mixture")]
struct Cli {
    /// Backend base URL; overrides config and environment.
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Upload {
        #[arg(long = "type", default_value = UploadType::MIXTURE)]
        upload_type: String,
        #[command(flatten)]
        source: SourceArgs,
    },
    Search {
        #[arg(long)]
        name: String,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long)]
    url: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Source {
    File(PathBuf),
    Url(String),
}

impl SourceArgs {
    fn into_source(self) -> Result<Source> {
        match (self.file, self.url) {
            (Some(path), None) => Ok(Source::File(path)),
            (None, Some(url)) => Ok(Source::Url(url)),
            _ => Err(anyhow!("pass exactly one of --file or --url")),
        }
    }
}

fn print_events(events: &mut broadcast::Receiver<FormEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            FormEvent::Alert(text) => eprintln!("! {text}"),
            FormEvent::Notification(text) => println!("{text}"),
            FormEvent::UploadFailed(text) => eprintln!("upload failed: {text}"),
            FormEvent::SessionChanged(_) => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Cli::parse();

    let mut settings = match &args.config {
        Some(path) => {
            let mut settings = load_settings_from(path)?;
            apply_overrides(&mut settings, |key| std::env::var(key).ok());
            settings
        }
        None => load_settings(),
    };
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }

    info!(
        upload_url = %settings.upload_url(),
        lookup_url = %settings.lookup_url(),
        "uploader: using backend"
    );
    let controller = UploadFormController::from_settings(&settings);
    let mixture_id_display = DisplaySlot::new();
    controller
        .bind_identifier_display(Arc::new(mixture_id_display.clone()))
        .await;
    let mut events = controller.subscribe_events();

    match args.command {
        Command::Upload {
            upload_type,
            source,
        } => {
            let selected = match source.into_source()? {
                Source::File(path) => controller.select_file(path).await,
                Source::Url(url) => {
                    controller.open_url_dialog().await;
                    controller.enter_url(&url).await
                }
            };
            print_events(&mut events);
            selected.context("upload source rejected")?;

            let submitted = controller
                .submit_upload(UploadType::new(upload_type))
                .await;
            print_events(&mut events);
            if let Err(err) = &submitted {
                error!("uploader: upload failed: {err}");
            }
            submitted.with_context(|| format!("upload to {} failed", settings.upload_url()))?;

            let mixture_id = mixture_id_display.text();
            info!(mixture_id = %mixture_id, "uploader: upload finished");
            if !mixture_id.is_empty() {
                println!("Mixture ID: {mixture_id}");
            }
        }
        Command::Search { name } => {
            let outcome = controller.search_mixture(&name).await;
            print_events(&mut events);
            match outcome {
                Ok(LookupOutcome::Found { mixture_id, .. }) => {
                    println!("Mixture ID: {mixture_id}");
                }
                Ok(LookupOutcome::NoMatch { message }) => println!("{message}"),
                Err(err) => {
                    error!(mixture_name = %name, "uploader: lookup failed: {err}");
                    let response = controller.page().await.response;
                    eprintln!("{}", response.text);
                    return Err(err).context("mixture lookup failed");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_needs_exactly_one_source() {
        assert!(Cli::try_parse_from(["uploader", "upload"]).is_err());
        assert!(Cli::try_parse_from([
            "uploader", "upload", "--file", "a.csv", "--url", "https://x.org"
        ])
        .is_err());

        let args = Cli::try_parse_from(["uploader", "upload", "--file", "a.csv"]).expect("parse");
        let Command::Upload {
            upload_type,
            source,
        } = args.command
        else {
            panic!("expected upload command");
        };
        assert_eq!(upload_type, "Mixture");
        assert_eq!(
            source.into_source().expect("source"),
            Source::File(PathBuf::from("a.csv"))
        );
    }

    #[test]
    fn source_args_without_a_value_are_an_error_not_a_panic() {
        let source = SourceArgs {
            file: None,
            url: None,
        };
        assert!(source.into_source().is_err());
    }

    #[test]
    fn global_server_url_is_accepted_after_subcommand() {
        let args = Cli::try_parse_from([
            "uploader",
            "search",
            "--name",
            "CEM I",
            "--server-url",
            "http://backend:5000",
        ])
        .expect("parse");
        assert_eq!(args.server_url.as_deref(), Some("http://backend:5000"));
    }
}
