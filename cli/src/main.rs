use std::path::PathBuf;

use structopt::StructOpt;

use dispatch::config;
use dispatch::mailgun::api;
use dispatch::{EmailMessage, Error, MailgunClient, RecipientMetadata};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "dispatch",
    about = "Send demo emails through the Mailgun messages API."
)]
struct Opt {
    /// TOML config file, merged with MAILGUN_* environment variables
    #[structopt(short, long)]
    config: Option<String>,

    /// Also send an email with this file attached
    #[structopt(short, long, parse(from_os_str))]
    attachment: Option<PathBuf>,

    /// Use the EU region endpoint instead of the configured base URL
    #[structopt(long)]
    eu: bool,

    #[structopt(long)]
    skip_bulk: bool,
}

fn report(operation: &str, result: Result<String, Error>) {
    match result {
        Ok(id) => println!("{} sent successfully, message ID = {}", operation, id),
        Err(e) => match e.status() {
            Some((code, body)) => println!(
                "{}: sending failed: HTTP error {}: {}",
                operation, code, body
            ),
            None => println!("Sending failed: {}", e),
        },
    }
}

#[tokio::main]
async fn main() {
    // Init logger
    env_logger::builder().format_timestamp_micros().init();

    let opt = Opt::from_args();

    let mut settings = match config::load_settings(opt.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            log::error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    if opt.eu {
        settings.base_url = api::MAILGUN_EU_BASE_API.to_string();
    }

    let client = match MailgunClient::from_settings(&settings) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let recipient_1 = settings.test_recipient_1.clone().unwrap_or_default();
    let recipient_2 = settings.test_recipient_2.clone().unwrap_or_default();

    let msg = EmailMessage::new()
        .with_sender(format!("Mailgun Sandbox <postmaster@{}>", settings.domain))
        .with_recipient(recipient_1.as_str(), Default::default())
        .with_subject("Hello from Mailgun!")
        .with_text("This is a test email sent via Mailgun API.")
        .with_html(
            "<html><head></head><body><h1>Test</h1>\
             <p>This is a test email sent via the Mailgun API.</p></body></html>",
        );

    println!("Sending single email...");
    report("Single email", client.send_email(&msg).await);

    if !opt.skip_bulk {
        let bulk = EmailMessage {
            subject: "A Bulk Email from Mailgun!".to_string(),
            text: Some("Hello %recipient.name%, your ID is %recipient.id%.".to_string()),
            html: None,
            ..msg.clone()
        }
        .with_recipients(vec![
            (recipient_1.as_str(), RecipientMetadata::new("Alice", "RCPT1")),
            (recipient_2.as_str(), RecipientMetadata::new("Bob", "RCPT2")),
        ]);

        println!("Sending bulk email...");
        report("Bulk email", client.send_email(&bulk).await);
    }

    if let Some(path) = opt.attachment {
        let with_attachment = EmailMessage {
            subject: "Email with Attachment".to_string(),
            text: Some("Please find the attached document.".to_string()),
            html: None,
            ..msg
        }
        .with_attachment(path);

        println!("Sending email with attachment...");
        report("Email with attachment", client.send_email(&with_attachment).await);
    }
}
