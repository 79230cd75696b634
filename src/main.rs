use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;

use quotebook::cli::Session;
use quotebook::config::AppConfig;
use quotebook::notices::{NoticeBoard, NoticeEvent};
use quotebook::quotes::{BookEvent, QuoteBook};
use quotebook::remote::{HttpRemote, QuoteRemote};
use quotebook::store::{FileStore, LocalStore, MemoryStore};
use quotebook::sync::{self, Reconciler, SyncConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;

    eprintln!("Quotebook v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Data: {}", config.data_dir.display());
    eprintln!("   Server: {}", config.endpoint);

    // ── Storage ──────────────────────────────────────────────────────────
    let durable = Arc::new(FileStore::open(&config.data_dir).await.unwrap_or_else(|e| {
        eprintln!(
            "Error: Failed to open data directory {}: {}",
            config.data_dir.display(),
            e
        );
        std::process::exit(1);
    }));
    let local = LocalStore::new(durable, Arc::new(MemoryStore::new()));

    // ── Book + Sync ──────────────────────────────────────────────────────
    let remote: Arc<dyn QuoteRemote> = Arc::new(HttpRemote::new(config.endpoint.clone()));
    let book = QuoteBook::open(local, Arc::clone(&remote)).await;
    let notices = NoticeBoard::new();
    let reconciler = Arc::new(Reconciler::new(
        SyncConfig::from(&config),
        Arc::clone(&book),
        remote,
        Arc::clone(&notices),
    ));

    if config.sync_enabled {
        let (report_tx, mut report_rx) = mpsc::unbounded_channel();
        let _sync_handle =
            sync::spawn_sync_ticker(Arc::clone(&reconciler), config.sync_interval, report_tx);
        eprintln!("   Sync: every {}s", config.sync_interval.as_secs());

        // Redisplay the filtered list after each background sync.
        tokio::spawn(async move {
            while let Some(report) = report_rx.recv().await {
                println!();
                for line in report.view.render() {
                    println!("{line}");
                }
                eprint!("> ");
            }
        });
    } else {
        eprintln!("   Sync: disabled");
    }

    // Print notices as they appear.
    let mut notice_rx = notices.subscribe();
    tokio::spawn(async move {
        loop {
            match notice_rx.recv().await {
                Ok(NoticeEvent::Posted(notice)) => eprintln!("\n*** {} ***", notice.message),
                Ok(NoticeEvent::Dismissed { .. }) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut book_rx = book.subscribe();
    tokio::spawn(async move {
        loop {
            match book_rx.recv().await {
                Ok(BookEvent::QuotesChanged { total, categories }) => {
                    tracing::debug!(total, categories = ?categories, "Quote collection changed");
                }
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    });

    eprintln!("   Type 'help' for commands.\n");

    let session = Session {
        book: Arc::clone(&book),
        reconciler,
        notices,
        export_dir: config.export_dir.clone(),
    };

    // Restore the last filter on startup.
    for line in book.current_view().await.render() {
        println!("{line}");
    }

    session.run().await;
    Ok(())
}
