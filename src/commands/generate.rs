//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::content::LoadReport;
use crate::generator::{Generator, ROBOTS_OVERRIDE};
use crate::{Folio, CONFIG_FILE};

/// Load every post and regenerate the whole site.
///
/// Broken posts are logged and left out; the returned report lists them.
pub fn run(folio: &Folio) -> Result<LoadReport> {
    let start = Instant::now();

    let report = folio.load_posts()?;
    for err in &report.errors {
        tracing::warn!("Skipping {}", err);
    }

    let generator = Generator::new(folio)?;
    let written = generator.generate(&report.posts)?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} files from {} posts in {:.2}s",
        written,
        report.posts.len(),
        duration.as_secs_f64()
    );

    Ok(report)
}

/// Watch the posts, layouts and config for changes and regenerate.
///
/// Each rebuild reloads the configuration and every post from scratch.
pub fn watch(folio: &Folio) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(&folio.posts_dir, notify::RecursiveMode::NonRecursive)?;

    if folio.template_dir.exists() {
        watcher.watch(&folio.template_dir, notify::RecursiveMode::NonRecursive)?;
    }

    for path in [folio.base_dir.join(CONFIG_FILE), folio.base_dir.join(ROBOTS_OVERRIDE)] {
        if path.exists() {
            watcher.watch(&path, notify::RecursiveMode::NonRecursive)?;
        }
    }

    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", folio.posts_dir);

    // Debounce events
    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    let result = Folio::new(&folio.base_dir).and_then(|fresh| run(&fresh));
                    if let Err(e) = result {
                        tracing::error!("Generation failed: {:#}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}
