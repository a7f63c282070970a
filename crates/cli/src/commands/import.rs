use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use lrcat_core::{ImportProgress, Library};

fn active_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::with_template(
        "  {bar:30.cyan/blue} {spinner:.green} {pos:>5}/{len:<5} {prefix:.dim} {msg}",
    )?
    .progress_chars("━╸─"))
}

fn done_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::with_template("  {bar:30.green} {prefix:.green} {msg:.dim}")?)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

pub(crate) fn summary_line(imported: usize, skipped: usize) -> String {
    match (imported, skipped) {
        (0, 0) => "No supported images found".to_string(),
        (0, s) => format!("Nothing new ({s} already cataloged)"),
        (i, 0) => format!("Imported {i} images"),
        (i, s) => format!("Imported {i} images, skipped {s} already cataloged"),
    }
}

pub fn run(library: &mut Library, dir: &Path, recursive: bool) -> Result<()> {
    let active = active_style()?;
    let done = done_style()?;
    let mut bar: Option<ProgressBar> = None;

    println!();
    let summary = library.import_directory(
        dir,
        recursive,
        Some(&mut |progress| match progress {
            ImportProgress::Scanned {
                directory,
                file_count,
            } => {
                println!(
                    "  Importing {} ({} files)",
                    directory.display(),
                    file_count
                );
                let pb = ProgressBar::new(file_count as u64);
                pb.set_style(active.clone());
                pb.set_prefix("Cataloging");
                pb.enable_steady_tick(Duration::from_millis(80));
                bar = Some(pb);
            }
            ImportProgress::Skipped { path } | ImportProgress::Imported { path, .. } => {
                if let Some(ref pb) = bar {
                    pb.set_message(display_name(&path));
                    pb.inc(1);
                }
            }
        }),
    );

    // close the bar before the error is printed
    let summary = match summary {
        Ok(summary) => summary,
        Err(e) => {
            if let Some(pb) = bar.take() {
                pb.abandon();
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        dir = %dir.display(),
        recursive,
        imported = summary.images.len(),
        skipped = summary.skipped,
        "import command finished"
    );
    let line = summary_line(summary.images.len(), summary.skipped);
    if let Some(pb) = bar.take() {
        pb.set_style(done);
        pb.set_prefix("done");
        pb.finish_with_message(line);
    } else {
        println!("  {line}");
    }
    if let Some(session) = &summary.session {
        println!("  Import session #{}", session.id);
    }
    println!();
    Ok(())
}
