use std::path::Path;

use anyhow::{Context, Result};
use lrcat_core::timestamp::format_capture_time;
use lrcat_core::{xmp, Library};

pub fn show(library: &Library, image: i64) -> Result<()> {
    let text = library.catalog().xmp(image)?;
    if text.is_empty() {
        println!("Image #{image} has no XMP metadata.");
    } else {
        println!("{text}");
    }
    Ok(())
}

pub fn set(library: &Library, image: i64, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    library.catalog().set_xmp(image, &text)?;
    println!("Stored {} bytes of XMP on image #{image}", text.len());
    Ok(())
}

pub fn basic(library: &Library, image: i64) -> Result<()> {
    let catalog = library.catalog();
    let record = catalog.image(image)?;
    let capture_time = record.capture_time.map(format_capture_time);
    let packet = xmp::generate_basic(record.rating, record.color_label, capture_time.as_deref());
    catalog.set_xmp(image, &packet)?;
    println!("Generated XMP for image #{image}");
    Ok(())
}
