use anyhow::{bail, Result};
use clap::ValueEnum;
use comfy_table::Cell;
use lrcat_core::domain::{ColorLabel, Image, Pick};
use lrcat_core::timestamp::format_capture_time;
use lrcat_core::Library;

use super::{heading, or_dash, table};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PickArg {
    Reject,
    None,
    Pick,
}

impl From<PickArg> for Pick {
    fn from(arg: PickArg) -> Self {
        match arg {
            PickArg::Reject => Pick::Rejected,
            PickArg::None => Pick::Unflagged,
            PickArg::Pick => Pick::Picked,
        }
    }
}

pub(crate) fn stars(rating: Option<u8>) -> String {
    match rating {
        Some(r) if r > 0 => "★".repeat(r as usize),
        _ => "-".to_string(),
    }
}

fn pick_symbol(pick: Pick) -> &'static str {
    match pick {
        Pick::Rejected => "✗",
        Pick::Unflagged => "",
        Pick::Picked => "⚑",
    }
}

/// Parse a label argument; an empty string clears the label.
pub(crate) fn parse_label(label: Option<&str>) -> Result<Option<ColorLabel>> {
    match label {
        None | Some("") => Ok(None),
        Some(s) => match ColorLabel::parse(s) {
            Some(l) => Ok(Some(l)),
            None => bail!("unknown color label {s:?} (red, yellow, green, blue, purple)"),
        },
    }
}

pub(crate) fn print_images(library: &Library, images: &[Image]) -> Result<()> {
    let catalog = library.catalog();
    let mut t = table(&["ID", "Path", "Captured", "Format", "Rating", "Label", "Pick"]);
    for image in images {
        t.add_row(vec![
            Cell::new(image.id),
            Cell::new(catalog.image_path(image.id)?),
            Cell::new(or_dash(image.capture_time.map(format_capture_time))),
            Cell::new(image.file_format),
            Cell::new(stars(image.rating)),
            Cell::new(or_dash(image.color_label)),
            Cell::new(pick_symbol(image.pick)),
        ]);
    }
    println!("{t}");
    Ok(())
}

pub fn list(library: &Library, keyword: Option<i64>, collection: Option<i64>) -> Result<()> {
    let catalog = library.catalog();
    let images = match (keyword, collection) {
        (Some(k), _) => catalog.keyword_images(k)?,
        (None, Some(c)) => catalog.collection_images(c)?,
        (None, None) => catalog.list_images()?,
    };
    if images.is_empty() {
        println!("No images.");
        return Ok(());
    }
    print_images(library, &images)?;
    println!("  {} images", images.len());
    Ok(())
}

pub fn show(library: &Library, id: i64) -> Result<()> {
    let catalog = library.catalog();
    let image = catalog.image(id)?;
    let file = catalog.image_file(id)?;

    heading(&format!("Image #{}", image.id));
    println!("  Path:      {}", catalog.image_path(id)?);
    println!("  Original:  {}", file.original_filename);
    println!("  Format:    {}", image.file_format);
    println!(
        "  Captured:  {}",
        or_dash(image.capture_time.map(format_capture_time))
    );
    println!("  Rating:    {}", stars(image.rating));
    println!("  Label:     {}", or_dash(image.color_label));
    println!("  Pick:      {:?}", image.pick);
    if let (Some(w), Some(h)) = (image.width, image.height) {
        println!("  Size:      {w}x{h}");
    }

    let keywords: Vec<String> = catalog
        .image_keywords(id)?
        .into_iter()
        .map(|k| k.name)
        .collect();
    println!("  Keywords:  {}", keywords.join(", "));
    let collections: Vec<String> = catalog
        .image_collections(id)?
        .into_iter()
        .map(|c| c.name)
        .collect();
    println!("  In:        {}", collections.join(", "));
    println!();
    Ok(())
}

pub fn rate(library: &Library, id: i64, rating: Option<u8>) -> Result<()> {
    library.catalog().set_rating(id, rating)?;
    println!("Image #{id} rating: {}", stars(rating));
    Ok(())
}

pub fn label(library: &Library, id: i64, label: Option<&str>) -> Result<()> {
    let label = parse_label(label)?;
    library.catalog().set_color_label(id, label)?;
    println!("Image #{id} label: {}", or_dash(label));
    Ok(())
}

pub fn pick(library: &Library, id: i64, flag: PickArg) -> Result<()> {
    let pick = Pick::from(flag);
    library.catalog().set_pick(id, pick)?;
    println!("Image #{id} flag: {pick:?}");
    Ok(())
}
