use anyhow::Result;
use clap::ValueEnum;
use comfy_table::Cell;
use lrcat_core::domain::CollectionKind;
use lrcat_core::Library;

use super::images::print_images;
use super::{forest, heading, or_dash, table};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Standard,
    Smart,
    Set,
}

impl From<KindArg> for CollectionKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Standard => CollectionKind::Standard,
            KindArg::Smart => CollectionKind::Smart,
            KindArg::Set => CollectionKind::Group,
        }
    }
}

pub(crate) fn kind_name(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Standard => "collection",
        CollectionKind::Smart => "smart",
        CollectionKind::Group => "set",
    }
}

pub fn list(library: &Library) -> Result<()> {
    let collections = library.catalog().list_collections()?;
    if collections.is_empty() {
        println!("No collections.");
        return Ok(());
    }

    let mut t = table(&["ID", "Name", "Kind", "Images"]);
    for (c, depth) in forest(&collections, |c| c.id, |c| c.parent_id) {
        t.add_row(vec![
            Cell::new(c.id),
            Cell::new(format!("{}{}", "  ".repeat(depth), c.name)),
            Cell::new(kind_name(c.kind)),
            Cell::new(or_dash(c.image_count)),
        ]);
    }
    println!("{t}");
    Ok(())
}

pub fn add(library: &mut Library, path: &str, kind: KindArg) -> Result<()> {
    let collection = library
        .catalog_mut()
        .create_collection_path(path, kind.into())?;
    println!(
        "Collection #{} ({}): {}",
        collection.id,
        kind_name(collection.kind),
        path
    );
    Ok(())
}

pub fn put(library: &mut Library, collection: i64, images: &[i64]) -> Result<()> {
    let catalog = library.catalog_mut();
    let mut added = 0;
    for &image in images {
        if catalog.add_image_to_collection(collection, image)? {
            added += 1;
        }
    }
    let total = catalog.collection(collection)?.image_count.unwrap_or(0);
    println!("Added {added} images to collection #{collection} ({total} total)");
    Ok(())
}

pub fn rm(library: &mut Library, collection: i64, image: i64) -> Result<()> {
    if library
        .catalog_mut()
        .remove_image_from_collection(collection, image)?
    {
        println!("Removed image #{image} from collection #{collection}");
    } else {
        println!("Image #{image} was not in collection #{collection}");
    }
    Ok(())
}

pub fn show(library: &Library, id: i64) -> Result<()> {
    let catalog = library.catalog();
    let collection = catalog.collection(id)?;
    let mut trail: Vec<String> = catalog
        .collection_ancestors(id)?
        .into_iter()
        .rev()
        .map(|c| c.name)
        .collect();
    trail.push(collection.name.clone());

    heading(&format!("{} (#{})", trail.join(" / "), collection.id));
    println!("  Kind:   {}", kind_name(collection.kind));
    println!("  Images: {}", or_dash(collection.image_count));
    if collection.kind != CollectionKind::Group {
        let images = catalog.collection_images(id)?;
        if !images.is_empty() {
            print_images(library, &images)?;
        }
    }
    println!();
    Ok(())
}

pub fn delete(library: &mut Library, id: i64) -> Result<()> {
    let removed = library.catalog_mut().delete_collection(id)?;
    println!("Deleted {removed} collections");
    Ok(())
}
