use anyhow::Result;
use lrcat_core::domain::Keyword;
use lrcat_core::Library;

use super::{forest, heading};

/// Indented lines for a keyword forest, siblings in the given order.
pub(crate) fn tree_lines(keywords: &[Keyword]) -> Vec<String> {
    forest(keywords, |k| k.id, |k| k.parent_id)
        .into_iter()
        .map(|(k, depth)| format!("{}{} (#{})", "  ".repeat(depth), k.name, k.id))
        .collect()
}

pub fn list(library: &Library) -> Result<()> {
    let keywords = library.catalog().list_keywords()?;
    if keywords.is_empty() {
        println!("No keywords.");
        return Ok(());
    }
    heading("Keywords");
    for line in tree_lines(&keywords) {
        println!("  {line}");
    }
    println!();
    Ok(())
}

pub fn add(library: &mut Library, path: &str) -> Result<()> {
    let keyword = library.catalog_mut().create_keyword_path(path)?;
    println!("Keyword #{}: {}", keyword.id, path);
    Ok(())
}

pub fn tag(library: &mut Library, image: i64, path: &str) -> Result<()> {
    let catalog = library.catalog_mut();
    let keyword = catalog.create_keyword_path(path)?;
    if catalog.add_keyword_to_image(image, keyword.id)? {
        println!("Tagged image #{image} with {}", keyword.name);
    } else {
        println!("Image #{image} already tagged with {}", keyword.name);
    }
    Ok(())
}

pub fn untag(library: &Library, image: i64, keyword: i64) -> Result<()> {
    if library.catalog().remove_keyword_from_image(image, keyword)? {
        println!("Removed keyword #{keyword} from image #{image}");
    } else {
        println!("Image #{image} was not tagged with keyword #{keyword}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kw(id: i64, name: &str, parent_id: Option<i64>) -> Keyword {
        Keyword {
            id,
            uuid: String::new(),
            name: name.to_string(),
            lc_name: name.to_lowercase(),
            parent_id,
            genealogy: String::new(),
            include_on_export: true,
        }
    }

    #[test]
    fn test_tree_lines_nests_children() {
        let keywords = vec![
            kw(1, "Animals", None),
            kw(3, "Cats", Some(1)),
            kw(2, "Dogs", Some(1)),
            kw(4, "Labrador", Some(2)),
            kw(5, "Places", None),
        ];
        assert_eq!(
            tree_lines(&keywords),
            vec![
                "Animals (#1)",
                "  Cats (#3)",
                "  Dogs (#2)",
                "    Labrador (#4)",
                "Places (#5)",
            ]
        );
    }

    #[test]
    fn test_tree_lines_orphans_are_top_level() {
        let keywords = vec![kw(7, "Loose", Some(99))];
        assert_eq!(tree_lines(&keywords), vec!["Loose (#7)"]);
    }
}
