//! Bookmark command handlers

use anyhow::{anyhow, bail, Context, Result};
use uuid::Uuid;

use favsites_core::{PreviewLookup, Store};

use crate::output::{Output, PageInfo};
use crate::prompt::{confirm, is_interactive, prompt_with_default};

/// Add a new bookmark
pub async fn add(
    store: &mut Store,
    name: String,
    link: String,
    lookup: &dyn PreviewLookup,
    output: &Output,
) -> Result<()> {
    let bookmark = store
        .add(&name, &link, lookup)
        .await
        .context("Failed to add bookmark")?;

    output.success(&format!("Added bookmark: {}", bookmark.id));
    output.print_bookmark(&bookmark);

    Ok(())
}

/// List one page of bookmarks
pub fn list(store: &Store, page: Option<usize>, output: &Output) -> Result<()> {
    let page_size = store.config().page_size;
    let page = page.unwrap_or(1).max(1);

    let info = PageInfo {
        page,
        total_pages: store.total_pages(page_size),
        total: store.len(),
    };
    output.print_page(store.page(page, page_size), &info);

    Ok(())
}

/// Show a single bookmark
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let uuid = resolve_id(&id, store)?;

    let bookmark = store
        .get(uuid)
        .ok_or_else(|| anyhow!("Bookmark not found: {}", id))?;

    output.print_bookmark(bookmark);
    Ok(())
}

/// Edit a bookmark's name and link
///
/// Values not given on the command line are prompted for (current value as
/// default) when running interactively, and kept otherwise.
pub async fn edit(
    store: &mut Store,
    id: String,
    name: Option<String>,
    link: Option<String>,
    lookup: &dyn PreviewLookup,
    output: &Output,
) -> Result<()> {
    let uuid = resolve_id(&id, store)?;

    let current = store
        .get(uuid)
        .cloned()
        .ok_or_else(|| anyhow!("Bookmark not found: {}", id))?;

    let interactive = output.should_prompt() && is_interactive();
    if name.is_none() && link.is_none() && !interactive {
        bail!("Nothing to change. Pass --name and/or --link.");
    }

    if interactive && (name.is_none() || link.is_none()) {
        println!("Editing bookmark: {}", current.id);
        println!("Press Enter to keep current value, or type new value.\n");
    }

    let name = match name {
        Some(name) => name,
        None if interactive => prompt_with_default("Name", &current.name)?,
        None => current.name.clone(),
    };
    let link = match link {
        Some(link) => link,
        None if interactive => prompt_with_default("Link", &current.link)?,
        None => current.link.clone(),
    };

    let bookmark = store
        .edit(uuid, &name, &link, lookup)
        .await
        .context("Failed to update bookmark")?;

    output.success("Bookmark updated");
    output.print_bookmark(&bookmark);

    Ok(())
}

/// Delete a bookmark after confirmation
///
/// `--yes` skips the prompt. Without it, JSON and quiet modes refuse since
/// they cannot ask.
pub fn delete(store: &mut Store, id: String, yes: bool, output: &Output) -> Result<()> {
    let uuid = resolve_id(&id, store)?;

    let bookmark = store
        .get(uuid)
        .ok_or_else(|| anyhow!("Bookmark not found: {}", id))?;

    if !yes {
        if !output.should_prompt() {
            bail!("Refusing to delete without confirmation. Pass --yes.");
        }
        println!("Delete bookmark: {} - {}", bookmark.short_id(), bookmark.name);
        if !confirm("Are you sure you wish to delete this item?")? {
            output.message("Cancelled.");
            return Ok(());
        }
    }

    store.delete(uuid).context("Failed to delete bookmark")?;

    output.success(&format!("Deleted bookmark: {}", uuid));

    Ok(())
}

/// Parse a bookmark ID (supports full UUID or prefix)
fn resolve_id(id: &str, store: &Store) -> Result<Uuid> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    let matches = store.find_by_prefix(id);

    match matches.len() {
        0 => bail!("No bookmark found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple bookmarks match '{}':", id);
            for bookmark in &matches {
                eprintln!("  {} - {}", bookmark.id, bookmark.name);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use favsites_core::{Config, NoPreview};
    use tempfile::TempDir;

    fn test_store() -> (Store, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        let store = Store::open_with_config(config).unwrap();
        (store, temp_dir)
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[tokio::test]
    async fn test_add_and_resolve_prefix() {
        let (mut store, _dir) = test_store();
        add(
            &mut store,
            "Rust".into(),
            "https://rust-lang.org".into(),
            &NoPreview,
            &quiet(),
        )
        .await
        .unwrap();

        let id = store.bookmarks()[0].id;
        let prefix = id.to_string()[..6].to_string();
        assert_eq!(resolve_id(&prefix, &store).unwrap(), id);
        assert_eq!(resolve_id(&id.to_string(), &store).unwrap(), id);
        assert!(resolve_id("zzzz", &store).is_err());
    }

    #[tokio::test]
    async fn test_add_rejects_empty_fields() {
        let (mut store, _dir) = test_store();
        let result = add(&mut store, " ".into(), "".into(), &NoPreview, &quiet()).await;
        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_edit_keeps_missing_values() {
        let (mut store, _dir) = test_store();
        let original = store
            .add("Rust", "https://rust-lang.org", &NoPreview)
            .await
            .unwrap();

        edit(
            &mut store,
            original.id.to_string(),
            Some("Rust Lang".into()),
            None,
            &NoPreview,
            &quiet(),
        )
        .await
        .unwrap();

        let updated = store.get(original.id).unwrap();
        assert_eq!(updated.name, "Rust Lang");
        assert_eq!(updated.link, "https://rust-lang.org");
    }

    #[tokio::test]
    async fn test_edit_without_changes_fails_non_interactive() {
        let (mut store, _dir) = test_store();
        let original = store.add("A", "http://a", &NoPreview).await.unwrap();

        let result = edit(
            &mut store,
            original.id.to_string(),
            None,
            None,
            &NoPreview,
            &quiet(),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_requires_yes_outside_human_mode() {
        let (mut store, _dir) = test_store();
        let bookmark = store.add("A", "http://a", &NoPreview).await.unwrap();

        assert!(delete(&mut store, bookmark.id.to_string(), false, &quiet()).is_err());
        assert_eq!(store.len(), 1);

        delete(&mut store, bookmark.id.to_string(), true, &quiet()).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_list_past_last_page() {
        let (store, _dir) = test_store();
        assert!(list(&store, Some(5), &quiet()).is_ok());
    }
}
