use anyhow::{Context, Result};
use arboard::Clipboard;

use crate::models::Repository;

/// Trait for clipboard operations (allows mocking in tests)
trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Real clipboard implementation using arboard
struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")?;
        Ok(())
    }
}

/// Which link of a repository to copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryLink {
    /// The repository's GitHub page
    Page,
    /// The HTTPS clone URL
    Clone,
}

impl RepositoryLink {
    pub fn label(self) -> &'static str {
        match self {
            RepositoryLink::Page => "Repository URL",
            RepositoryLink::Clone => "Clone URL",
        }
    }

    /// Resolve the link text. Falls back to `{html_url}.git` when the API omitted `clone_url`.
    pub fn resolve(self, repository: &Repository) -> String {
        match self {
            RepositoryLink::Page => repository.html_url.clone(),
            RepositoryLink::Clone if !repository.clone_url.is_empty() => {
                repository.clone_url.clone()
            }
            RepositoryLink::Clone => format!("{}.git", repository.html_url),
        }
    }
}

fn copy_link_with_provider(
    repository: &Repository,
    link: RepositoryLink,
    provider: &mut dyn ClipboardProvider,
) -> Result<String> {
    let text = link.resolve(repository);
    if text.trim().is_empty() {
        anyhow::bail!("{} is empty for {}", link.label(), repository.full_name);
    }

    provider.set_text(&text)?;
    Ok(text)
}

/// Copy a repository link to the system clipboard as plain text.
///
/// # Returns
/// The copied text.
///
/// # Errors
/// Returns error if:
/// - The repository has no URL of the requested kind
/// - Clipboard is locked by another process or access is denied
/// - System clipboard is unavailable (headless environment)
pub fn copy_repository_link(repository: &Repository, link: RepositoryLink) -> Result<String> {
    let mut clipboard = SystemClipboard::new()?;
    copy_link_with_provider(repository, link, &mut clipboard)
}
