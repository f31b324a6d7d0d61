//! Output formatting for CLI
//!
//! Every command prints through `Output` so the three modes stay consistent:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use favsites_core::Bookmark;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - IDs only
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// One page of bookmarks with its position
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Output helper for consistent formatting
pub struct Output {
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single bookmark
    pub fn print_bookmark(&self, bookmark: &Bookmark) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", bookmark.id);
                println!("Name:    {}", bookmark.name);
                println!("Link:    {}", bookmark.link);
                println!(
                    "Preview: {}",
                    bookmark.image.as_deref().unwrap_or("(no preview)")
                );
            }
            OutputFormat::Json => {
                println!("{}", to_json(bookmark));
            }
            OutputFormat::Quiet => {
                println!("{}", bookmark.id);
            }
        }
    }

    /// Print one page of bookmarks
    pub fn print_page(&self, bookmarks: &[Bookmark], info: &PageInfo) {
        match self.format {
            OutputFormat::Human => {
                if info.total == 0 {
                    println!("No bookmarks yet.");
                    return;
                }
                if bookmarks.is_empty() {
                    println!(
                        "Page {} is empty ({} page(s) total).",
                        info.page, info.total_pages
                    );
                    return;
                }
                for bookmark in bookmarks {
                    let preview = if bookmark.has_image() { "*" } else { " " };
                    println!(
                        "{} {} | {} | {}",
                        bookmark.short_id(),
                        preview,
                        truncate(&bookmark.name, 30),
                        truncate(&bookmark.link, 50)
                    );
                }
                println!(
                    "\nPage {} / {} ({} bookmark(s))",
                    info.page, info.total_pages, info.total
                );
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "page": info.page,
                        "total_pages": info.total_pages,
                        "total": info.total,
                        "bookmarks": bookmarks,
                    })
                );
            }
            OutputFormat::Quiet => {
                for bookmark in bookmarks {
                    println!("{}", bookmark.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Truncate a string to `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
