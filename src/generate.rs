//! Static HTML snapshot generation.
//!
//! Activates every configured category through a [`GalleryState`] (one fresh
//! listing each) and writes one page per category:
//!
//! ```text
//! dist/
//! ├── index.html        # default category
//! ├── sport.html
//! └── portrait.html
//! ```
//!
//! ## Markup
//!
//! - **Tabs**: links between category pages; the current one is `.active`
//!   with `aria-selected="true"`.
//! - **Single mode**: `<img>` with `width`/`height` from the metadata table
//!   when known, so the grid does not shift while loading.
//! - **Grouped mode**: `<picture>` with an AVIF `<source>` and a fallback
//!   `<img>`. Preferred-only groups use the AVIF file for both.
//! - **Lightbox**: present but `hidden`; every gallery item carries its
//!   `data-index` for whatever script drives it.
//!
//! Uses [maud](https://maud.lambda.xyz/), so all interpolation is escaped.

use crate::config::GalleryConfig;
use crate::gallery::{GalleryState, Snapshot};
use crate::listing::DirectoryLister;
use crate::resolve::Resolver;
use crate::types::{CategoryKey, ImageRecord};
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One written category page.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub category: CategoryKey,
    pub path: String,
    pub photo_count: usize,
}

#[derive(Debug, Default)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
}

const CSS: &str = include_str!("../static/style.css");

/// Copy of the default category's page.
pub const INDEX_PAGE: &str = "index.html";

/// Page filename for a category: unsafe characters become dashes.
pub fn page_filename(category: &CategoryKey) -> String {
    let slug: String = category
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("{slug}.html")
}

pub fn generate(
    config: &GalleryConfig,
    lister: &impl DirectoryLister,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir)?;

    let mut state = GalleryState::new(Resolver::from_config(config));
    let default_category = config.default_category();
    let mut report = GenerateReport::default();

    for category in config.categories() {
        state.activate(category.clone(), lister);
        let Some(snapshot) = state.current() else {
            continue;
        };
        let page = render_page(config, snapshot).into_string();
        let path = page_filename(&category);
        fs::write(output_dir.join(&path), &page)?;
        log::info!("wrote {path} ({} photos)", snapshot.sequence.len());
        if category == default_category {
            fs::write(output_dir.join(INDEX_PAGE), &page)?;
        }
        report.pages.push(GeneratedPage {
            category,
            path,
            photo_count: snapshot.sequence.len(),
        });
    }

    Ok(report)
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                (content)
            }
        }
    }
}

fn tab_id(category: &CategoryKey) -> String {
    format!("tab-{category}")
}

/// Tab strip; `active` gets the selected state.
pub fn render_tabs(categories: &[CategoryKey], active: &CategoryKey) -> Markup {
    html! {
        nav.tabs role="tablist" {
            @for category in categories {
                @let selected = category == active;
                a.tab.active[selected]
                    id=(tab_id(category))
                    href=(page_filename(category))
                    role="tab"
                    data-tab=(category.as_str())
                    aria-selected=(if selected { "true" } else { "false" }) {
                    (category.as_str())
                }
            }
        }
    }
}

fn image_url(image_root: &str, category: &CategoryKey, filename: &str) -> String {
    let root = image_root.trim_end_matches('/');
    if root.is_empty() {
        format!("{category}/{filename}")
    } else {
        format!("{root}/{category}/{filename}")
    }
}

/// One grid cell.
pub fn render_item(
    image_root: &str,
    category: &CategoryKey,
    index: usize,
    record: &ImageRecord,
) -> Markup {
    let src = record
        .fallback_src()
        .map(|f| image_url(image_root, category, f));
    let dims = record.dimensions();
    html! {
        div.gallery-item data-index=(index) {
            @match record {
                ImageRecord::Single { .. } => {
                    img src=[src]
                        alt=(record.caption())
                        loading="lazy"
                        width=[dims.map(|d| d.width)]
                        height=[dims.map(|d| d.height)];
                }
                ImageRecord::Grouped { .. } => {
                    picture {
                        @if let Some(preferred) = record.preferred_src() {
                            source type="image/avif"
                                srcset=(image_url(image_root, category, preferred));
                        }
                        img src=[src] alt=(record.caption()) loading="lazy";
                    }
                }
            }
        }
    }
}

fn render_lightbox() -> Markup {
    html! {
        div.lightbox role="dialog" aria-modal="true" aria-hidden="true" hidden {
            button.lightbox-close type="button" aria-label="Close" { "×" }
            button.lightbox-prev type="button" aria-label="Previous image" { "‹" }
            img.lightbox-image alt="";
            p.lightbox-caption {}
            button.lightbox-next type="button" aria-label="Next image" { "›" }
        }
    }
}

/// Full page for one committed category.
pub fn render_page(config: &GalleryConfig, snapshot: &Snapshot) -> Markup {
    let category = &snapshot.category;
    let sequence = &snapshot.sequence;
    let content = html! {
        header.site-header {
            h1 { "Gallery" }
            (render_tabs(&config.categories(), category))
        }
        main.gallery role="tabpanel" aria-labelledby=(tab_id(category)) data-count=(sequence.len()) {
            @if sequence.is_empty() {
                p.gallery-empty { "No images in this category." }
            }
            @for (index, record) in sequence.iter().enumerate() {
                (render_item(&config.gallery.image_root, category, index, record))
            }
        }
        (render_lightbox())
    };
    base_document(&format!("Gallery · {category}"), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::ListingError;
    use crate::resolve::{FailurePolicy, ResolveMode};
    use crate::test_helpers::ScriptedLister;
    use crate::types::{Dimensions, ImageSequence};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn two_tab_config() -> GalleryConfig {
        let mut config = GalleryConfig::default();
        config.gallery.categories = vec!["sport".into(), "portrait".into()];
        config.gallery.on_failure = FailurePolicy::Empty;
        config
    }

    fn snapshot(config: &GalleryConfig, category: &str, files: &[&str]) -> Snapshot {
        let listing: Vec<String> = files.iter().map(|f| f.to_string()).collect();
        Snapshot {
            category: CategoryKey::new(category),
            sequence: Arc::new(Resolver::from_config(config).resolve(&listing)),
        }
    }

    #[test]
    fn page_filename_sanitizes() {
        assert_eq!(page_filename(&CategoryKey::new("sport")), "sport.html");
        assert_eq!(page_filename(&CategoryKey::new("black & white")), "black---white.html");
    }

    #[test]
    fn image_url_joins_parts() {
        let cat = CategoryKey::new("sport");
        assert_eq!(image_url("assets/images/", &cat, "a.jpg"), "assets/images/sport/a.jpg");
        assert_eq!(image_url("", &cat, "a.jpg"), "sport/a.jpg");
    }

    #[test]
    fn tabs_mark_active() {
        let cats = vec![CategoryKey::new("sport"), CategoryKey::new("portrait")];
        let html = render_tabs(&cats, &CategoryKey::new("portrait")).into_string();
        assert_eq!(html.matches(r#"class="tab active""#).count(), 1);
        assert_eq!(html.matches(r#"aria-selected="true""#).count(), 1);
        assert!(html.contains(r#"href="sport.html""#));
        assert!(html.contains(r#"data-tab="portrait""#));
    }

    #[test]
    fn single_item_has_known_dimensions() {
        let mut config = two_tab_config();
        config.metadata.insert(
            "a.jpg".into(),
            Dimensions {
                width: 2048,
                height: 1538,
            },
        );
        let html = render_page(&config, &snapshot(&config, "sport", &["a.jpg", "b.jpg"])).into_string();
        assert!(html.contains(r#"src="assets/images/sport/a.jpg""#));
        assert!(html.contains(r#"width="2048" height="1538""#));
        assert!(html.contains(r#"data-index="1""#));
        assert!(html.contains(r#"data-count="2""#));
    }

    #[test]
    fn grouped_item_uses_picture() {
        let mut config = two_tab_config();
        config.gallery.mode = ResolveMode::Grouped;
        config.gallery.extensions.push("avif".into());
        let html = render_page(
            &config,
            &snapshot(&config, "sport", &["x.jpg", "x.avif", "only.avif"]),
        )
        .into_string();
        assert!(html.contains(r#"<source type="image/avif" srcset="assets/images/sport/x.avif">"#));
        assert!(html.contains(r#"src="assets/images/sport/x.jpg""#));
        // Preferred-only group falls back to its AVIF.
        assert!(html.contains(r#"src="assets/images/sport/only.avif""#));
    }

    #[test]
    fn empty_sequence_renders_placeholder() {
        let config = two_tab_config();
        let snap = Snapshot {
            category: CategoryKey::new("sport"),
            sequence: Arc::new(ImageSequence::empty()),
        };
        let html = render_page(&config, &snap).into_string();
        assert!(html.contains("No images in this category."));
        assert!(html.contains(r#"aria-labelledby="tab-sport""#));
    }

    #[test]
    fn lightbox_starts_hidden() {
        let html = render_lightbox().into_string();
        assert!(html.contains("hidden"));
        assert!(html.contains("lightbox-image"));
    }

    #[test]
    fn filenames_are_escaped() {
        let config = two_tab_config();
        let html = render_page(&config, &snapshot(&config, "sport", &["<b>.jpg"])).into_string();
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>.jpg"));
    }

    #[test]
    fn generate_writes_page_per_category_and_index() {
        let tmp = TempDir::new().unwrap();
        let lister = ScriptedLister::new()
            .with("sport", &["b.jpg", "a.jpg"])
            .failing("portrait", ListingError::Api { status: 403 });

        let report = generate(&two_tab_config(), &lister, tmp.path()).unwrap();

        assert_eq!(lister.calls(), vec!["sport", "portrait"]);
        assert_eq!(report.pages.len(), 2);
        assert_eq!(report.pages[0].photo_count, 2);
        assert_eq!(report.pages[1].photo_count, 0);
        assert!(tmp.path().join("sport.html").exists());
        assert!(tmp.path().join("portrait.html").exists());

        let index = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        let sport = fs::read_to_string(tmp.path().join("sport.html")).unwrap();
        assert_eq!(index, sport);
    }
}
