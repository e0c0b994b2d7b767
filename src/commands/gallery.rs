//! Gallery viewing and export for cruisesim
//!
//! This module renders the ship gallery as a table, inspects individual
//! ships and writes their images to disk. Images arrive as base64 data URIs
//! from the provider.

use crate::error::{CruiseSimError, Result};
use crate::session::GeneratedShip;
use base64::Engine;
use colored::Colorize;
use prettytable::{format, row, Table};
use std::path::{Path, PathBuf};

/// Longest description excerpt shown in the gallery table, in characters
const EXCERPT_CHARS: usize = 60;

/// One gallery table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryRow {
    /// 1-based position, newest first
    pub index: usize,
    pub name: String,
    /// Creation time formatted for display
    pub created: String,
    pub excerpt: String,
}

/// Builds table rows for the gallery
///
/// # Examples
///
/// ```
/// use cruisesim::commands::gallery::list_rows;
/// use cruisesim::session::GeneratedShip;
///
/// let ships = vec![GeneratedShip::new(
///     ulid::Ulid::new(),
///     "SS Party Boat",
///     "A floating disco",
///     "data:image/png;base64,AAAA",
/// )];
/// let rows = list_rows(&ships);
/// assert_eq!(rows[0].index, 1);
/// assert_eq!(rows[0].excerpt, "A floating disco");
/// ```
pub fn list_rows(ships: &[GeneratedShip]) -> Vec<GalleryRow> {
    ships
        .iter()
        .enumerate()
        .map(|(i, ship)| GalleryRow {
            index: i + 1,
            name: ship.name.clone(),
            created: ship
                .created_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            excerpt: excerpt(&ship.description),
        })
        .collect()
}

fn excerpt(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > EXCERPT_CHARS {
        let cut: String = flat.chars().take(EXCERPT_CHARS).collect();
        format!("{}…", cut.trim_end())
    } else {
        flat
    }
}

/// Prints the gallery table
pub fn print_gallery(ships: &[GeneratedShip]) {
    if ships.is_empty() {
        println!(
            "{}",
            "No ships launched yet. Ask the captain to build one!".yellow()
        );
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row!["#".bold(), "Name".bold(), "Launched".bold(), "Description".bold()]);

    for gallery_row in list_rows(ships) {
        table.add_row(row![
            gallery_row.index,
            gallery_row.name.cyan(),
            gallery_row.created,
            gallery_row.excerpt
        ]);
    }

    println!("\nShip Gallery ({} ships):", ships.len());
    table.printstd();
    println!();
}

/// Splits a `data:<mime>;base64,<data>` URI into MIME type and bytes
///
/// # Errors
///
/// Returns `Gallery` for anything that is not a base64 data URI, and
/// `Base64` when the payload does not decode
///
/// # Examples
///
/// ```
/// use cruisesim::commands::gallery::decode_image_url;
///
/// let (mime, bytes) = decode_image_url("data:image/png;base64,AQID").unwrap();
/// assert_eq!(mime, "image/png");
/// assert_eq!(bytes, vec![1, 2, 3]);
/// assert!(decode_image_url("https://example.com/ship.png").is_err());
/// ```
pub fn decode_image_url(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:").ok_or_else(|| {
        CruiseSimError::Gallery("only inline data URIs can be decoded".to_string())
    })?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CruiseSimError::Gallery("data URI has no payload".to_string()))?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| CruiseSimError::Gallery("data URI is not base64-encoded".to_string()))?;
    if mime.is_empty() {
        return Err(CruiseSimError::Gallery("data URI has no MIME type".to_string()).into());
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(CruiseSimError::from)?;

    Ok((mime.to_string(), bytes))
}

/// Width and height of an encoded image
///
/// # Errors
///
/// Returns `Image` when the bytes are not a supported image format
pub fn image_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let image = image::load_from_memory(bytes).map_err(CruiseSimError::from)?;
    Ok((image.width(), image.height()))
}

/// File extension for an image MIME type
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

/// Lowercase, dash-separated file name stem for a ship name
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "ship".to_string()
    } else {
        slug.to_string()
    }
}

/// Writes a ship's image into `dir`
///
/// The file is named `<slug-of-name>-<id>.<ext>`, so saving the same ship
/// twice overwrites the earlier copy.
///
/// # Arguments
///
/// * `ship` - Gallery entry whose image should be written
/// * `dir` - Target directory, created if missing
///
/// # Returns
///
/// Returns the path of the written file
///
/// # Errors
///
/// Returns error if the image URI cannot be decoded or the file cannot be
/// written
pub fn save_ship_image(ship: &GeneratedShip, dir: &Path) -> Result<PathBuf> {
    let (mime, bytes) = decode_image_url(&ship.image_url)?;

    std::fs::create_dir_all(dir).map_err(CruiseSimError::from)?;
    let path = dir.join(format!(
        "{}-{}.{}",
        slugify(&ship.name),
        ship.id,
        extension_for_mime(&mime)
    ));
    std::fs::write(&path, &bytes).map_err(CruiseSimError::from)?;

    tracing::info!("Saved {} ({} bytes) to {}", ship.name, bytes.len(), path.display());
    Ok(path)
}

/// Prints name, description, creation time and image details for a ship
pub fn print_ship_details(ship: &GeneratedShip) {
    println!();
    println!("{}", ship.name.cyan().bold());
    println!(
        "Launched: {}",
        ship.created_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
    );

    match decode_image_url(&ship.image_url) {
        Ok((mime, bytes)) => {
            let dimensions = match image_dimensions(&bytes) {
                Ok((w, h)) => format!("{}x{}", w, h),
                Err(e) => {
                    tracing::warn!("Could not read dimensions of {}: {}", ship.name, e);
                    "unknown".to_string()
                }
            };
            println!("Image: {} {} ({} bytes)", mime, dimensions, bytes.len());
        }
        Err(_) => println!("Image: {}", ship.image_url),
    }

    println!();
    println!("{}", ship.description);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{tiny_png_data_uri, TINY_PNG_BASE64};
    use tempfile::TempDir;
    use ulid::Ulid;

    fn ship(name: &str, description: &str, image_url: &str) -> GeneratedShip {
        GeneratedShip::new(Ulid::new(), name, description, image_url)
    }

    #[test]
    fn test_list_rows_numbers_from_one() {
        let ships = vec![
            ship("SS Second", "b", "data:image/png;base64,AA=="),
            ship("SS First", "a", "data:image/png;base64,AA=="),
        ];
        let rows = list_rows(&ships);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].name, "SS Second");
        assert_eq!(rows[1].index, 2);
    }

    #[test]
    fn test_excerpt_truncates_long_descriptions() {
        let long = "word ".repeat(40);
        let rows = list_rows(&[ship("SS Long", &long, "")]);
        assert!(rows[0].excerpt.ends_with('…'));
        assert!(rows[0].excerpt.chars().count() <= EXCERPT_CHARS + 1);
    }

    #[test]
    fn test_excerpt_flattens_newlines() {
        assert_eq!(excerpt("Deck one\n\nDeck two"), "Deck one Deck two");
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        let text = "é".repeat(EXCERPT_CHARS);
        assert_eq!(excerpt(&text), text);
    }

    #[test]
    fn test_decode_image_url() {
        let (mime, bytes) = decode_image_url(&tiny_png_data_uri()).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_decode_rejects_remote_urls() {
        let err = decode_image_url("https://example.com/ship.png").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CruiseSimError>(),
            Some(CruiseSimError::Gallery(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_base64_data_uri() {
        assert!(decode_image_url("data:text/plain,hello").is_err());
        assert!(decode_image_url("data:;base64,AAAA").is_err());
        assert!(decode_image_url("data:image/png;base64").is_err());
    }

    #[test]
    fn test_decode_bad_payload_is_base64_error() {
        let err = decode_image_url("data:image/png;base64,%%%").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CruiseSimError>(),
            Some(CruiseSimError::Base64(_))
        ));
    }

    #[test]
    fn test_image_dimensions() {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(TINY_PNG_BASE64)
            .unwrap();
        assert_eq!(image_dimensions(&bytes).unwrap(), (1, 1));
        assert!(image_dimensions(b"not an image").is_err());
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("image/png"), "png");
        assert_eq!(extension_for_mime("image/JPEG"), "jpg");
        assert_eq!(extension_for_mime("image/webp"), "webp");
        assert_eq!(extension_for_mime("application/octet-stream"), "png");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("SS Futuristic Neon Cruise"), "ss-futuristic-neon-cruise");
        assert_eq!(slugify("MS Ship_2000!"), "ms-ship-2000");
        assert_eq!(slugify("!!!"), "ship");
    }

    #[test]
    fn test_save_ship_image_writes_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested");
        let ship = ship("SS Party Boat", "fun", &tiny_png_data_uri());

        let path = save_ship_image(&ship, &target).unwrap();

        assert!(path.starts_with(&target));
        let file_name = path.file_name().unwrap().to_str().unwrap();
        assert_eq!(file_name, format!("ss-party-boat-{}.png", ship.id));
        let written = std::fs::read(&path).unwrap();
        assert_eq!(image_dimensions(&written).unwrap(), (1, 1));
    }

    #[test]
    fn test_save_ship_image_uses_mime_extension() {
        let dir = TempDir::new().unwrap();
        let ship = ship("MS Liner", "", "data:image/jpeg;base64,AAAA");
        let path = save_ship_image(&ship, dir.path()).unwrap();
        assert_eq!(path.extension().unwrap(), "jpg");
    }

    #[test]
    fn test_save_ship_image_rejects_remote_url() {
        let dir = TempDir::new().unwrap();
        let ship = ship("SS Remote", "", "https://example.com/x.png");
        assert!(save_ship_image(&ship, dir.path()).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
