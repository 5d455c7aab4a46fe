//! Reading and writing normalized label files.
//!
//! One box per line: `class_id x_center y_center width height`, coordinates
//! normalized to the image size.

use crate::error::{CurationError, Result};
use crate::geometry::{to_normalized_box, to_pixel_box};
use crate::types::{BoundingBox, NormalizedBox};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

/// Label file name belonging to an image (`photo_12.jpg` → `photo_12.txt`).
pub fn label_file_name(image_file: &str) -> String {
    let stem = Path::new(image_file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(image_file);
    format!("{stem}.txt")
}

/// Parse one label line into its normalized box.
///
/// The class id is read as a number and truncated, matching label files that
/// write it as `0.0`. Center and size must lie in `[0, 1]`.
pub fn parse_normalized_line(line: &str) -> std::result::Result<NormalizedBox, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(format!("expected 5 fields, got {}", fields.len()));
    }

    let mut values = [0.0f64; 5];
    for (value, field) in values.iter_mut().zip(&fields) {
        *value = field
            .parse::<f64>()
            .map_err(|_| format!("'{field}' is not a number"))?;
        if !value.is_finite() {
            return Err(format!("'{field}' is not finite"));
        }
    }

    let [class_id, x_center, y_center, width, height] = values;
    for (name, value) in [
        ("x_center", x_center),
        ("y_center", y_center),
        ("width", width),
        ("height", height),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("{name} {value} outside [0, 1]"));
        }
    }
    if class_id < 0.0 || class_id >= f64::from(u32::MAX) {
        return Err(format!("class id {class_id} out of range"));
    }

    Ok(NormalizedBox::new(
        class_id as u32,
        x_center,
        y_center,
        width,
        height,
    ))
}

/// Parse one label line straight into pixel coordinates.
pub fn parse_label_line(
    line: &str,
    width: u32,
    height: u32,
) -> std::result::Result<BoundingBox, String> {
    parse_normalized_line(line).map(|normalized| to_pixel_box(&normalized, width, height))
}

/// Load every box of a label file in pixel coordinates.
///
/// # Returns
///
/// `Ok(None)` when the file does not exist, otherwise the boxes in line
/// order. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`CurationError::MalformedLabel`] for the first line that cannot
/// be parsed, and an I/O error for any other read failure.
pub fn load_labels<P: AsRef<Path>>(
    path: P,
    width: u32,
    height: u32,
) -> Result<Option<Vec<BoundingBox>>> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut boxes = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let bbox = parse_label_line(&line, width, height).map_err(|reason| {
            CurationError::MalformedLabel {
                path: path.to_path_buf(),
                line: index + 1,
                reason,
            }
        })?;
        boxes.push(bbox);
    }

    Ok(Some(boxes))
}

/// Format a box as a label line (without the trailing newline).
pub fn format_label_line(bbox: &BoundingBox, width: u32, height: u32) -> String {
    let n = to_normalized_box(bbox, width, height);
    format!(
        "{} {:.6} {:.6} {:.6} {:.6}",
        n.class_id, n.x_center, n.y_center, n.width, n.height
    )
}

/// Write boxes to a label file, creating parent directories as needed.
pub fn write_label_file<P: AsRef<Path>>(
    path: P,
    boxes: &[BoundingBox],
    width: u32,
    height: u32,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for bbox in boxes {
        writeln!(writer, "{}", format_label_line(bbox, width, height))?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_file_name() {
        assert_eq!(label_file_name("desk_12.jpg"), "desk_12.txt");
        assert_eq!(label_file_name("a.b_3.png"), "a.b_3.txt");
        assert_eq!(label_file_name("noext"), "noext.txt");
    }

    #[test]
    fn test_parse_label_line() {
        let bbox = parse_label_line("0 0.5 0.5 0.5 0.5", 100, 80).unwrap();
        assert_eq!(bbox, BoundingBox::new(0, 25, 20, 75, 60));

        let bbox = parse_label_line("2.0   0.5 0.5 1.0 1.0\n", 10, 10).unwrap();
        assert_eq!(bbox.class_id, 2);
    }

    #[test]
    fn test_parse_label_line_errors() {
        assert!(parse_label_line("0 0.5 0.5 0.5", 100, 100).is_err());
        assert!(parse_label_line("0 0.5 0.5 0.5 0.5 0.9", 100, 100).is_err());
        assert!(parse_label_line("cat 0.5 0.5 0.5 0.5", 100, 100).is_err());
        assert!(parse_label_line("-1 0.5 0.5 0.5 0.5", 100, 100).is_err());
        assert!(parse_label_line("0 nan 0.5 0.5 0.5", 100, 100).is_err());
        assert!(parse_label_line("0 0 0 1e12 1e12", 100, 100).is_err());
        assert!(parse_label_line("0 -0.1 0.5 0.5 0.5", 100, 100).is_err());
        assert!(parse_label_line("0 0.5 0.5 1.5 0.5", 100, 100).is_err());
        assert!(parse_label_line("0 0 1 1 0", 100, 100).is_ok());
    }

    #[test]
    fn test_format_label_line() {
        let line = format_label_line(&BoundingBox::new(1, 25, 20, 75, 60), 100, 80);
        assert_eq!(line, "1 0.500000 0.500000 0.500000 0.500000");
    }
}
