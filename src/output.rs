//! Per-category output: `<root>/<category>/{images,labels}`.

use crate::error::Result;
use crate::labels::{label_file_name, write_label_file};
use crate::types::{BoundingBox, Category};
use std::fs;
use std::path::{Path, PathBuf};

/// Files the categorized images and their payload boxes under a result root.
#[derive(Debug, Clone)]
pub struct CategoryWriter {
    root: PathBuf,
}

impl CategoryWriter {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the copied images of a category.
    pub fn images_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.as_str()).join("images")
    }

    /// Directory holding the label files of a category.
    pub fn labels_dir(&self, category: Category) -> PathBuf {
        self.root.join(category.as_str()).join("labels")
    }

    /// Copy the image and write its payload boxes under the category.
    ///
    /// An empty payload writes nothing and returns `Ok(false)`; this is
    /// always the case for [`Category::NoDetections`].
    pub fn save(
        &self,
        category: Category,
        image_path: &Path,
        image_file: &str,
        boxes: &[BoundingBox],
        width: u32,
        height: u32,
    ) -> Result<bool> {
        if boxes.is_empty() {
            return Ok(false);
        }

        let labels_dir = self.labels_dir(category);
        write_label_file(
            labels_dir.join(label_file_name(image_file)),
            boxes,
            width,
            height,
        )?;

        let images_dir = self.images_dir(category);
        fs::create_dir_all(&images_dir)?;
        fs::copy(image_path, images_dir.join(image_file))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let writer = CategoryWriter::new("/results");
        assert_eq!(
            writer.images_dir(Category::FalsePositive),
            PathBuf::from("/results/false_positive/images")
        );
        assert_eq!(
            writer.labels_dir(Category::TruePositive),
            PathBuf::from("/results/true_positive/labels")
        );
    }

    #[test]
    fn test_empty_payload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CategoryWriter::new(dir.path());

        let written = writer
            .save(
                Category::NoDetections,
                &dir.path().join("missing.jpg"),
                "missing.jpg",
                &[],
                10,
                10,
            )
            .unwrap();
        assert!(!written);
        assert!(!dir.path().join("no_detections").exists());
    }

    #[test]
    fn test_save_copies_image_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("desk_1.jpg");
        fs::write(&source, b"not really a jpeg").unwrap();

        let writer = CategoryWriter::new(dir.path().join("out"));
        let boxes = [BoundingBox::new(0, 25, 20, 75, 60)];
        let written = writer
            .save(Category::TruePositive, &source, "desk_1.jpg", &boxes, 100, 80)
            .unwrap();
        assert!(written);

        let label = fs::read_to_string(writer.labels_dir(Category::TruePositive).join("desk_1.txt"))
            .unwrap();
        assert_eq!(label, "0 0.500000 0.500000 0.500000 0.500000\n");
        assert!(writer.images_dir(Category::TruePositive).join("desk_1.jpg").exists());
    }
}
