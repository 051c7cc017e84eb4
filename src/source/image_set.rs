use super::Image;
use crate::error::AssemblyError;

/// The ordered pages of one issue.
///
/// Built once, then only ever read. The sequence indices of the contained
/// images are exactly `0..len`, so iteration order is reading order.
#[derive(Debug, Clone)]
pub struct ImageSet {
    images: Vec<Image>,
}

impl ImageSet {
    /// Validate and order a collection of pages.
    ///
    /// Fails if there are no pages, or if the sequence indices contain
    /// duplicates or gaps.
    pub fn new(mut images: Vec<Image>) -> Result<ImageSet, AssemblyError> {
        if images.is_empty() {
            return Err(AssemblyError::InvalidInput(
                "an image set needs at least one page".to_string(),
            ));
        }

        images.sort_by_key(Image::sequence_index);
        for (expected, image) in images.iter().enumerate() {
            let actual = image.sequence_index();
            if actual != expected {
                let problem = if actual < expected {
                    "is duplicated"
                } else {
                    "is missing"
                };
                let index = if actual < expected { actual } else { expected };
                return Err(AssemblyError::InvalidInput(format!(
                    "sequence index {index} {problem} in a set of {} pages",
                    images.len()
                )));
            }
        }

        Ok(ImageSet { images })
    }

    /// Decode encoded pages, numbering them in the order given.
    pub fn from_encoded<I>(pages: I) -> Result<ImageSet, AssemblyError>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let images = pages
            .into_iter()
            .enumerate()
            .map(|(i, bytes)| Image::decode(i, bytes))
            .collect::<Result<Vec<Image>, AssemblyError>>()?;
        ImageSet::new(images)
    }

    /// Build a set from pages that survived a lossy collection step, closing any
    /// gaps left by pages that were dropped.
    pub fn renumbered(images: Vec<Image>) -> Result<ImageSet, AssemblyError> {
        let images = images
            .into_iter()
            .enumerate()
            .map(|(i, image)| image.with_sequence_index(i))
            .collect();
        ImageSet::new(images)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Image> {
        self.images.iter()
    }

    /// Always false, a set has at least one page.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// The cover page. Always the first page of the issue.
    pub fn cover(&self) -> &Image {
        &self.images[0]
    }

    pub fn total_bytes(&self) -> u64 {
        self.images.iter().map(|i| i.bytes().len() as u64).sum()
    }
}

impl<'a> IntoIterator for &'a ImageSet {
    type Item = &'a Image;
    type IntoIter = std::slice::Iter<'a, Image>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::{encode, gradient_rgb};

    fn page(index: usize, width: u32) -> Image {
        let bytes = encode(&gradient_rgb(width, 10), image::ImageFormat::Png);
        Image::decode(index, bytes).expect("can decode page")
    }

    #[test]
    fn orders_pages_by_sequence_index() {
        let set = ImageSet::new(vec![page(2, 3), page(0, 1), page(1, 2)]).expect("valid set");
        let widths: Vec<u32> = set.iter().map(Image::width_px).collect();
        assert_eq!(widths, vec![1, 2, 3]);
        assert_eq!(set.cover().width_px(), 1);
    }

    #[test]
    fn rejects_empty_sets() {
        let err = ImageSet::new(Vec::new()).unwrap_err();
        assert!(matches!(err, AssemblyError::InvalidInput(_)));
    }

    #[test]
    fn rejects_duplicate_indices() {
        let err = ImageSet::new(vec![page(0, 1), page(0, 2)]).unwrap_err();
        match err {
            AssemblyError::InvalidInput(message) => assert!(message.contains("duplicated")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_gaps() {
        let err = ImageSet::new(vec![page(0, 1), page(2, 2)]).unwrap_err();
        match err {
            AssemblyError::InvalidInput(message) => assert!(message.contains("1 is missing")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn renumbering_closes_gaps() {
        let set = ImageSet::renumbered(vec![page(3, 1), page(7, 2)]).expect("valid set");
        let indices: Vec<usize> = set.iter().map(Image::sequence_index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(set.iter().nth(1).map(Image::width_px), Some(2));
    }

    #[test]
    fn from_encoded_numbers_in_order() {
        let pages = vec![
            encode(&gradient_rgb(5, 5), image::ImageFormat::Png),
            encode(&gradient_rgb(6, 6), image::ImageFormat::Jpeg),
        ];
        let set = ImageSet::from_encoded(pages).expect("valid set");
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().nth(1).map(Image::width_px), Some(6));
    }
}
