//! Output pixel buffer.

/// One 8-bit-per-channel RGB pixel.
pub type Rgb8 = [u8; 3];

/// A rendered frame: `width * height` pixels, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Rgb8>,
}

impl Image {
    /// Create a new image filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} image",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    fn row_start(&self, y: u32) -> usize {
        assert!(y < self.height, "row {y} out of bounds for {} rows", self.height);
        y as usize * self.width as usize
    }

    /// Get the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) lies outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Rgb8 {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: Rgb8) {
        let index = self.index(x, y);
        self.pixels[index] = rgb;
    }

    /// Pixels of row `y`, left to right.
    pub fn row(&self, y: u32) -> &[Rgb8] {
        let start = self.row_start(y);
        &self.pixels[start..start + self.width as usize]
    }

    /// Overwrite row `y`.
    pub fn write_row(&mut self, y: u32, pixels: &[Rgb8]) {
        let start = self.row_start(y);
        self.pixels[start..start + self.width as usize].copy_from_slice(pixels);
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }

    /// Packed RGB bytes, ready for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Convert to an `image` crate buffer (for saving or further processing).
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| image::Rgb(self.pixel(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_is_black() {
        let image = Image::new(4, 3);
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 3);
        assert_eq!(image.pixels().len(), 12);
        assert!(image.pixels().iter().all(|p| *p == [0, 0, 0]));
    }

    #[test]
    fn test_row_major_layout() {
        let mut image = Image::new(3, 2);
        image.set_pixel(2, 0, [1, 2, 3]);
        image.set_pixel(0, 1, [4, 5, 6]);

        assert_eq!(image.pixels()[2], [1, 2, 3]);
        assert_eq!(image.pixels()[3], [4, 5, 6]);
        assert_eq!(image.row(1), &[[4, 5, 6], [0, 0, 0], [0, 0, 0]]);
    }

    #[test]
    fn test_write_row() {
        let mut image = Image::new(2, 2);
        image.write_row(1, &[[9, 9, 9], [8, 8, 8]]);
        assert_eq!(image.pixel(0, 1), [9, 9, 9]);
        assert_eq!(image.pixel(1, 1), [8, 8, 8]);
        assert_eq!(image.row(0), &[[0, 0, 0], [0, 0, 0]]);
    }

    #[test]
    fn test_as_bytes() {
        let mut image = Image::new(2, 1);
        image.set_pixel(1, 0, [10, 20, 30]);
        assert_eq!(image.as_bytes(), &[0, 0, 0, 10, 20, 30]);
    }

    #[test]
    fn test_to_rgb_image() {
        let mut image = Image::new(2, 2);
        image.set_pixel(1, 1, [200, 100, 50]);

        let rgb = image.to_rgb_image();
        assert_eq!(rgb.dimensions(), (2, 2));
        assert_eq!(rgb.get_pixel(1, 1).0, [200, 100, 50]);
        assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_pixel_past_row_end_panics() {
        let image = Image::new(3, 2);
        // Would alias (0, 1) without the bounds check
        image.pixel(3, 0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_row_past_bottom_panics() {
        let image = Image::new(3, 2);
        image.row(2);
    }
}
