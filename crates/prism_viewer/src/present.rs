//! Displaying finished renders.

use anyhow::Result;
use prism_renderer::PixelBuffer;

/// Pack RGB pixels as `0x00RRGGBB`, the layout window framebuffers expect.
#[cfg(any(feature = "window", test))]
pub fn to_window_buffer(image: &PixelBuffer) -> Vec<u32> {
    image
        .pixels()
        .iter()
        .map(|&[r, g, b]| (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b))
        .collect()
}

/// Show `image` in a window until it is closed or Escape is pressed.
#[cfg(feature = "window")]
pub fn show(image: &PixelBuffer) -> Result<()> {
    use minifb::{Key, Window, WindowOptions};

    let width = image.width() as usize;
    let height = image.height() as usize;
    let buffer = to_window_buffer(image);

    let mut window = Window::new("Prism", width, height, WindowOptions::default())
        .map_err(|e| anyhow::anyhow!("Failed to open window: {e}"))?;
    window.limit_update_rate(Some(std::time::Duration::from_micros(16_600)));

    log::info!("Displaying {}x{} render, press Escape to close", width, height);
    while window.is_open() && !window.is_key_down(Key::Escape) {
        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|e| anyhow::anyhow!("Failed to update window: {e}"))?;
    }

    Ok(())
}

#[cfg(not(feature = "window"))]
pub fn show(_image: &PixelBuffer) -> Result<()> {
    log::warn!("Built without the `window` feature, not opening a window");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_buffer_packing() {
        let mut image = PixelBuffer::new(2, 1);
        image.set(0, 0, [0x12, 0x34, 0x56]);
        image.set(1, 0, [255, 0, 1]);

        assert_eq!(to_window_buffer(&image), vec![0x0012_3456, 0x00FF_0001]);
    }
}
