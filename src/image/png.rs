//! PNG renderer built on the `qrcode` and `image` crates.

use {
    super::{EcLevel, ImageConfig, QrRenderer},
    crate::record::Record,
    anyhow::Result,
    ::image::{imageops, ImageBuffer, ImageFormat, Luma},
    qrcode::QrCode,
    std::{io::Cursor, path::Path},
    tracing::debug,
};

/// Draws black modules on white and encodes the bitmap as PNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngRenderer;

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => Self::L,
            EcLevel::M => Self::M,
            EcLevel::Q => Self::Q,
            EcLevel::H => Self::H,
        }
    }
}

impl QrRenderer for PngRenderer {
    type Output = Vec<u8>;
    type Error = anyhow::Error;

    fn render(&self, payload: &str, config: &ImageConfig) -> Result<Vec<u8>> {
        let code = QrCode::with_error_correction_level(payload, config.level.into())?;
        let symbol = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(config.size, config.size)
            .build();

        let border = config.margin * config.size;
        let mut canvas = ImageBuffer::from_pixel(
            symbol.width() + 2 * border,
            symbol.height() + 2 * border,
            Luma([255u8]),
        );
        imageops::overlay(&mut canvas, &symbol, i64::from(border), i64::from(border));
        debug!(
            modules = code.width(),
            width = canvas.width(),
            "QR code rendered"
        );

        let mut png = Vec::new();
        canvas.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }
}

impl Record {
    /// Validate the record and write its QR code as a PNG file.
    pub fn write_png(&self, path: impl AsRef<Path>, config: &ImageConfig) -> Result<()> {
        let png = self.build_image(&PngRenderer, config)?;
        std::fs::write(path, png)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::error::Error};

    const CODE: &str = "A:500000000*B:123456789*C:PT*D:GT*E:N*F:20190720*G:GT G234CB/50987*H:GTVX4Y8B-50987*I1:0*N:0.00*O:0.00*Q:5uIg*R:9999";

    #[test]
    fn test_render_png() -> Result<()> {
        let record = Record::parse(CODE)?;
        let config = ImageConfig {
            size: 3,
            margin: 4,
            level: EcLevel::Q,
        };
        let png = record.build_image(&PngRenderer, &config)?;
        let bitmap = ::image::load_from_memory_with_format(&png, ImageFormat::Png)?.to_luma8();

        let modules = QrCode::with_error_correction_level(CODE, qrcode::EcLevel::Q)?.width();
        let side = u32::try_from(modules + 2 * 4)? * 3;
        assert_eq!(bitmap.dimensions(), (side, side));
        // Quiet zone is white, the finder pattern corner is black.
        assert_eq!(bitmap.get_pixel(0, 0), &Luma([255]));
        assert_eq!(bitmap.get_pixel(12, 12), &Luma([0]));
        Ok(())
    }

    #[test]
    fn test_render_rejects_invalid_record() {
        let record = Record::new();
        let err = record
            .build_image(&PngRenderer, &ImageConfig::default())
            .unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::Empty));
    }
}
