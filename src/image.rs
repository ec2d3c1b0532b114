//! Hand-off to a QR bitmap renderer.
//!
//! A renderer receives the validated QR code string together with an explicit
//! [`ImageConfig`]. The `png` feature provides [`PngRenderer`].

#[cfg(feature = "png")]
mod png;

#[cfg(feature = "png")]
pub use self::png::PngRenderer;
use crate::{error::Error, record::Record};

/// Error correction level of the rendered symbol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EcLevel {
    /// Low (~7% recovery capacity)
    L,
    /// Medium (~15% recovery capacity)
    #[default]
    M,
    /// Quartile (~25% recovery capacity)
    Q,
    /// High (~30% recovery capacity)
    H,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageConfig {
    /// Pixels per module.
    pub size:   u32,
    /// Quiet zone, in modules.
    pub margin: u32,
    pub level:  EcLevel,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            size:   2,
            margin: 2,
            level:  EcLevel::M,
        }
    }
}

pub trait QrRenderer {
    type Output;
    type Error: From<Error>;

    fn render(&self, payload: &str, config: &ImageConfig) -> Result<Self::Output, Self::Error>;
}

impl Record {
    /// Validate the record and pass its QR code string to `renderer`.
    pub fn build_image<R: QrRenderer>(
        &self,
        renderer: &R,
        config: &ImageConfig,
    ) -> Result<R::Output, R::Error> {
        let payload = self.to_qr_string(true)?;
        renderer.render(&payload, config)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, anyhow::Result};

    /// Records what it was asked to draw.
    struct Capture;

    impl QrRenderer for Capture {
        type Output = (String, ImageConfig);
        type Error = anyhow::Error;

        fn render(&self, payload: &str, config: &ImageConfig) -> Result<Self::Output> {
            Ok((payload.to_owned(), *config))
        }
    }

    #[test]
    fn test_build_image() -> Result<()> {
        let code = "A:500000000*B:123456789*C:PT*D:GT*E:N*F:20190720*G:GT G234CB/50987*H:GTVX4Y8B-50987*I1:0*N:0.00*O:0.00*Q:5uIg*R:9999";
        let record = Record::parse(code)?;
        let config = ImageConfig {
            size: 4,
            ..ImageConfig::default()
        };
        let (payload, used) = record.build_image(&Capture, &config)?;
        assert_eq!(payload, code);
        assert_eq!(used.size, 4);
        assert_eq!(used.margin, 2);
        assert_eq!(used.level, EcLevel::M);
        Ok(())
    }

    #[test]
    fn test_build_image_rejects_incomplete_record() {
        let mut record = Record::new();
        record.set_issuer_tin("500000000").unwrap();
        let err = record.build_image(&Capture, &ImageConfig::default()).unwrap_err();
        assert_eq!(err.downcast_ref::<Error>(), Some(&Error::Truncated {
            expected: "B",
        }));
    }
}
