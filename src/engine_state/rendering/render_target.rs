//! The off-screen target both passes draw into.
//!
//! Three attachments share one size: sRGB color, the integer identity
//! attachment, and depth. The color attachment is later sampled by the blit
//! pass; the identity attachment is only ever read back one pixel at a time.

use thiserror::Error;

use super::{
    identity_buffer::IdentityBuffer,
    texture::{DepthTexture, Texture},
};

/// A required attachment format is not usable on the active adapter.
#[derive(Debug, Error)]
pub enum RenderTargetError {
    #[error("{attachment} attachment format {format:?} does not support {missing:?} on this adapter")]
    UnsupportedFormat {
        attachment: &'static str,
        format: wgpu::TextureFormat,
        missing: wgpu::TextureUsages,
    },
}

/// Formats and usages every attachment needs.
const ATTACHMENTS: [(&str, wgpu::TextureFormat, wgpu::TextureUsages); 3] = [
    (
        "color",
        Texture::COLOR_FORMAT,
        wgpu::TextureUsages::RENDER_ATTACHMENT.union(wgpu::TextureUsages::TEXTURE_BINDING),
    ),
    (
        "identity",
        IdentityBuffer::FORMAT,
        wgpu::TextureUsages::RENDER_ATTACHMENT.union(wgpu::TextureUsages::COPY_SRC),
    ),
    ("depth", DepthTexture::FORMAT, DepthTexture::USAGES),
];

/// Color, identity, and depth attachments of one size.
pub struct OffscreenTarget {
    pub color: Texture,
    pub identity: IdentityBuffer,
    pub depth: DepthTexture,
}

impl OffscreenTarget {
    /// Checks that every attachment format can be used the way the passes use it.
    ///
    /// # Errors
    /// Returns the first attachment whose format lacks a required usage.
    pub fn check_support(adapter: &wgpu::Adapter) -> Result<(), RenderTargetError> {
        for (attachment, format, required) in ATTACHMENTS {
            let allowed = adapter.get_texture_format_features(format).allowed_usages;
            if !allowed.contains(required) {
                return Err(RenderTargetError::UnsupportedFormat {
                    attachment,
                    format,
                    missing: required.difference(allowed),
                });
            }
        }
        Ok(())
    }

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self {
            color: Texture::create_color_target(device, width, height, "OFFSCREEN COLOR TEXTURE"),
            identity: IdentityBuffer::new(device, width, height),
            depth: DepthTexture::new(device, width, height, "DEPTH TEXTURE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_is_checked_for_exactly_the_usages_it_is_created_with() {
        let (_, format, usages) = ATTACHMENTS[2];
        assert_eq!(format, DepthTexture::FORMAT);
        assert_eq!(usages, DepthTexture::USAGES);
        assert!(!usages.contains(wgpu::TextureUsages::TEXTURE_BINDING));
    }

    #[test]
    fn identity_can_be_copied_out_but_not_sampled() {
        let (_, format, usages) = ATTACHMENTS[1];
        assert_eq!(format, wgpu::TextureFormat::R32Sint);
        assert!(usages.contains(wgpu::TextureUsages::COPY_SRC));
        assert!(!usages.contains(wgpu::TextureUsages::TEXTURE_BINDING));
    }
}
