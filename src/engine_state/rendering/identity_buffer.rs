//! The identity attachment and its single-pixel readback.
//!
//! Every covered pixel of the off-screen target holds the pick value of the
//! topmost fragment: `(tile_data << 3) | face_id` for voxels, the interface
//! sentinel for UI draws, and [`CLEARED_PICK_VALUE`] where nothing was drawn.
//! The format is a plain 32-bit signed integer so values are stored exactly,
//! never blended or filtered.
//!
//! Reading a pixel copies it into a small mappable staging buffer during the
//! frame's command submission, then blocks on the device until the map
//! completes. This stalls the frame, so it only happens on clicks.
//!
//! [`CLEARED_PICK_VALUE`]: crate::engine_state::picking::pick_encoding::CLEARED_PICK_VALUE

use std::sync::mpsc;

use thiserror::Error;

/// Errors raised while reading a pixel back from the identity attachment.
#[derive(Debug, Error)]
pub enum ReadbackError {
    #[error("failed to map the identity staging buffer: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
    #[error("device poll failed while waiting for the identity readback: {0}")]
    Poll(#[from] wgpu::PollError),
    #[error("identity readback callback was dropped before it reported a result")]
    ChannelClosed,
}

/// The integer attachment that identifies which voxel face or UI element
/// is visible at each pixel.
pub struct IdentityBuffer {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    staging: wgpu::Buffer,
    width: u32,
    height: u32,
}

impl IdentityBuffer {
    /// Exact-integer texel format of the attachment.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Sint;

    /// Bytes in one pick value.
    const PIXEL_BYTES: u64 = 4;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("IDENTITY TEXTURE"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        // One padded row is the smallest copy destination wgpu accepts.
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("IDENTITY STAGING BUFFER"),
            size: wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        Self {
            texture,
            view,
            staging,
            width,
            height,
        }
    }

    /// Whether `(x, y)` addresses a pixel of the attachment.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        pixel_in_bounds(x, y, self.width, self.height)
    }

    /// Records a copy of the pixel at `(x, y)` into the staging buffer.
    ///
    /// Window coordinates and texture coordinates share a top-left origin,
    /// so the cursor position is used as is.
    pub fn encode_pixel_copy(&self, encoder: &mut wgpu::CommandEncoder, x: u32, y: u32) {
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Maps the staging buffer and returns the copied pick value.
    ///
    /// Must be called after the command buffer holding the matching
    /// [`encode_pixel_copy`](Self::encode_pixel_copy) was submitted.
    pub fn read_copied_pixel(&self, device: &wgpu::Device) -> Result<i32, ReadbackError> {
        let slice = self.staging.slice(0..Self::PIXEL_BYTES);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        device.poll(wgpu::PollType::Wait)?;
        receiver.recv().map_err(|_| ReadbackError::ChannelClosed)??;

        let value = {
            let data = slice.get_mapped_range();
            i32::from_le_bytes([data[0], data[1], data[2], data[3]])
        };
        self.staging.unmap();

        Ok(value)
    }
}

/// Whether `(x, y)` lies inside a `width` × `height` image.
pub fn pixel_in_bounds(x: u32, y: u32, width: u32, height: u32) -> bool {
    x < width && y < height
}
