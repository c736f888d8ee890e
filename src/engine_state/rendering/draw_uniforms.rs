//! Per-draw uniforms packed into dynamically offset buffers.
//!
//! Each draw gets its own `DrawUniform` slot. Slots are aligned to the
//! device's minimum uniform offset alignment so a bind group can be rebound
//! with a different dynamic offset for every draw call. Slots are split into
//! pages, one buffer and bind group each, so no single buffer grows past the
//! device's `max_buffer_size` however many voxels the grid holds.

use wgpu::util::DeviceExt;

/// Largest page allocated, even when the device allows bigger buffers.
const MAX_PAGE_BYTES: u64 = 1 << 24;

/// Uniform data for one draw call.
///
/// Matches the WGSL struct `{ mvp: mat4x4<f32>, tile_data: u32 }`, whose size
/// rounds up to 80 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub mvp: [[f32; 4]; 4],
    /// Voxel linear index, or the interface sentinel for UI draws
    pub tile_data: u32,
    _padding: [u32; 3],
}

impl DrawUniform {
    pub const SIZE: u64 = std::mem::size_of::<DrawUniform>() as u64;

    pub fn new(mvp: cgmath::Matrix4<f32>, tile_data: u32) -> Self {
        Self {
            mvp: mvp.into(),
            tile_data,
            _padding: [0; 3],
        }
    }
}

/// Where a packed uniform lives: which page, and the dynamic offset inside it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UniformSlot {
    pub page: usize,
    pub offset: u32,
}

/// How uniform slots are laid out across pages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PageLayout {
    stride: u64,
    slots_per_page: u64,
}

impl PageLayout {
    /// # Arguments
    /// * `alignment` - The device's `min_uniform_buffer_offset_alignment`
    /// * `max_buffer_size` - The device's `max_buffer_size`
    pub fn new(alignment: u64, max_buffer_size: u64) -> Self {
        let stride = DrawUniform::SIZE.next_multiple_of(alignment.max(1));
        let page_bytes = max_buffer_size.min(MAX_PAGE_BYTES);
        Self {
            stride,
            slots_per_page: (page_bytes / stride).max(1),
        }
    }

    pub fn from_limits(limits: &wgpu::Limits) -> Self {
        Self::new(
            limits.min_uniform_buffer_offset_alignment as u64,
            limits.max_buffer_size,
        )
    }

    /// Slot of the `index`th uniform packed in a frame.
    pub fn slot(&self, index: usize) -> UniformSlot {
        let index = index as u64;
        UniformSlot {
            page: (index / self.slots_per_page) as usize,
            offset: ((index % self.slots_per_page) * self.stride) as u32,
        }
    }

    /// Bytes of a completely filled page.
    pub fn page_capacity(&self) -> u64 {
        (self.slots_per_page - 1) * self.stride + DrawUniform::SIZE
    }
}

/// Accumulates aligned uniform slots for one frame.
#[derive(Debug, Clone)]
pub struct UniformPacker {
    layout: PageLayout,
    pages: Vec<Vec<u8>>,
    count: usize,
}

impl UniformPacker {
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            pages: Vec::new(),
            count: 0,
        }
    }

    /// Appends a uniform and returns its page and dynamic offset.
    pub fn pack(&mut self, uniform: &DrawUniform) -> UniformSlot {
        let slot = self.layout.slot(self.count);
        self.count += 1;
        if slot.page == self.pages.len() {
            self.pages.push(Vec::new());
        }
        let page = &mut self.pages[slot.page];
        page.resize(slot.offset as usize, 0);
        page.extend_from_slice(bytemuck::bytes_of(uniform));
        slot
    }

    /// Packed bytes, one entry per page.
    pub fn pages(&self) -> &[Vec<u8>] {
        &self.pages
    }
}

struct DrawUniformPage {
    buffer: wgpu::Buffer,
    capacity: usize,
    bind_group: wgpu::BindGroup,
}

/// GPU buffers holding the packed uniforms, each reused while it is large enough.
pub struct DrawUniformBuffer {
    layout: PageLayout,
    pages: Vec<DrawUniformPage>,
}

impl DrawUniformBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            layout: PageLayout::from_limits(&device.limits()),
            pages: Vec::new(),
        }
    }

    pub fn create_packer(&self) -> UniformPacker {
        UniformPacker::new(self.layout)
    }

    /// Uploads a frame's uniforms. A page's buffer (and bind group) is only
    /// recreated when the existing one is too small.
    pub fn upload(
        &mut self,
        packer: &UniformPacker,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) {
        for (index, data) in packer.pages().iter().enumerate() {
            let reusable = self
                .pages
                .get(index)
                .filter(|page| page.capacity >= data.len());

            if let Some(page) = reusable {
                queue.write_buffer(&page.buffer, 0, data);
                continue;
            }

            log::debug!("growing draw uniform page {} to {} bytes", index, data.len());
            let page = create_page(device, layout, data);
            if index < self.pages.len() {
                self.pages[index] = page;
            } else {
                self.pages.push(page);
            }
        }
    }

    /// The bind group of `page` from the most recent uploads, if it exists.
    pub fn bind_group(&self, page: usize) -> Option<&wgpu::BindGroup> {
        self.pages.get(page).map(|page| &page.bind_group)
    }
}

fn create_page(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    data: &[u8],
) -> DrawUniformPage {
    let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("DRAW UNIFORM BUFFER"),
        contents: data,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("DRAW UNIFORM BIND GROUP"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(DrawUniform::SIZE),
            }),
        }],
    });

    DrawUniformPage {
        buffer,
        capacity: data.len(),
        bind_group,
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Matrix4, SquareMatrix};

    use super::*;

    #[test]
    fn uniform_matches_the_shader_struct_size() {
        assert_eq!(DrawUniform::SIZE, 80);
    }

    #[test]
    fn packed_slots_start_on_aligned_offsets() {
        let mut packer = UniformPacker::new(PageLayout::new(256, 1 << 20));
        let uniform = DrawUniform::new(Matrix4::identity(), 7);

        let offsets: Vec<u32> = (0..3).map(|_| packer.pack(&uniform).offset).collect();

        assert_eq!(offsets, vec![0, 256, 512]);
        assert_eq!(packer.pages().len(), 1);
        assert_eq!(packer.pages()[0].len(), 512 + 80);
        let tile_data = &packer.pages()[0][256 + 64..256 + 68];
        assert_eq!(u32::from_ne_bytes(tile_data.try_into().unwrap()), 7);
    }

    #[test]
    fn full_pages_spill_into_a_new_page() {
        let mut packer = UniformPacker::new(PageLayout::new(256, 1024));
        let uniform = DrawUniform::new(Matrix4::identity(), 1);

        let slots: Vec<UniformSlot> = (0..6).map(|_| packer.pack(&uniform)).collect();

        let pages: Vec<usize> = slots.iter().map(|slot| slot.page).collect();
        let offsets: Vec<u32> = slots.iter().map(|slot| slot.offset).collect();
        assert_eq!(pages, vec![0, 0, 0, 0, 1, 1]);
        assert_eq!(offsets, vec![0, 256, 512, 768, 0, 256]);
        let lengths: Vec<usize> = packer.pages().iter().map(Vec::len).collect();
        assert_eq!(lengths, vec![768 + 80, 256 + 80]);
    }

    #[test]
    fn large_grids_never_need_a_buffer_over_the_device_limit() {
        let limits = wgpu::Limits::default();
        let layout = PageLayout::from_limits(&limits);
        // Fully occupied 256x256x20 grid plus the panel and tile preview.
        let draws = 256 * 256 * 20 + 2;

        let needed_in_one_buffer =
            (draws as u64 - 1) * limits.min_uniform_buffer_offset_alignment as u64 + DrawUniform::SIZE;
        assert!(needed_in_one_buffer > limits.max_buffer_size);

        assert!(layout.page_capacity() <= limits.max_buffer_size);
        let last = layout.slot(draws - 1);
        assert!(last.page > 0);
        assert!(last.offset as u64 + DrawUniform::SIZE <= layout.page_capacity());
        assert_eq!(last.offset as u64 % limits.min_uniform_buffer_offset_alignment as u64, 0);
    }

    #[test]
    fn small_alignment_still_keeps_slots_apart() {
        let layout = PageLayout::new(16, 1 << 20);
        assert_eq!(layout.slot(1).offset, 80);
        assert_eq!(layout.slot(2).offset, 160);
    }
}
