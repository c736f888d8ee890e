//! The per-frame list of draws, built on the CPU from the editor state.
//!
//! Building the list needs no GPU, so the order of draws and the identity
//! each draw writes can be checked in tests.

use cgmath::Matrix4;
use log::warn;

use crate::engine_state::{
    viewer_state::ViewerState,
    voxels::tile::{MeshKind, TextureKind},
};

use super::{
    bind_group_state::BindGroupState,
    draw_uniforms::{DrawUniform, DrawUniformBuffer, UniformPacker, UniformSlot},
    mesh_library::MeshLibrary,
    ui::layout,
};

/// One indexed draw of a static mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub mesh: MeshKind,
    pub texture: TextureKind,
    pub uniform: DrawUniform,
}

/// Draws for the object pass and the UI pass, in submission order.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub objects: Vec<DrawItem>,
    pub interface: Vec<DrawItem>,
}

/// Builds every draw for the current grid, camera, and tile selection.
///
/// World draws follow linear index order and carry their voxel index as tile
/// data. UI draws carry the grid's interface sentinel.
pub fn build_draw_list(viewer: &ViewerState, width: u32, height: u32) -> DrawList {
    let view_projection = viewer.camera_state.view_projection();

    let objects = viewer
        .grid
        .iter_occupied()
        .filter_map(|(index, tile)| {
            let descriptor = tile.descriptor()?;
            let position = viewer.grid.world_position(index)?;
            let mvp = view_projection * Matrix4::from_translation(position);
            Some(DrawItem {
                mesh: descriptor.mesh,
                texture: descriptor.texture,
                uniform: DrawUniform::new(mvp, index as u32),
            })
        })
        .collect();

    let sentinel = viewer.grid.interface_sentinel();
    let (width, height) = (width as f32, height as f32);
    let screen = layout::screen_projection(width, height);

    let mut interface = vec![DrawItem {
        mesh: MeshKind::UiRect,
        texture: TextureKind::Panel,
        uniform: DrawUniform::new(screen * layout::panel_model(width, height), sentinel),
    }];
    if let Some(descriptor) = viewer.selected_tile.descriptor() {
        let orientation = viewer.camera_state.camera.orientation();
        let model = layout::preview_model(descriptor.mesh, orientation, height);
        interface.push(DrawItem {
            mesh: descriptor.mesh,
            texture: descriptor.texture,
            uniform: DrawUniform::new(screen * model, sentinel),
        });
    }

    DrawList { objects, interface }
}

/// Packs each item's uniform, returning the slots in item order.
pub fn pack_uniforms(items: &[DrawItem], packer: &mut UniformPacker) -> Vec<UniformSlot> {
    items.iter().map(|item| packer.pack(&item.uniform)).collect()
}

/// Records the draws of one pass. The pass pipeline must already be set.
pub fn record_draws(
    rpass: &mut wgpu::RenderPass<'_>,
    items: &[DrawItem],
    slots: &[UniformSlot],
    uniforms: &DrawUniformBuffer,
    bind_group_state: &BindGroupState,
    mesh_library: &MeshLibrary,
) {
    for (item, slot) in items.iter().zip(slots) {
        let (Some(mesh), Some(texture), Some(uniform_bind_group)) = (
            mesh_library.get(item.mesh),
            bind_group_state.texture_bind_group(item.texture),
            uniforms.bind_group(slot.page),
        ) else {
            warn!("Skipping draw of {:?} with {:?}: resource missing", item.mesh, item.texture);
            continue;
        };

        rpass.set_bind_group(0, uniform_bind_group, &[slot.offset]);
        rpass.set_bind_group(1, texture, &[]);
        mesh.draw(rpass);
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Matrix4, Vector3};

    use super::*;
    use crate::engine_state::rendering::draw_uniforms::PageLayout;
    use crate::{
        application_state::viewer_config::CameraConfig,
        engine_state::voxels::{
            grid::{GridDimensions, VoxelGrid},
            tile::tile_type::TileType,
        },
    };

    fn viewer(tiles: Vec<TileType>, selected: TileType) -> ViewerState {
        let grid = VoxelGrid::from_tiles(GridDimensions::new(2, 2, 1), tiles).unwrap();
        ViewerState::new(grid, &CameraConfig::default(), selected, 640, 480)
    }

    #[test]
    fn objects_follow_linear_order_and_skip_empty_cells() {
        let viewer = viewer(
            vec![TileType::Wall, TileType::Empty, TileType::Tree, TileType::Grass],
            TileType::Wall,
        );
        let list = build_draw_list(&viewer, 640, 480);

        let tile_data: Vec<u32> = list.objects.iter().map(|d| d.uniform.tile_data).collect();
        assert_eq!(tile_data, vec![0, 2, 3]);
        assert_eq!(list.objects[1].mesh, MeshKind::Tree);
        assert_eq!(list.objects[2].texture, TextureKind::Grass);
    }

    #[test]
    fn object_mvp_places_voxel_at_its_world_position() {
        let viewer = viewer(
            vec![TileType::Empty, TileType::Empty, TileType::Empty, TileType::Brick],
            TileType::Wall,
        );
        let list = build_draw_list(&viewer, 640, 480);

        let expected = viewer.camera_state.view_projection()
            * Matrix4::from_translation(Vector3::new(0.0, 0.0, 0.0));
        let expected: [[f32; 4]; 4] = expected.into();
        assert_eq!(list.objects[0].uniform.mvp, expected);
    }

    #[test]
    fn interface_draws_write_the_sentinel() {
        let viewer = viewer(vec![TileType::Empty; 4], TileType::Door);
        let list = build_draw_list(&viewer, 640, 480);

        assert!(list.objects.is_empty());
        assert_eq!(list.interface.len(), 2);
        assert_eq!(list.interface[0].mesh, MeshKind::UiRect);
        assert_eq!(list.interface[1].mesh, MeshKind::Door);
        assert!(list.interface.iter().all(|d| d.uniform.tile_data == 5));
    }

    #[test]
    fn empty_selection_draws_only_the_panel() {
        let viewer = viewer(vec![TileType::Wall; 4], TileType::Empty);
        let list = build_draw_list(&viewer, 640, 480);
        assert_eq!(list.interface.len(), 1);
    }

    #[test]
    fn offsets_line_up_with_items() {
        let viewer = viewer(vec![TileType::Wall; 4], TileType::Wall);
        let list = build_draw_list(&viewer, 640, 480);
        let mut packer = UniformPacker::new(PageLayout::new(256, 1 << 20));

        let objects = pack_uniforms(&list.objects, &mut packer);
        let interface = pack_uniforms(&list.interface, &mut packer);

        let offsets: Vec<u32> = objects.iter().chain(&interface).map(|slot| slot.offset).collect();
        assert_eq!(offsets, vec![0, 256, 512, 768, 1024, 1280]);
        assert!(objects.iter().chain(&interface).all(|slot| slot.page == 0));
    }

    #[test]
    fn interface_draws_continue_on_the_next_page_when_objects_fill_one() {
        let viewer = viewer(vec![TileType::Wall; 4], TileType::Wall);
        let list = build_draw_list(&viewer, 640, 480);
        let mut packer = UniformPacker::new(PageLayout::new(256, 1024));

        let objects = pack_uniforms(&list.objects, &mut packer);
        let interface = pack_uniforms(&list.interface, &mut packer);

        assert!(objects.iter().all(|slot| slot.page == 0));
        assert_eq!(
            interface,
            vec![
                UniformSlot { page: 1, offset: 0 },
                UniformSlot { page: 1, offset: 256 }
            ]
        );
        assert_eq!(packer.pages().len(), 2);
    }
}
