//! End-to-end edits driven through the public API: map text in, synthetic
//! identity values as clicks, grid contents out. No GPU is involved.

use voxel_editor::{
    application_state::viewer_config::CameraConfig,
    engine_state::{
        camera_state::CameraState,
        picking::{
            pick_encoding::{encode, CLEARED_PICK_VALUE},
            PickButton, PickOutcome,
        },
        rendering::draw_list::build_draw_list,
        viewer_state::ViewerState,
        voxels::{face::Face, map_file::parse_map, tile::tile_type::TileType},
        EditorActions,
    },
};

const FLAT_MAP: &str = "2 2 1\n\
                        2\n\
                        1 wall\n\
                        2 grass\n\
                        \n\
                        1 0\n\
                        0 2\n";

const TALL_MAP: &str = "2 2 2\n\
                        0\n\
                        \n\
                        1 0\n\
                        0 2\n\
                        \n\
                        0 0\n\
                        0 0\n";

fn viewer(map: &str, selected: TileType) -> ViewerState {
    let grid = parse_map(map).unwrap().grid;
    ViewerState::new(grid, &CameraConfig::default(), selected, 640, 480)
}

fn tile_ids(viewer: &ViewerState) -> Vec<u8> {
    viewer.grid.tiles().iter().map(|tile| tile.id()).collect()
}

#[test]
fn left_click_removes_the_wall() {
    let mut viewer = viewer(FLAT_MAP, TileType::Grass);
    assert_eq!(tile_ids(&viewer), vec![1, 0, 0, 2]);

    let outcome = viewer
        .apply_pick(encode(0, Face::TOP.id()), PickButton::Left)
        .unwrap();

    assert_eq!(
        outcome,
        PickOutcome::Removed {
            index: 0,
            previous: TileType::Wall
        }
    );
    assert_eq!(tile_ids(&viewer), vec![0, 0, 0, 2]);
}

#[test]
fn right_click_on_top_face_is_dropped_in_a_single_layer() {
    let mut viewer = viewer(FLAT_MAP, TileType::Grass);

    let outcome = viewer
        .apply_pick(encode(3, Face::TOP.id()), PickButton::Right)
        .unwrap();

    assert_eq!(outcome, PickOutcome::OutOfBounds);
    assert_eq!(tile_ids(&viewer), vec![1, 0, 0, 2]);
}

#[test]
fn right_click_on_top_face_stacks_when_there_is_room() {
    let mut viewer = viewer(TALL_MAP, TileType::Grass);

    viewer
        .apply_pick(encode(3, Face::TOP.id()), PickButton::Right)
        .unwrap();

    assert_eq!(viewer.grid.get_at(1, 1, 1), Some(TileType::Grass));
    assert_eq!(tile_ids(&viewer), vec![1, 0, 0, 2, 0, 0, 0, 2]);
}

#[test]
fn clicks_on_background_and_ui_change_nothing() {
    let mut viewer = viewer(FLAT_MAP, TileType::Grass);
    let sentinel = viewer.grid.interface_sentinel();

    for button in [PickButton::Left, PickButton::Right] {
        assert_eq!(viewer.apply_pick(CLEARED_PICK_VALUE, button), Ok(PickOutcome::Missed));
        assert_eq!(viewer.apply_pick(encode(sentinel, 0), button), Ok(PickOutcome::Missed));
    }
    assert_eq!(tile_ids(&viewer), vec![1, 0, 0, 2]);
}

#[test]
fn corrupt_face_bits_are_rejected_without_editing() {
    let mut viewer = viewer(FLAT_MAP, TileType::Grass);

    assert!(viewer.apply_pick(encode(0, 6), PickButton::Left).is_err());
    assert!(viewer.apply_pick(encode(0, 7), PickButton::Right).is_err());
    assert_eq!(tile_ids(&viewer), vec![1, 0, 0, 2]);
}

#[test]
fn edits_show_up_in_the_next_frame_draws() {
    let mut viewer = viewer(FLAT_MAP, TileType::Brick);
    let before = build_draw_list(&viewer, 640, 480);
    assert_eq!(before.objects.len(), 2);

    viewer
        .apply_pick(encode(3, Face::LEFT.id()), PickButton::Right)
        .unwrap();
    let after = build_draw_list(&viewer, 640, 480);

    let drawn: Vec<u32> = after.objects.iter().map(|draw| draw.uniform.tile_data).collect();
    assert_eq!(drawn, vec![0, 2, 3]);
}

#[test]
fn four_turns_restore_the_view() {
    let mut camera = CameraState::new(&CameraConfig::default(), 640, 480);
    let original = camera.view_projection();
    let turn = EditorActions {
        cycle_right: true,
        ..Default::default()
    };

    for _ in 0..4 {
        camera.update(&turn, web_time::Duration::ZERO);
    }

    assert_eq!(camera.view_projection(), original);
}

#[test]
fn toggling_projection_twice_restores_it() {
    let mut camera = CameraState::new(&CameraConfig::default(), 640, 480);
    let original = camera.projection.calc_matrix();
    let toggle = EditorActions {
        toggle_projection: true,
        ..Default::default()
    };

    camera.update(&toggle, web_time::Duration::ZERO);
    assert_ne!(camera.projection.calc_matrix(), original);
    camera.update(&toggle, web_time::Duration::ZERO);

    assert_eq!(camera.projection.calc_matrix(), original);
}
