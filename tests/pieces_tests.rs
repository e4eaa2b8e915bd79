//! Pieces tests - shape table and clockwise rotation

use streamer_tetris::core::pieces::{definition, get_shape, rotate, PIECES};
use streamer_tetris::types::PieceKind;

#[test]
fn test_four_rotations_return_original() {
    for def in PIECES.iter() {
        let mut shape = def.shape;
        for _ in 0..4 {
            shape = rotate(&shape);
        }
        assert_eq!(shape, def.shape, "{:?}", def.kind);
    }
}

#[test]
fn test_rotation_swaps_dimensions() {
    for kind in PieceKind::ALL {
        let shape = get_shape(kind);
        let rotated = rotate(&shape);
        assert_eq!(rotated.width(), shape.height());
        assert_eq!(rotated.height(), shape.width());
        assert_eq!(rotated.filled_cells().count(), 4);
    }
}

#[test]
fn test_o_rotation_is_identity() {
    let o = get_shape(PieceKind::O);
    assert_eq!(rotate(&o), o);
}

#[test]
fn test_spawn_matrices() {
    assert_eq!(get_shape(PieceKind::I).to_rows(), vec![vec![1, 1, 1, 1]]);
    assert_eq!(get_shape(PieceKind::O).to_rows(), vec![vec![1, 1], vec![1, 1]]);
    assert_eq!(
        get_shape(PieceKind::S).to_rows(),
        vec![vec![0, 1, 1], vec![1, 1, 0]]
    );
    assert_eq!(
        get_shape(PieceKind::Z).to_rows(),
        vec![vec![1, 1, 0], vec![0, 1, 1]]
    );
    assert_eq!(
        get_shape(PieceKind::J).to_rows(),
        vec![vec![1, 0, 0], vec![1, 1, 1]]
    );
    assert_eq!(
        get_shape(PieceKind::L).to_rows(),
        vec![vec![0, 0, 1], vec![1, 1, 1]]
    );
}

#[test]
fn test_rotate_l_clockwise() {
    // [0 0 1]      [1 0]
    // [1 1 1]  ->  [1 0]
    //              [1 1]
    let rotated = rotate(&get_shape(PieceKind::L));
    assert_eq!(rotated.to_rows(), vec![vec![1, 0], vec![1, 0], vec![1, 1]]);
}

#[test]
fn test_display_tag_is_variant_name() {
    for kind in PieceKind::ALL {
        assert_eq!(definition(kind).tag(), format!("{:?}", kind));
    }
}
