//! Pieces module tests - catalog shapes and clockwise rotation

use blockfall::core::{canonical_shape, get_shape, Piece, Shape};
use blockfall::types::PieceKind;

fn offsets(shape: Shape) -> Vec<(i8, i8)> {
    shape.cells().into_iter().collect()
}

// ============== Catalog ==============

#[test]
fn test_i_piece_is_a_single_row() {
    let i = canonical_shape(PieceKind::I);
    assert_eq!((i.rows(), i.cols()), (1, 4));
    assert_eq!(offsets(i), [(0, 0), (1, 0), (2, 0), (3, 0)]);
}

#[test]
fn test_o_piece_is_two_by_two() {
    let o = canonical_shape(PieceKind::O);
    assert_eq!((o.rows(), o.cols()), (2, 2));
    assert_eq!(offsets(o), [(0, 0), (1, 0), (0, 1), (1, 1)]);
}

#[test]
fn test_three_wide_pieces() {
    let expected: [(PieceKind, [(i8, i8); 4]); 5] = [
        (PieceKind::T, [(1, 0), (0, 1), (1, 1), (2, 1)]),
        (PieceKind::S, [(1, 0), (2, 0), (0, 1), (1, 1)]),
        (PieceKind::Z, [(0, 0), (1, 0), (1, 1), (2, 1)]),
        (PieceKind::J, [(0, 0), (0, 1), (1, 1), (2, 1)]),
        (PieceKind::L, [(2, 0), (0, 1), (1, 1), (2, 1)]),
    ];
    for (kind, cells) in expected {
        let shape = canonical_shape(kind);
        assert_eq!((shape.rows(), shape.cols()), (2, 3), "{kind:?}");
        assert_eq!(offsets(shape), cells, "{kind:?}");
    }
}

// ============== Rotation ==============

#[test]
fn test_i_rotates_to_a_column() {
    let east = get_shape(PieceKind::I, 1);
    assert_eq!((east.rows(), east.cols()), (4, 1));
    assert_eq!(offsets(east), [(0, 0), (0, 1), (0, 2), (0, 3)]);
}

#[test]
fn test_t_rotations_in_order() {
    // Clockwise: pointing up, right, down, left.
    assert_eq!(offsets(get_shape(PieceKind::T, 1)), [(0, 0), (0, 1), (1, 1), (0, 2)]);
    assert_eq!(offsets(get_shape(PieceKind::T, 2)), [(0, 0), (1, 0), (2, 0), (1, 1)]);
    assert_eq!(offsets(get_shape(PieceKind::T, 3)), [(1, 0), (0, 1), (1, 1), (1, 2)]);
}

#[test]
fn test_o_rotation_is_identity() {
    let o = canonical_shape(PieceKind::O);
    assert_eq!(o.rotate_cw(), o);
}

#[test]
fn test_four_rotations_are_identity_for_every_piece() {
    for kind in PieceKind::ALL {
        let shape = canonical_shape(kind);
        let back = shape.rotate_cw().rotate_cw().rotate_cw().rotate_cw();
        assert_eq!(back, shape, "{kind:?}");
        assert_eq!(get_shape(kind, 4), shape, "{kind:?}");
    }
}

#[test]
fn test_rotation_swaps_dimensions() {
    for kind in PieceKind::ALL {
        let shape = canonical_shape(kind);
        let rotated = shape.rotate_cw();
        assert_eq!((rotated.rows(), rotated.cols()), (shape.cols(), shape.rows()));
    }
}

// ============== Spawning ==============

#[test]
fn test_spawned_pieces_are_centered_with_lowest_row_on_top_edge() {
    for kind in PieceKind::ALL {
        let piece = Piece::spawn(kind);
        let width = piece.shape.cols() as i8;
        assert_eq!(piece.x, (10 - width) / 2, "{kind:?}");

        let lowest = piece.shape.cells().iter().map(|&(_, dy)| piece.y + dy).max();
        assert_eq!(lowest, Some(0), "{kind:?}");
    }
}
