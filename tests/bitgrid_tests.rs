use hunter::{BitGrid, BitGridError};

#[test]
fn test_get_set_clear() {
    let mut grid = BitGrid::<u16>::new(4, 3);
    assert!(grid.is_empty());
    assert_eq!(grid.area(), 12);

    grid.set(1, 1).unwrap();
    assert!(grid.get(1, 1).unwrap());

    grid.clear(1, 1).unwrap();
    assert!(!grid.get(1, 1).unwrap());

    grid.set(3, 2).unwrap();
    assert!(grid.get(3, 2).unwrap());
    assert_eq!(grid.count_ones(), 1);
}

#[test]
fn test_out_of_bounds() {
    let mut grid = BitGrid::<u64>::new(10, 10);
    assert_eq!(
        grid.set(10, 0).unwrap_err(),
        BitGridError::IndexOutOfBounds { x: 10, y: 0 }
    );
    assert!(grid.get(0, 10).is_err());
    assert!(!grid.contains(42, 42));
}

#[test]
fn test_cells_span_multiple_words() {
    // 100 cells in u8 words
    let mut grid = BitGrid::<u8>::new(10, 10);
    for (x, y) in [(0, 0), (7, 0), (8, 0), (9, 9)] {
        grid.set(x, y).unwrap();
    }
    let bits: Vec<_> = grid.iter_set_bits().collect();
    assert_eq!(bits, vec![(0, 0), (7, 0), (8, 0), (9, 9)]);
    assert_eq!(grid.count_ones(), 4);
}

#[test]
fn test_from_cells_and_iter_row_major() {
    let grid = BitGrid::<u64>::from_cells(4, 4, [(3, 3), (0, 1), (2, 0)]).unwrap();
    let bits: Vec<_> = grid.iter_set_bits().collect();
    assert_eq!(bits, vec![(2, 0), (0, 1), (3, 3)]);
}

#[test]
fn test_subset_and_intersection() {
    let small = BitGrid::<u64>::from_cells(5, 5, [(1, 1)]).unwrap();
    let big = BitGrid::<u64>::from_cells(5, 5, [(1, 1), (2, 1)]).unwrap();
    let other = BitGrid::<u64>::from_cells(5, 5, [(4, 4)]).unwrap();
    assert!(small.is_subset_of(&big).unwrap());
    assert!(!big.is_subset_of(&small).unwrap());
    assert!(small.intersects(&big).unwrap());
    assert!(!small.intersects(&other).unwrap());

    let union = &big | &other;
    assert_eq!(union.count_ones(), 3);
    let both = &big & &small;
    assert_eq!(both, small);

    let wrong = BitGrid::<u64>::new(4, 5);
    assert!(matches!(
        small.is_subset_of(&wrong),
        Err(BitGridError::DimensionMismatch { .. })
    ));
}
