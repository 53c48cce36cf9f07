#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn first_tile_goes_to_origin() {
    let slot = next_slot(None, None);
    assert_eq!(slot.display_order, 0);
    assert_eq!(slot.z_index, 0);
    assert_eq!((slot.position_x, slot.position_y), (0.0, 0.0));
    assert_eq!((slot.width, slot.height), (300.0, 400.0));
}

#[test]
fn fifth_tile_lands_in_second_row_second_column() {
    let slot = next_slot(Some(3), Some(3));
    assert_eq!(slot.display_order, 4);
    assert_eq!(slot.z_index, 4);
    assert_eq!(slot.position_x, 320.0);
    assert_eq!(slot.position_y, 420.0);
}

#[test]
fn order_and_z_advance_independently() {
    let slot = next_slot(Some(1), Some(9));
    assert_eq!(slot.display_order, 2);
    assert_eq!(slot.z_index, 10);
    assert_eq!(slot.position_x, 640.0);
    assert_eq!(slot.position_y, 0.0);
}

#[test]
fn grid_wraps_every_three_columns() {
    assert_eq!(grid_position(3), Point::new(0.0, 420.0));
    assert_eq!(grid_position(5), Point::new(640.0, 420.0));
    assert_eq!(grid_position(6), Point::new(0.0, 840.0));
}

#[test]
fn negative_order_clamps_to_origin() {
    assert_eq!(grid_position(-4), Point::new(0.0, 0.0));
}

#[test]
fn title_strips_extension_and_dashes() {
    assert_eq!(title_from_file_name("country-road.jpg"), "country road");
    assert_eq!(title_from_file_name("lake.reflection.webp"), "lake.reflection");
    assert_eq!(title_from_file_name("noext"), "noext");
    assert_eq!(title_from_file_name(".hidden"), ".hidden");
}
