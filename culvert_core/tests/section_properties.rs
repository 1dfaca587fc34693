//! Resize, layout and uplift properties across modules.

use approx::assert_relative_eq;
use proptest::prelude::*;

use culvert_core::buoyancy::{check, generate_report, Verdict};
use culvert_core::geometry::resolve;
use culvert_core::ground::GroundModel;
use culvert_core::section::{
    CornerDimension, CornerPosition, CornerPair, MiddleWall, StructuralSection, WallRef, MAX_CELLS, MIN_CELLS,
};
use culvert_core::store::ProjectState;

fn arb_section() -> impl Strategy<Value = StructuralSection> {
    (
        1usize..=10,
        prop::collection::vec(500.0f64..8_000.0, 10),
        prop::collection::vec((200.0f64..1_200.0, any::<bool>()), 9),
    )
        .prop_map(|(n, widths, walls)| {
            let mut section = StructuralSection::default();
            section.set_cell_count(n);
            section.cell_widths = widths[..n].to_vec();
            section.middle_walls = walls[..n - 1]
                .iter()
                .map(|&(thickness, column)| {
                    if column {
                        MiddleWall::Column { thickness }
                    } else {
                        MiddleWall::Continuous { thickness }
                    }
                })
                .collect();
            section
        })
}

proptest! {
    #[test]
    fn resize_is_idempotent(section in arb_section(), n in 0usize..15) {
        let mut once = section.clone();
        once.set_cell_count(n);
        let mut twice = once.clone();
        twice.set_cell_count(n);
        prop_assert_eq!(&once, &twice);

        let expected = n.clamp(MIN_CELLS, MAX_CELLS);
        prop_assert_eq!(once.cell_count, expected);
        prop_assert_eq!(once.cell_widths.len(), expected);
        prop_assert_eq!(once.middle_walls.len(), expected - 1);
        prop_assert_eq!(once.haunch.middle_walls.len(), expected - 1);
    }

    #[test]
    fn shrink_then_grow_keeps_prefix(section in arb_section(), smaller in 1usize..=10) {
        let original = section.cell_count;
        prop_assume!(smaller <= original);

        let mut resized = section.clone();
        resized.set_cell_count(smaller);
        resized.set_cell_count(original);

        prop_assert_eq!(&resized.cell_widths[..smaller], &section.cell_widths[..smaller]);
        for b in &resized.cell_widths[smaller..] {
            prop_assert_eq!(*b, 4_000.0);
        }
        prop_assert_eq!(&resized.middle_walls[..smaller - 1], &section.middle_walls[..smaller - 1]);
    }

    #[test]
    fn store_edits_keep_array_lengths(
        section in arb_section(),
        extra_walls in 0usize..4,
        extra_widths in 0usize..4,
        dropped in 0usize..3,
    ) {
        let mut state = ProjectState::new();
        state.update_section(|s| *s = section.clone());
        state.update_section(|s| {
            s.middle_walls.extend(std::iter::repeat(MiddleWall::Continuous { thickness: 600.0 }).take(extra_walls));
            s.cell_widths.extend(std::iter::repeat(2_500.0).take(extra_widths));
            let keep = s.haunch.middle_walls.len().saturating_sub(dropped);
            s.haunch.middle_walls.truncate(keep);
        });

        let edited = &state.get().section;
        let n = edited.cell_count;
        prop_assert_eq!(n, section.cell_count);
        prop_assert_eq!(edited.cell_widths.len(), n);
        prop_assert_eq!(edited.middle_walls.len(), n - 1);
        prop_assert_eq!(edited.haunch.middle_walls.len(), n - 1);
        prop_assert!(edited.validate().is_empty());

        let geom = resolve(edited, &GroundModel::default()).unwrap();
        assert_relative_eq!(geom.total_width, edited.total_width(), max_relative = 1e-12);
    }

    #[test]
    fn width_is_conserved(section in arb_section()) {
        let geom = resolve(&section, &GroundModel::default()).unwrap();
        let cells: f64 = geom.cells.iter().map(|c| c.width()).sum();
        let walls: f64 = geom.walls.iter().map(|w| w.thickness()).sum();
        assert_relative_eq!(
            geom.left_wall + cells + walls + geom.right_wall,
            geom.total_width,
            max_relative = 1e-12
        );
        assert_relative_eq!(geom.total_width, section.total_width(), max_relative = 1e-12);

        // cells and walls tile the interior without gaps
        let mut x = geom.left_wall;
        for (i, cell) in geom.cells.iter().enumerate() {
            assert_relative_eq!(cell.left, x, max_relative = 1e-12);
            x = cell.right;
            if let Some(wall) = geom.walls.get(i) {
                assert_relative_eq!(wall.left, x, max_relative = 1e-12);
                x = wall.right;
            }
        }
    }
}

#[test]
fn resize_round_trip_three_five_three() {
    let mut section = StructuralSection::default();
    section.cell_widths = vec![3_000.0, 3_500.0, 3_200.0];
    section.middle_walls[1] = MiddleWall::Column { thickness: 450.0 };
    let before = section.clone();

    section.set_cell_count(5);
    assert_eq!(section.cell_widths, vec![3_000.0, 3_500.0, 3_200.0, 4_000.0, 4_000.0]);
    section.set_cell_count(3);
    assert_eq!(section, before);
}

#[test]
fn haunch_mirroring_is_one_way() {
    let mut section = StructuralSection::default();
    section
        .edit_haunch(WallRef::Left, CornerPosition::Lower, CornerDimension::Height, 275.0)
        .unwrap();
    assert_eq!(section.haunch.left_wall.lower.height, 275.0);
    assert_eq!(section.haunch.right_wall.lower.height, 275.0);

    section
        .edit_haunch(WallRef::Right, CornerPosition::Lower, CornerDimension::Height, 90.0)
        .unwrap();
    assert_eq!(section.haunch.right_wall.lower.height, 90.0);
    assert_eq!(section.haunch.left_wall.lower.height, 275.0);
}

#[test]
fn deep_water_table_gives_no_uplift() {
    let ground = GroundModel {
        earth_cover_depth: 2_000.0,
        groundwater_depth: 10_000.0,
        ..GroundModel::default()
    };
    let result = check(&StructuralSection::default(), &ground).unwrap();
    assert_eq!(result.uplift.0, 0.0);
    assert_eq!(result.safety_factor, None);
    assert_eq!(result.verdict, Verdict::NoUplift);

    let report = generate_report(&StructuralSection::default(), &ground);
    assert!(report.contains("부력 검토가 필요하지 않습니다. → O.K."));
}

#[test]
fn three_cell_reference_case() {
    let section = StructuralSection::default();
    let ground = GroundModel::default();
    let result = check(&section, &ground).unwrap();

    assert_eq!(result.total_width, 14_400.0);
    assert_eq!(result.total_height, 5_600.0);
    assert_eq!(result.bottom_depth, 7_600.0);
    assert_eq!(result.head, 4_600.0);
    // 9.81 x 4.6 x 14.4
    assert_relative_eq!(result.uplift.0, 649.8144, max_relative = 1e-9);

    // slabs and four walls, plus twelve 150 x 150 haunch triangles
    let concrete_area = 14_400.0 * 600.0 + 14_400.0 * 800.0 + 4.0 * 600.0 * 4_200.0 + 12.0 * 0.5 * 150.0 * 150.0;
    assert_relative_eq!(result.self_weight.0, 24.5 * concrete_area / 1e6, max_relative = 1e-9);
    assert_relative_eq!(result.soil_weight.0, 18.0 * 14_400.0 * 2_000.0 / 1e6, max_relative = 1e-12);

    let fs = result.safety_factor.unwrap();
    assert_relative_eq!(fs, result.resistance.0 / result.uplift.0, max_relative = 1e-12);
    assert_eq!(result.verdict, if fs >= 1.2 { Verdict::Pass } else { Verdict::Fail });
}

#[test]
fn mismatched_arrays_fail_validation() {
    let mut extra_wall = StructuralSection::default();
    extra_wall.middle_walls.push(MiddleWall::Continuous { thickness: 600.0 });

    let mut extra_width = StructuralSection::default();
    extra_width.cell_widths.push(4_000.0);

    let mut stale_count = StructuralSection::default();
    stale_count.cell_count = 4;

    let mut missing_haunch = StructuralSection::default();
    missing_haunch.haunch.middle_walls.pop();

    let mut extra_haunch = StructuralSection::default();
    extra_haunch.haunch.middle_walls.push(CornerPair::uniform(150.0, 150.0));

    for (section, field) in [
        (extra_wall, "middle_walls"),
        (extra_width, "B"),
        (stale_count, "B"),
        (missing_haunch, "haunch.middle_walls"),
        (extra_haunch, "haunch.middle_walls"),
    ] {
        let fields: Vec<String> = section.validate().into_iter().map(|i| i.field).collect();
        assert!(fields.contains(&field.to_string()), "{field} not reported: {fields:?}");
        assert!(resolve(&section, &GroundModel::default()).is_none());
        assert!(check(&section, &GroundModel::default()).is_none());
    }
}

#[test]
fn extra_wall_through_store_keeps_report_consistent() {
    let mut state = ProjectState::new();
    state.update_section(|s| {
        s.anti_float.enabled = true;
        s.middle_walls.push(MiddleWall::Continuous { thickness: 600.0 });
    });

    let section = &state.get().section;
    assert_eq!(section.middle_walls.len(), 2);
    assert_eq!(section.total_width(), 14_400.0);

    let report = generate_report(section, &state.get().ground);
    assert!(report.contains("폭 = 500 + 14,400 + 500 = 15,400 mm"));
}
