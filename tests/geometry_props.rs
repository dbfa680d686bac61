use image_view::geometry::{
    HorizontalAlignment, Size, StretchMode, VerticalAlignment, compute_placement, measure_source,
};
use proptest::prelude::*;

const TOLERANCE: f64 = 1e-6;

fn dimension() -> impl Strategy<Value = f64> {
    1.0f64..4096.0
}

fn horizontal() -> impl Strategy<Value = HorizontalAlignment> {
    prop_oneof![
        Just(HorizontalAlignment::Left),
        Just(HorizontalAlignment::Center),
        Just(HorizontalAlignment::Right),
        Just(HorizontalAlignment::Stretch),
    ]
}

fn vertical() -> impl Strategy<Value = VerticalAlignment> {
    prop_oneof![
        Just(VerticalAlignment::Top),
        Just(VerticalAlignment::Center),
        Just(VerticalAlignment::Bottom),
        Just(VerticalAlignment::Stretch),
    ]
}

fn stretch() -> impl Strategy<Value = StretchMode> {
    prop_oneof![
        Just(StretchMode::None),
        Just(StretchMode::Fill),
        Just(StretchMode::Uniform),
        Just(StretchMode::UniformToFill),
    ]
}

proptest! {
    #[test]
    fn uniform_fits_inside_available(aw in dimension(), ah in dimension(), sw in dimension(), sh in dimension()) {
        let size = measure_source(Size::new(aw, ah), Size::new(sw, sh), StretchMode::Uniform);

        prop_assert!(size.width <= aw * (1.0 + TOLERANCE));
        prop_assert!(size.height <= ah * (1.0 + TOLERANCE));
        prop_assert!((size.width - aw).abs() < aw * TOLERANCE || (size.height - ah).abs() < ah * TOLERANCE);
    }

    #[test]
    fn uniform_to_fill_covers_available(aw in dimension(), ah in dimension(), sw in dimension(), sh in dimension()) {
        let size = measure_source(Size::new(aw, ah), Size::new(sw, sh), StretchMode::UniformToFill);

        prop_assert!(size.width >= aw * (1.0 - TOLERANCE));
        prop_assert!(size.height >= ah * (1.0 - TOLERANCE));
    }

    #[test]
    fn aspect_ratio_is_preserved(
        aw in dimension(),
        ah in dimension(),
        sw in dimension(),
        sh in dimension(),
        fill in any::<bool>(),
    ) {
        let stretch = if fill { StretchMode::UniformToFill } else { StretchMode::Uniform };
        let size = measure_source(Size::new(aw, ah), Size::new(sw, sh), stretch);

        let expected = sw / sh;
        let actual = size.width / size.height;
        prop_assert!((actual - expected).abs() <= expected * TOLERANCE);
    }

    #[test]
    fn clip_stays_inside_bounds(
        aw in dimension(),
        ah in dimension(),
        sw in dimension(),
        sh in dimension(),
        stretch in stretch(),
        h in horizontal(),
        v in vertical(),
    ) {
        let placement = compute_placement(Size::new(aw, ah), Size::new(sw, sh), stretch, h, v)
            .expect("positive finite inputs always place");
        let clip = placement.container_rect;

        prop_assert!(clip.x >= -TOLERANCE && clip.y >= -TOLERANCE);
        prop_assert!(clip.right() <= aw + aw * TOLERANCE);
        prop_assert!(clip.bottom() <= ah + ah * TOLERANCE);
        prop_assert!(placement.relative.width > 0.0 && placement.relative.height > 0.0);
    }

    #[test]
    fn region_maps_viewport_back_onto_content(
        aw in dimension(),
        ah in dimension(),
        sw in dimension(),
        sh in dimension(),
        stretch in stretch(),
    ) {
        let placement = compute_placement(
            Size::new(aw, ah),
            Size::new(sw, sh),
            stretch,
            HorizontalAlignment::Center,
            VerticalAlignment::Center,
        )
        .expect("positive finite inputs always place");
        let content = placement.content_rect;
        let region = placement.content_region();

        // 视口左上角映射到内容坐标 region.x，右下角映射到 region.x + region.width
        prop_assert!((region.x * content.width + content.x).abs() <= content.width * TOLERANCE);
        prop_assert!((region.width * content.width - aw).abs() <= aw * TOLERANCE);
        prop_assert!((region.height * content.height - ah).abs() <= ah * TOLERANCE);
    }
}

#[test]
fn zero_dimension_inputs_never_place() {
    let any = Size::new(10.0, 10.0);
    for degenerate in [Size::ZERO, Size::new(0.0, 5.0), Size::new(5.0, -1.0), Size::new(f64::NAN, 5.0)] {
        assert!(compute_placement(degenerate, any, StretchMode::Uniform, HorizontalAlignment::Center, VerticalAlignment::Center).is_none());
        assert!(compute_placement(any, degenerate, StretchMode::Uniform, HorizontalAlignment::Center, VerticalAlignment::Center).is_none());
    }
    assert!(
        compute_placement(
            Size::new(f64::INFINITY, 10.0),
            any,
            StretchMode::Uniform,
            HorizontalAlignment::Center,
            VerticalAlignment::Center
        )
        .is_none()
    );
}
