use gsx_core::{PropDirection, TrackingGeometry, Vector3};
use gsx_geometry::{GeometryBuilder, MaterialProperties, VolumeSpec};
use proptest::prelude::*;

fn detector() -> (gsx_geometry::Geometry, Vec<gsx_core::LayerId>) {
    let mut b = GeometryBuilder::new();
    let world = b
        .add_volume(VolumeSpec::tube("world", 0.0, 500.0, -800.0, 800.0))
        .unwrap();
    let barrel = b
        .add_volume(VolumeSpec::tube("barrel", 0.0, 300.0, -400.0, 400.0).inside(world))
        .unwrap();
    let layers = [40.0, 90.0, 160.0, 250.0]
        .into_iter()
        .map(|r| {
            b.add_cylinder_layer(barrel, r, 1.0, Some(MaterialProperties::silicon(0.3)))
                .unwrap()
        })
        .collect();
    (b.build().unwrap(), layers)
}

proptest! {
    #[test]
    fn forward_crossings_lie_on_the_layer(
        phi in 0.0f64..std::f64::consts::TAU,
        cot_theta in -0.8f64..0.8,
        r0 in 0.0f64..30.0,
    ) {
        let (g, layers) = detector();
        let start = Vector3::new(r0, 0.0, 0.0);
        let dir = Vector3::new(phi.cos(), phi.sin(), cot_theta).normalize();
        for &layer in &layers {
            let surface = g.layer_surface(layer).unwrap();
            let hit = g.intersect(surface, &start, &dir, PropDirection::Along, 0.0, true);
            if let Some(hit) = hit {
                prop_assert!(hit.path_length >= 0.0);
                prop_assert!(g.is_on_surface(surface, &hit.position, 1e-6));
                prop_assert_eq!(g.associated_layer(g.enclosing_volume(layer).unwrap(), &hit.position), Some(layer));
            }
        }
    }

    #[test]
    fn next_layer_in_volume_agrees_with_walk(
        phi in 0.0f64..std::f64::consts::TAU,
        cot_theta in -0.5f64..0.5,
    ) {
        let (g, layers) = detector();
        let barrel = g.enclosing_volume(layers[0]).unwrap();
        let dir = Vector3::new(phi.cos(), phi.sin(), cot_theta).normalize();
        // From the beam line every layer is crossed in radial order.
        let first = g.next_layer_in_volume(barrel, &Vector3::zeros(), &dir);
        prop_assert_eq!(first, Some(layers[0]));
        let on_first = g
            .intersect(g.layer_surface(layers[0]).unwrap(), &Vector3::zeros(), &dir, PropDirection::Along, 0.0, true)
            .unwrap()
            .position;
        prop_assert_eq!(g.next_layer(layers[0], &on_first, &dir), Some(layers[1]));
        prop_assert_eq!(g.next_layer_in_volume(barrel, &on_first, &dir), Some(layers[1]));
    }
}

#[test]
fn opposite_direction_walks_inwards() {
    let (g, layers) = detector();
    let barrel = g.enclosing_volume(layers[0]).unwrap();
    let outside = Vector3::new(280.0, 0.0, 0.0);
    assert_eq!(g.next_layer_in_volume(barrel, &outside, &-Vector3::x()), Some(layers[3]));
    assert_eq!(g.next_layer(layers[3], &outside, &-Vector3::x()), Some(layers[2]));
}
