use std::f32::consts::FRAC_PI_4;

use anyhow::Result;
use glam::{Vec3, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::layout::{InstanceLayout, BOX_COUNT};
use super::object::{Bounce, SceneObject};

/// Scene construction parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Pool size `N`, static objects included. Must be at least `BOX_COUNT`.
    pub instance_count: u32,
    /// Seed for sphere placement. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Spheres reverse once `|y|` exceeds this value.
    pub bounce_limit: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            instance_count: 30,
            seed: None,
            bounce_limit: 9.0,
        }
    }
}

/// Fixed-size object pool.
///
/// Slots `[0, BOX_COUNT)` hold the wall and floor; the rest are spheres.
/// The pool never grows or shrinks after construction.
#[derive(Debug, Clone)]
pub struct SceneState {
    objects: Vec<SceneObject>,
    layout: InstanceLayout,
    bounce_limit: f32,
}

impl SceneState {
    pub fn new(config: &SceneConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::initialize(config.instance_count, config.bounce_limit, &mut rng)
    }

    /// Places the wall, the floor and `count - 2` randomized spheres.
    pub fn initialize<R: Rng + ?Sized>(count: u32, bounce_limit: f32, rng: &mut R) -> Result<Self> {
        let layout = InstanceLayout::new(count)?;
        let mut objects = Vec::with_capacity(count as usize);

        // wall
        objects.push(SceneObject::fixed(
            Vec3::new(0.0, 0.0, -20.0),
            Vec3::new(0.0, FRAC_PI_4, 0.0),
            Vec3::new(2.0, 20.0, 2.0),
            Vec4::new(0.5, 0.5, 0.5, 1.0),
        ));

        // floor
        objects.push(SceneObject::fixed(
            Vec3::new(0.0, -10.0, -20.0),
            Vec3::ZERO,
            Vec3::new(50.0, 0.5, 40.0),
            Vec4::ONE,
        ));

        debug_assert_eq!(objects.len() as u32, BOX_COUNT);

        for _ in BOX_COUNT..count {
            objects.push(random_sphere(rng));
        }

        Ok(Self {
            objects,
            layout,
            bounce_limit,
        })
    }

    /// One integration step for every sphere. Static slots are untouched.
    pub fn advance(&mut self) {
        let limit = self.bounce_limit;
        for obj in &mut self.objects[BOX_COUNT as usize..] {
            obj.advance(limit);
        }
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut [SceneObject] {
        &mut self.objects
    }

    pub fn layout(&self) -> &InstanceLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

fn random_sphere<R: Rng + ?Sized>(rng: &mut R) -> SceneObject {
    let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

    let position = Vec3::new(
        (1.0 + rng.r#gen::<f32>() * 12.0) * side,
        -8.0 + rng.r#gen::<f32>() * 15.0,
        -20.0 + (1.0 + rng.r#gen::<f32>() * 12.0) * side,
    );
    let rotation = Vec3::new(rng.r#gen(), rng.r#gen(), rng.r#gen());
    let s = rng.r#gen::<f32>().max(0.5);
    let color = Vec4::new(rng.r#gen(), rng.r#gen(), rng.r#gen(), 1.0);
    let velocity = (rng.r#gen::<f32>() / 10.0).max(0.09) * side;

    SceneObject {
        position,
        rotation,
        scale: Vec3::splat(s),
        color,
        bounce: Some(Bounce { velocity }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(count: u32) -> SceneState {
        SceneState::new(&SceneConfig {
            instance_count: count,
            seed: Some(7),
            ..SceneConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn pool_has_requested_size() {
        let scene = seeded(30);
        assert_eq!(scene.len(), 30);
        assert_eq!(scene.layout().count(), 30);
    }

    #[test]
    fn rejects_undersized_pool() {
        assert!(
            SceneState::new(&SceneConfig {
                instance_count: 1,
                ..SceneConfig::default()
            })
            .is_err()
        );
    }

    #[test]
    fn static_objects_are_wall_then_floor() {
        let scene = seeded(5);
        let wall = scene.objects()[0];
        let floor = scene.objects()[1];

        assert_eq!(wall.scale, Vec3::new(2.0, 20.0, 2.0));
        assert_eq!(wall.rotation.y, FRAC_PI_4);
        assert!(wall.bounce.is_none());
        assert_eq!(floor.position, Vec3::new(0.0, -10.0, -20.0));
        assert_eq!(floor.color, Vec4::ONE);
        assert!(floor.bounce.is_none());
    }

    #[test]
    fn spheres_respect_placement_bounds() {
        let scene = seeded(200);
        for obj in &scene.objects()[2..] {
            let x = obj.position.x.abs();
            assert!((1.0..=13.0).contains(&x));
            assert!((-8.0..=7.0).contains(&obj.position.y));
            assert!(obj.scale.x >= 0.5 && obj.scale.x == obj.scale.y && obj.scale.y == obj.scale.z);
            assert_eq!(obj.color.w, 1.0);

            // x and z offsets share one sign, and so does the velocity.
            let bounce = obj.bounce.expect("spheres bounce");
            let z_offset = obj.position.z + 20.0;
            assert_eq!(obj.position.x.signum(), z_offset.signum());
            assert_eq!(obj.position.x.signum(), bounce.velocity.signum());
            assert!(bounce.velocity.abs() >= 0.09 && bounce.velocity.abs() <= 0.1);
        }
    }

    #[test]
    fn same_seed_same_scene() {
        let a = seeded(30);
        let b = seeded(30);
        assert_eq!(a.objects(), b.objects());
    }

    #[test]
    fn static_objects_survive_many_steps() {
        let mut scene = seeded(30);
        let wall = scene.objects()[0];
        let floor = scene.objects()[1];

        for _ in 0..10_000 {
            scene.advance();
        }

        assert_eq!(scene.objects()[0], wall);
        assert_eq!(scene.objects()[1], floor);
    }

    #[test]
    fn spheres_stay_near_bounce_band() {
        let mut scene = seeded(30);
        for _ in 0..5_000 {
            scene.advance();
            for obj in &scene.objects()[2..] {
                assert!(obj.position.y.abs() <= 9.0 + 0.1 + 1e-4);
            }
        }
    }

    #[test]
    fn advance_moves_spheres_by_velocity() {
        let mut scene = seeded(3);
        let before = scene.objects()[2];
        scene.advance();
        let after = scene.objects()[2];
        let v = before.bounce.unwrap().velocity;
        assert!((after.position.y - (before.position.y + v)).abs() < 1e-6);
        assert_eq!(after.position.x, before.position.x);
    }

    #[test]
    fn configured_bounce_limit_is_used() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut scene = SceneState::initialize(3, 9.0, &mut rng).unwrap();
        {
            let sphere = &mut scene.objects_mut()[2];
            sphere.position.y = 8.95;
            sphere.bounce = Some(Bounce { velocity: 0.12 });
        }
        scene.advance();
        let sphere = scene.objects()[2];
        assert!((sphere.position.y - 9.07).abs() < 1e-5);
        assert_eq!(sphere.bounce.unwrap().velocity, -0.12);
    }
}
