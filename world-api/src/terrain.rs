/// The interface through which generated geometry is projected onto terrain or colliders.
pub trait HeightSampler {
    /// Returns the height of the terrain at the given position.
    fn sample_height(&self, x: f32, z: f32) -> f32;

    /// Casts a ray straight down at the given position and returns the height of the first hit,
    /// if any. Takes precedence over [`HeightSampler::sample_height`].
    fn raycast_down(&self, _x: f32, _z: f32) -> Option<f32> {
        None
    }

    /// The height that geometry at the given position is projected to.
    fn ground_height(&self, x: f32, z: f32) -> f32 {
        self.raycast_down(x, z)
            .unwrap_or_else(|| self.sample_height(x, z))
    }
}

impl<F: Fn(f32, f32) -> f32> HeightSampler for F {
    fn sample_height(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bridge;

    impl HeightSampler for Bridge {
        fn sample_height(&self, _x: f32, _z: f32) -> f32 {
            0.0
        }

        fn raycast_down(&self, x: f32, _z: f32) -> Option<f32> {
            (x > 0.0).then_some(5.0)
        }
    }

    #[test]
    fn raycast_takes_precedence() {
        assert_eq!(Bridge.ground_height(1.0, 0.0), 5.0);
        assert_eq!(Bridge.ground_height(-1.0, 0.0), 0.0);
    }

    #[test]
    fn closures_are_samplers() {
        let slope = |x: f32, _z: f32| x * 0.5;
        assert_eq!(slope.ground_height(4.0, 1.0), 2.0);
    }
}
