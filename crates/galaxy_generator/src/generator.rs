use bevy::color::{LinearRgba, Mix};
use bevy::math::Vec3;
use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use std::f32::consts::TAU;

use crate::{GalaxyError, GalaxyParams, RandomSource};

/// Particles handed to `generate_par` workers at a time.
pub const PAR_CHUNK_SIZE: usize = 4096;

/// Positions and linear RGB colors, one entry of each per particle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleBuffer {
    pub positions: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
}

impl ParticleBuffer {
    fn zeroed(count: usize) -> Self {
        Self {
            positions: vec![[0.0; 3]; count],
            colors: vec![[0.0; 3]; count],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Largest distance from the galactic axis (Y) over all particles.
    pub fn max_planar_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|[x, _, z]| (x * x + z * z).sqrt())
            .fold(0.0, f32::max)
    }
}

/// Angle of the arm a particle belongs to. Arms are evenly spaced.
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    let branches = branches.max(1) as usize;
    (index % branches) as f32 / branches as f32 * TAU
}

/// Arm twist grows linearly with distance to the centre.
pub fn spin_angle(radius: f32, spin: f32) -> f32 {
    radius * spin
}

/// How far along the inside -> outside gradient a particle at `radius` sits.
pub fn color_mix_factor(radius: f32, max_radius: f32) -> f32 {
    if max_radius > 0.0 {
        (radius / max_radius).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn particle_position(index: usize, radius: f32, params: &GalaxyParams, jitter: Vec3) -> Vec3 {
    let angle = branch_angle(index, params.branches) + spin_angle(radius, params.spin);
    Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius) + jitter
}

fn jitter<R: RandomSource + ?Sized>(params: &GalaxyParams, rng: &mut R) -> f32 {
    rng.unit().powf(params.randomness_power) * rng.sign() * params.randomness
}

fn fill_particles<R: RandomSource + ?Sized>(
    params: &GalaxyParams,
    first_index: usize,
    rng: &mut R,
    positions: &mut [[f32; 3]],
    colors: &mut [[f32; 3]],
) {
    let inside = LinearRgba::from(params.inside_color);
    let outside = LinearRgba::from(params.outside_color);

    for (offset, (position, color)) in positions.iter_mut().zip(colors.iter_mut()).enumerate() {
        let radius = rng.unit() * params.radius;
        let scatter = Vec3::new(
            jitter(params, rng),
            jitter(params, rng),
            jitter(params, rng),
        );
        *position = particle_position(first_index + offset, radius, params, scatter).to_array();

        let mixed = inside.mix(&outside, color_mix_factor(radius, params.radius));
        *color = [mixed.red, mixed.green, mixed.blue];
    }
}

/// Builds every particle of a galaxy on the calling thread.
///
/// Radii are uniform along the radius, not over the disk area, so particles pile up
/// near the centre.
pub fn generate<R: RandomSource + ?Sized>(
    params: &GalaxyParams,
    rng: &mut R,
) -> Result<ParticleBuffer, GalaxyError> {
    params.validate()?;

    let mut buffer = ParticleBuffer::zeroed(params.count);
    fill_particles(params, 0, rng, &mut buffer.positions, &mut buffer.colors);
    Ok(buffer)
}

/// Same particles as [`generate`], built in chunks across the rayon pool.
///
/// Each chunk gets its own `StdRng` seeded from `seed` and the chunk index, so the
/// output only depends on `seed`, never on thread count or scheduling.
pub fn generate_par(params: &GalaxyParams, seed: u64) -> Result<ParticleBuffer, GalaxyError> {
    params.validate()?;

    let mut buffer = ParticleBuffer::zeroed(params.count);
    buffer
        .positions
        .par_chunks_mut(PAR_CHUNK_SIZE)
        .zip(buffer.colors.par_chunks_mut(PAR_CHUNK_SIZE))
        .enumerate()
        .for_each(|(chunk, (positions, colors))| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(chunk as u64));
            fill_particles(params, chunk * PAR_CHUNK_SIZE, &mut rng, positions, colors);
        });
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    /// Replays a fixed list of draws, wrapping around at the end.
    struct SequenceSource {
        values: Vec<f32>,
        next: usize,
    }

    impl SequenceSource {
        fn new(values: Vec<f32>) -> Self {
            Self { values, next: 0 }
        }
    }

    impl RandomSource for SequenceSource {
        fn unit(&mut self) -> f32 {
            let value = self.values[self.next % self.values.len()];
            self.next += 1;
            value
        }
    }

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn small(count: usize) -> GalaxyParams {
        GalaxyParams {
            count,
            ..Default::default()
        }
    }

    #[test]
    fn test_buffer_lengths_match_count() {
        for count in [1, 2, 3, 1000, PAR_CHUNK_SIZE + 17] {
            let buffer = generate(&small(count), &mut seeded(1)).unwrap();
            assert_eq!(buffer.positions.len(), count);
            assert_eq!(buffer.colors.len(), count);
            assert_eq!(buffer.len(), count);
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        let buffer = generate(&small(0), &mut seeded(1)).unwrap();
        assert!(buffer.is_empty());
        assert!(buffer.colors.is_empty());

        let buffer = generate_par(&small(0), 1).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_positions_stay_within_radius_plus_jitter() {
        let params = GalaxyParams {
            count: 20_000,
            randomness: 0.7,
            randomness_power: 1.0,
            ..Default::default()
        };
        let buffer = generate(&params, &mut seeded(3)).unwrap();
        let limit = params.radius + params.max_jitter() + 1e-4;
        assert!(buffer.max_planar_radius() <= limit);
        for [_, y, _] in &buffer.positions {
            assert!(y.abs() <= params.randomness);
        }
    }

    #[test]
    fn test_four_particle_end_to_end() {
        let params = GalaxyParams {
            count: 4,
            branches: 2,
            radius: 1.0,
            spin: 0.0,
            randomness: 0.0,
            randomness_power: 1.0,
            ..Default::default()
        }
        .with_hex_colors("#ff0000", "#0000ff")
        .unwrap();

        // per particle: radius, then (magnitude, sign) for x, y and z
        let mut draws = Vec::new();
        for radius in [0.0, 1.0, 0.0, 1.0] {
            draws.push(radius);
            draws.extend([0.5, 0.2, 0.5, 0.7, 0.5, 0.2]);
        }
        let buffer = generate(&params, &mut SequenceSource::new(draws)).unwrap();

        let expected = [
            [0.0, 0.0, 0.0],
            [PI.cos(), 0.0, PI.sin()],
            [0.0, 0.0, 0.0],
            [PI.cos(), 0.0, PI.sin()],
        ];
        for (actual, expected) in buffer.positions.iter().zip(expected) {
            for axis in 0..3 {
                assert!((actual[axis] - expected[axis]).abs() < 1e-6);
            }
        }
        assert!((buffer.positions[1][0] + 1.0).abs() < 1e-6);

        let red = [1.0, 0.0, 0.0];
        let blue = [0.0, 0.0, 1.0];
        assert_eq!(buffer.colors, vec![red, blue, red, blue]);
    }

    #[test]
    fn test_color_endpoints() {
        let params = GalaxyParams {
            count: 2,
            ..Default::default()
        };
        let buffer = generate(&params, &mut SequenceSource::new(vec![0.0, 1.0])).unwrap();
        let inside = LinearRgba::from(params.inside_color);
        let outside = LinearRgba::from(params.outside_color);

        // The sequence wraps, so particle 0 draws radius 0 and particle 1 draws
        // radius 1 * max radius.
        let [r, g, b] = buffer.colors[0];
        assert!((r - inside.red).abs() < 1e-6);
        assert!((g - inside.green).abs() < 1e-6);
        assert!((b - inside.blue).abs() < 1e-6);

        let [r, g, b] = buffer.colors[1];
        assert!((r - outside.red).abs() < 1e-6);
        assert!((g - outside.green).abs() < 1e-6);
        assert!((b - outside.blue).abs() < 1e-6);
    }

    #[test]
    fn test_zero_radius_uses_inside_color() {
        let params = GalaxyParams {
            count: 100,
            radius: 0.0,
            ..Default::default()
        };
        let buffer = generate(&params, &mut seeded(5)).unwrap();
        let inside = LinearRgba::from(params.inside_color);
        for [r, g, b] in &buffer.colors {
            assert!(!r.is_nan() && !g.is_nan() && !b.is_nan());
            assert!((r - inside.red).abs() < 1e-6);
            assert!((b - inside.blue).abs() < 1e-6);
        }
        assert_eq!(color_mix_factor(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_single_branch_lies_on_one_arm() {
        let params = GalaxyParams {
            count: 500,
            branches: 1,
            spin: 0.0,
            randomness: 0.0,
            ..Default::default()
        };
        assert!((0..500).all(|i| branch_angle(i, 1) == 0.0));

        let buffer = generate(&params, &mut seeded(9)).unwrap();
        for [x, _, z] in &buffer.positions {
            assert!(*x >= 0.0);
            assert!(z.abs() < 1e-6);
        }
    }

    #[test]
    fn test_branch_assignment_cycles() {
        assert_eq!(branch_angle(0, 4), 0.0);
        assert!((branch_angle(1, 4) - PI / 2.0).abs() < 1e-6);
        assert!((branch_angle(6, 4) - PI).abs() < 1e-6);
        assert_eq!(branch_angle(4, 4), 0.0);
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let no_branches = GalaxyParams {
            branches: 0,
            ..small(10)
        };
        assert_eq!(
            generate(&no_branches, &mut seeded(1)),
            Err(GalaxyError::NoBranches)
        );
        assert_eq!(generate_par(&no_branches, 1), Err(GalaxyError::NoBranches));

        let zero_power = GalaxyParams {
            randomness_power: 0.0,
            ..small(10)
        };
        assert!(generate(&zero_power, &mut seeded(1)).is_err());
    }

    #[test]
    fn test_seeded_generation_is_repeatable() {
        let params = small(5_000);
        let a = generate(&params, &mut seeded(1234)).unwrap();
        let b = generate(&params, &mut seeded(1234)).unwrap();
        assert_eq!(a, b);

        let c = generate(&params, &mut seeded(4321)).unwrap();
        assert_eq!(c.len(), a.len());
        assert_ne!(a, c);
    }

    #[test]
    fn test_unseeded_generation_differs() {
        let params = small(1_000);
        let a = generate(&params, &mut rand::rng()).unwrap();
        let b = generate(&params, &mut rand::rng()).unwrap();
        assert_eq!(a.len(), b.len());
        assert_ne!(a.positions, b.positions);
    }

    // The position formula alone never reads `randomness`; here it scales the jitter.
    #[test]
    fn test_randomness_scales_jitter() {
        let flat = GalaxyParams {
            randomness: 0.0,
            ..small(2_000)
        };
        let buffer = generate(&flat, &mut seeded(2)).unwrap();
        assert!(buffer.positions.iter().all(|[_, y, _]| *y == 0.0));

        let mean_height = |randomness: f32| {
            let params = GalaxyParams {
                randomness,
                ..small(2_000)
            };
            let buffer = generate(&params, &mut seeded(2)).unwrap();
            buffer.positions.iter().map(|[_, y, _]| y.abs()).sum::<f32>() / 2_000.0
        };
        let narrow = mean_height(0.5);
        let wide = mean_height(1.0);
        assert!((wide - narrow * 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_randomness_power_tightens_arms() {
        let mean_height = |randomness_power: f32| {
            let params = GalaxyParams {
                randomness: 1.0,
                randomness_power,
                ..small(10_000)
            };
            let buffer = generate(&params, &mut seeded(8)).unwrap();
            buffer.positions.iter().map(|[_, y, _]| y.abs()).sum::<f32>() / 10_000.0
        };
        assert!(mean_height(5.0) < mean_height(1.0));
    }

    #[test]
    fn test_parallel_generation_is_deterministic() {
        let params = small(3 * PAR_CHUNK_SIZE + 5);
        let a = generate_par(&params, 99).unwrap();
        let b = generate_par(&params, 99).unwrap();
        assert_eq!(a.len(), params.count);
        assert_eq!(a, b);
        assert_ne!(a, generate_par(&params, 100).unwrap());
        assert!(a.max_planar_radius() <= params.radius + params.max_jitter() + 1e-4);
    }

    #[test]
    fn test_parallel_first_chunk_matches_sequential() {
        let params = small(PAR_CHUNK_SIZE);
        let sequential = generate(&params, &mut seeded(77)).unwrap();
        let parallel = generate_par(&params, 77).unwrap();
        assert_eq!(sequential, parallel);
    }
}
